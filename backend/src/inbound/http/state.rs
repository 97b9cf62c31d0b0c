//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports,
//! so they can be exercised against in-memory services.

use std::sync::Arc;

use crate::domain::ports::{AuthService, ResourceCommand, ResourceQuery};
use crate::domain::{Category, Product, Supplier, User};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, and token checks.
    pub auth: Arc<dyn AuthService>,
    /// Staff directory reads.
    pub users: Arc<dyn ResourceQuery<User>>,
    pub categories: Arc<dyn ResourceQuery<Category>>,
    pub category_commands: Arc<dyn ResourceCommand<Category>>,
    pub products: Arc<dyn ResourceQuery<Product>>,
    pub product_commands: Arc<dyn ResourceCommand<Product>>,
    pub suppliers: Arc<dyn ResourceQuery<Supplier>>,
    pub supplier_commands: Arc<dyn ResourceCommand<Supplier>>,
}
