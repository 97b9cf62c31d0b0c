//! The [`Resource`] abstraction shared by every stored entity.
//!
//! Repositories, services, and handlers are written once against this trait
//! and instantiated per entity.

use super::category::{Category, CategoryDraft};
use super::product::{Product, ProductDraft};
use super::supplier::{Supplier, SupplierDraft};
use super::user::{NewUser, User};

/// An entity persisted in its own table with a numeric identifier.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Attributes supplied by callers when creating or replacing a row.
    type Draft: Clone + Send + Sync + 'static;

    /// Singular lowercase name used in logs and error messages.
    const NAME: &'static str;

    /// Storage-assigned identifier.
    fn id(&self) -> i64;
}

impl Resource for User {
    type Draft = NewUser;
    const NAME: &'static str = "user";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Resource for Category {
    type Draft = CategoryDraft;
    const NAME: &'static str = "category";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Resource for Product {
    type Draft = ProductDraft;
    const NAME: &'static str = "product";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Resource for Supplier {
    type Draft = SupplierDraft;
    const NAME: &'static str = "supplier";

    fn id(&self) -> i64 {
        self.id
    }
}
