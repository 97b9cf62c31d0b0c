//! Domain primitives, ports, and use-case services.
//!
//! Purpose: define the pharmacy's entities (staff accounts, categories,
//! products, suppliers), the traits adapters implement, and the services
//! inbound adapters call. Nothing in here depends on Actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure reporting.
//! - User, Category, Product, Supplier and their drafts.
//! - Resource: the trait tying an entity to its draft type.
//! - AccountService and ResourceService: the use cases.

pub mod account_service;
pub mod auth;
pub mod category;
pub mod error;
pub mod ports;
pub mod product;
pub mod resource;
pub mod resource_service;
pub mod supplier;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{AuthSession, AuthenticatedUser, IssuedToken, LoginCredentials, Registration};
pub use self::category::{Category, CategoryDraft};
pub use self::error::{Error, ErrorCode};
pub use self::product::{Product, ProductDraft};
pub use self::resource::Resource;
pub use self::resource_service::ResourceService;
pub use self::supplier::{Supplier, SupplierDraft};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, Role, User, UserStatus, UserValidationError};
