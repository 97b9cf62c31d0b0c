//! Suppliers the pharmacy buys stock from.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A supplier and its optional contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Supplier {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Trading name.
    pub name: String,
    /// Person to contact.
    pub contact_person: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Attributes used to create or replace a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SupplierDraft {
    /// Trading name.
    pub name: String,
    /// Person to contact.
    pub contact_person: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}
