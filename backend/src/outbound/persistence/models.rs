//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each table has a read row, an insert row,
//! and a changeset; the latter two borrow from the domain draft.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::ports::ResourcePersistenceError;
use crate::domain::{
    Category, CategoryDraft, NewUser, Product, ProductDraft, Supplier, SupplierDraft, User,
};

use super::schema::{categories, products, suppliers, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = ResourcePersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|err| ResourcePersistenceError::query(format!("users.role: {err}")))?;
        let status = row
            .status
            .parse()
            .map_err(|err| ResourcePersistenceError::query(format!("users.status: {err}")))?;
        Ok(Self {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'static str,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_draft(draft: &'a NewUser, now: DateTime<Utc>) -> Self {
        Self {
            username: &draft.username,
            full_name: &draft.full_name,
            email: &draft.email,
            password_hash: &draft.password_hash,
            role: draft.role.as_str(),
            status: draft.status.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changeset struct for replacing user records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub username: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'static str,
    pub status: &'static str,
    pub updated_at: DateTime<Utc>,
}

impl<'a> UserChangeset<'a> {
    pub(crate) fn from_draft(draft: &'a NewUser, now: DateTime<Utc>) -> Self {
        Self {
            username: &draft.username,
            full_name: &draft.full_name,
            email: &draft.email,
            password_hash: &draft.password_hash,
            role: draft.role.as_str(),
            status: draft.status.as_str(),
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Row struct for reading from the categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub parent_category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = ResourcePersistenceError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            parent_category_id: row.parent_category_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for creating category records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub parent_category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewCategoryRow<'a> {
    pub(crate) fn from_draft(draft: &'a CategoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: &draft.name,
            description: &draft.description,
            parent_category_id: draft.parent_category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changeset struct for replacing category records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = categories)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CategoryChangeset<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub parent_category_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> CategoryChangeset<'a> {
    pub(crate) fn from_draft(draft: &'a CategoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: &draft.name,
            description: &draft.description,
            parent_category_id: draft.parent_category_id,
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Suppliers
// ---------------------------------------------------------------------------

/// Row struct for reading from the suppliers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = suppliers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SupplierRow {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SupplierRow> for Supplier {
    type Error = ResourcePersistenceError;

    fn try_from(row: SupplierRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            contact_person: row.contact_person,
            phone: row.phone,
            address: row.address,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for creating supplier records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = suppliers)]
pub(crate) struct NewSupplierRow<'a> {
    pub name: &'a str,
    pub contact_person: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub email: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewSupplierRow<'a> {
    pub(crate) fn from_draft(draft: &'a SupplierDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: &draft.name,
            contact_person: draft.contact_person.as_deref(),
            phone: draft.phone.as_deref(),
            address: draft.address.as_deref(),
            email: draft.email.as_deref(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changeset struct for replacing supplier records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = suppliers)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct SupplierChangeset<'a> {
    pub name: &'a str,
    pub contact_person: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub email: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> SupplierChangeset<'a> {
    pub(crate) fn from_draft(draft: &'a SupplierDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: &draft.name,
            contact_person: draft.contact_person.as_deref(),
            phone: draft.phone.as_deref(),
            address: draft.address.as_deref(),
            email: draft.email.as_deref(),
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub generic_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub unit: String,
    pub expiration_date: NaiveDate,
    pub barcode: String,
    pub supplier_id: i64,
    pub min_stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = ResourcePersistenceError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            category_id: row.category_id,
            generic_name: row.generic_name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            unit: row.unit,
            expiration_date: row.expiration_date,
            barcode: row.barcode,
            supplier_id: row.supplier_id,
            min_stock: row.min_stock,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for creating product records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub name: &'a str,
    pub category_id: i64,
    pub generic_name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub stock: i32,
    pub unit: &'a str,
    pub expiration_date: NaiveDate,
    pub barcode: &'a str,
    pub supplier_id: i64,
    pub min_stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewProductRow<'a> {
    pub(crate) fn from_draft(draft: &'a ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: &draft.name,
            category_id: draft.category_id,
            generic_name: &draft.generic_name,
            description: draft.description.as_deref(),
            price: draft.price,
            stock: draft.stock,
            unit: &draft.unit,
            expiration_date: draft.expiration_date,
            barcode: &draft.barcode,
            supplier_id: draft.supplier_id,
            min_stock: draft.min_stock,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changeset struct for replacing product records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProductChangeset<'a> {
    pub name: &'a str,
    pub category_id: i64,
    pub generic_name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub stock: i32,
    pub unit: &'a str,
    pub expiration_date: NaiveDate,
    pub barcode: &'a str,
    pub supplier_id: i64,
    pub min_stock: i32,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl<'a> ProductChangeset<'a> {
    pub(crate) fn from_draft(draft: &'a ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: &draft.name,
            category_id: draft.category_id,
            generic_name: &draft.generic_name,
            description: draft.description.as_deref(),
            price: draft.price,
            stock: draft.stock,
            unit: &draft.unit,
            expiration_date: draft.expiration_date,
            barcode: &draft.barcode,
            supplier_id: draft.supplier_id,
            min_stock: draft.min_stock,
            is_active: draft.is_active,
            updated_at: now,
        }
    }
}
