//! Product categories, optionally nested under a parent category.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A catalogue category.
///
/// Categories form a tree through `parent_category_id`; cycles are not
/// checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Category {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Parent category, if nested.
    pub parent_category_id: Option<i64>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Attributes used to create or replace a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Parent category, if nested.
    pub parent_category_id: Option<i64>,
}
