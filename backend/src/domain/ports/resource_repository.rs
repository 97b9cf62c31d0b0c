//! Driven port shared by every entity repository.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::Resource;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by resource repository adapters.
    pub enum ResourcePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "repository connection failed: {message}",
        /// A uniqueness rule rejected the write. `message` is safe to show callers.
        Conflict { message: String } => "repository conflict: {message}",
        /// A referenced row does not exist. `message` is safe to show callers.
        InvalidReference { message: String } => "invalid reference: {message}",
        /// No live row has the requested identifier.
        NotFound { id: i64 } => "row {id} not found",
        /// Query or mutation failed during execution.
        Query { message: String } => "repository query failed: {message}",
    }
}

/// One page of rows plus the number of rows across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePage<R> {
    /// Rows on the requested page, most recently updated first.
    pub items: Vec<R>,
    /// Count of live rows in the table.
    pub total: u64,
}

/// Persistence contract for a [`Resource`].
///
/// Each call runs in its own transaction and either commits completely or
/// leaves storage untouched. Soft-deleted rows are invisible to every
/// operation.
#[async_trait]
pub trait ResourceRepository<R: Resource>: Send + Sync {
    /// Insert a row, returning it with its identifier and timestamps.
    async fn create(&self, draft: &R::Draft) -> Result<R, ResourcePersistenceError>;

    /// Fetch a live row by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<R>, ResourcePersistenceError>;

    /// Fetch one page ordered by `updated_at` descending, with the total count.
    async fn list(&self, page: PageRequest) -> Result<ResourcePage<R>, ResourcePersistenceError>;

    /// Replace every mutable attribute of a live row and refresh `updated_at`.
    async fn update(&self, id: i64, draft: &R::Draft) -> Result<R, ResourcePersistenceError>;

    /// Soft-delete a live row.
    async fn delete(&self, id: i64) -> Result<(), ResourcePersistenceError>;
}
