//! Driving ports for reading and mutating resources.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Error, Resource};

/// Read use cases for a resource.
#[async_trait]
pub trait ResourceQuery<R: Resource>: Send + Sync {
    /// One page of resources with navigation metadata.
    async fn list(&self, page: PageRequest) -> Result<Paginated<R>, Error>;

    /// A single resource by identifier.
    async fn get(&self, id: i64) -> Result<R, Error>;
}

/// Write use cases for a resource.
#[async_trait]
pub trait ResourceCommand<R: Resource>: Send + Sync {
    /// Store a new resource.
    async fn create(&self, draft: R::Draft) -> Result<R, Error>;

    /// Replace an existing resource.
    async fn update(&self, id: i64, draft: R::Draft) -> Result<R, Error>;

    /// Remove an existing resource.
    async fn delete(&self, id: i64) -> Result<(), Error>;
}
