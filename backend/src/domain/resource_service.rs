//! Generic read and write use cases shared by every resource.
//!
//! [`ResourceService`] wraps a repository, turns persistence failures into
//! domain errors, and assembles paginated listings.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};
use tracing::{info, warn};

use crate::domain::ports::{
    ResourceCommand, ResourcePage, ResourcePersistenceError, ResourceQuery, ResourceRepository,
};
use crate::domain::{Error, Resource};

/// Map a repository failure onto the domain error returned to adapters.
///
/// Connection and query details are logged and withheld from callers;
/// conflict and reference messages are written by the adapters for display.
pub(crate) fn map_persistence_error(resource: &str, error: ResourcePersistenceError) -> Error {
    match error {
        ResourcePersistenceError::Connection { message } => {
            warn!(resource, %message, "repository unavailable");
            Error::service_unavailable(format!("{resource} storage is unavailable"))
        }
        ResourcePersistenceError::Conflict { message } => Error::conflict(message),
        ResourcePersistenceError::InvalidReference { message } => Error::invalid_request(message),
        ResourcePersistenceError::NotFound { .. } => Error::not_found(format!("{resource} not found")),
        ResourcePersistenceError::Query { message } => {
            Error::internal(format!("{resource} repository error: {message}"))
        }
    }
}

/// Use-case service for a single resource type.
pub struct ResourceService<R: Resource> {
    repository: Arc<dyn ResourceRepository<R>>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: Resource> ResourceService<R> {
    /// Create a service backed by the given repository.
    pub fn new(repository: Arc<dyn ResourceRepository<R>>) -> Self {
        Self { repository }
    }

    fn map_error(error: ResourcePersistenceError) -> Error {
        map_persistence_error(R::NAME, error)
    }

    async fn require(&self, id: i64) -> Result<R, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(Self::map_error)?
            .ok_or_else(|| Error::not_found(format!("{} not found", R::NAME)))
    }
}

#[async_trait]
impl<R: Resource> ResourceQuery<R> for ResourceService<R> {
    async fn list(&self, page: PageRequest) -> Result<Paginated<R>, Error> {
        info!(
            resource = R::NAME,
            page = page.page(),
            page_size = page.page_size(),
            "listing resources"
        );
        let ResourcePage { items, total } =
            self.repository.list(page).await.map_err(Self::map_error)?;
        Ok(Paginated::new(items, total, page))
    }

    async fn get(&self, id: i64) -> Result<R, Error> {
        self.require(id).await
    }
}

#[async_trait]
impl<R: Resource> ResourceCommand<R> for ResourceService<R> {
    async fn create(&self, draft: R::Draft) -> Result<R, Error> {
        let created = self
            .repository
            .create(&draft)
            .await
            .map_err(Self::map_error)?;
        info!(resource = R::NAME, id = created.id(), "resource created");
        Ok(created)
    }

    async fn update(&self, id: i64, draft: R::Draft) -> Result<R, Error> {
        let updated = self
            .repository
            .update(id, &draft)
            .await
            .map_err(Self::map_error)?;
        info!(resource = R::NAME, id, "resource updated");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        self.require(id).await?;
        self.repository.delete(id).await.map_err(Self::map_error)?;
        info!(resource = R::NAME, id, "resource deleted");
        Ok(())
    }
}
