//! Port abstraction for user persistence adapters.

use async_trait::async_trait;

use crate::domain::User;

use super::{ResourcePersistenceError, ResourceRepository};

/// User persistence: the shared resource contract plus lookup by email.
#[async_trait]
pub trait UserRepository: ResourceRepository<User> {
    /// Fetch a live user by exact, case-sensitive email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ResourcePersistenceError>;
}
