//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod password_hasher;
mod resource_query;
mod resource_repository;
mod token_service;
mod user_repository;

pub use auth_service::AuthService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use resource_query::{ResourceCommand, ResourceQuery};
pub use resource_repository::{ResourcePage, ResourcePersistenceError, ResourceRepository};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
pub use user_repository::UserRepository;
