//! Driving port for registration, sign-in, and bearer token checks.
//!
//! Inbound adapters depend on this trait rather than on the concrete
//! service, so handler tests can wire any implementation.

use async_trait::async_trait;

use crate::domain::{AuthSession, AuthenticatedUser, Error, LoginCredentials, Registration, User};

/// Identity and credential use cases.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign it in.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Verify credentials and issue a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Verify a bearer token and return the identity it carries.
    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error>;

    /// Load the account behind an authenticated identity.
    async fn current_user(&self, caller: AuthenticatedUser) -> Result<User, Error>;
}
