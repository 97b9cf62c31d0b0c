//! Authentication primitives: credentials, registrations, and the identity
//! carried by a verified access token.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::user::{Role, User};

/// Credentials submitted when signing in.
///
/// # Examples
/// ```
/// use pharmly_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::new("ada@example.com", "Secr3t!pass");
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Build credentials from already validated request values.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_owned(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Email address used to look up the account.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A self-service sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Requested login handle.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact address used to sign in.
    pub email: String,
    /// Plaintext password, wiped from memory on drop.
    pub password: Zeroizing<String>,
    /// Requested role; `cashier` when the caller left it out.
    pub role: Role,
}

/// Identity recovered from a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account identifier.
    pub user_id: i64,
    /// Role at the time the token was issued.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Whether the caller holds any of the listed roles.
    #[must_use]
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
        }
    }
}

/// A signed access token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact serialised token.
    pub token: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthSession {
    /// Bearer token to present on later requests.
    pub token: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
    /// The signed-in account.
    pub user: User,
}

impl AuthSession {
    /// Pair an issued token with the account it was issued for.
    #[must_use]
    pub fn new(token: IssuedToken, user: User) -> Self {
        Self {
            token: token.token,
            expires_at: token.expires_at,
            user,
        }
    }
}
