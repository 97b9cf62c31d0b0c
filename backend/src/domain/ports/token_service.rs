//! Driven port for issuing and verifying signed access tokens.

use crate::domain::{AuthenticatedUser, IssuedToken, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token could not be decoded.
        Malformed => "access token is malformed",
        /// The signature or issuer does not match.
        InvalidSignature => "access token signature is invalid",
        /// The token is past its expiry.
        Expired => "access token has expired",
        /// The token could not be signed.
        Signing { message: String } => "access token signing failed: {message}",
    }
}

/// Issues time-boxed bearer tokens and verifies them without storage access.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token carrying the user's identifier and role.
    fn issue(&self, user: &User) -> Result<IssuedToken, TokenError>;

    /// Check signature and expiry, returning the embedded identity.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError>;
}
