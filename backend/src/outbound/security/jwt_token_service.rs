//! HS256 JSON Web Token implementation of the [`TokenService`] port.
//!
//! Expiry is checked against the injected clock rather than the system
//! time so tests can move time forward deterministically.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AuthenticatedUser, IssuedToken, Role, User};

/// Signing parameters for access tokens.
#[derive(Clone)]
pub struct TokenSettings {
    secret: Zeroizing<String>,
    issuer: String,
    ttl: Duration,
}

impl TokenSettings {
    /// Build settings from a signing secret, issuer name, and lifetime.
    ///
    /// A non-positive lifetime is raised to one minute; tokens never live
    /// forever.
    #[must_use]
    pub fn new(secret: Zeroizing<String>, issuer: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret,
            issuer: issuer.into(),
            ttl: Duration::minutes(ttl_minutes.max(1)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256-signed bearer tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Create a token service with the given settings and clock.
    pub fn new(settings: TokenSettings, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            issuer: settings.issuer,
            ttl: settings.ttl,
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<IssuedToken, TokenError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            debug!(error = %err, "token decode failed");
            match err.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidIssuer => {
                    TokenError::invalid_signature()
                }
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::malformed(),
            }
        })?;
        let claims = data.claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::expired());
        }
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::malformed())?;
        Ok(AuthenticatedUser {
            user_id,
            role: claims.role,
        })
    }
}
