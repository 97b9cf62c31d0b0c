//! Bearer token guard for protected routes.
//!
//! Handlers take a [`Bearer`] argument to require a valid token, then call
//! [`Bearer::require_any`] when the route is limited to certain roles:
//!
//! 1. no `Authorization` header: 401
//! 2. header not of the form `Bearer <token>`: 401
//! 3. bad signature, malformed token, or expiry: 401
//! 4. role outside the allowed set: 403

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{AuthenticatedUser, Error, Role};

use super::state::HttpState;

/// Roles allowed to change the catalogue.
pub const CATALOGUE_EDITORS: &[Role] = &[Role::Admin, Role::Pharmacist];

/// Roles allowed to browse the staff directory.
pub const ADMINISTRATORS: &[Role] = &[Role::Admin];

/// Identity extracted from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bearer(AuthenticatedUser);

impl Bearer {
    /// The verified caller.
    #[must_use]
    pub fn user(&self) -> AuthenticatedUser {
        self.0
    }

    /// Return the caller when their role is in `allowed`, else `403`.
    pub fn require_any(&self, allowed: &[Role]) -> Result<AuthenticatedUser, Error> {
        if self.0.has_any_role(allowed) {
            Ok(self.0)
        } else {
            warn!(user_id = self.0.user_id, role = %self.0.role, "role not permitted");
            Err(Error::forbidden("Insufficient permissions"))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Authorization header is required"))?;
    let invalid_format = || Error::unauthorized("Invalid authorization header format");
    let value = header.to_str().map_err(|_| invalid_format())?;
    match value.split(' ').collect::<Vec<_>>().as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(*token),
        _ => Err(invalid_format()),
    }
}

fn authenticate(req: &HttpRequest) -> Result<Bearer, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let token = bearer_token(req)?;
    state.auth.authenticate(token).map(Bearer)
}

impl FromRequest for Bearer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
