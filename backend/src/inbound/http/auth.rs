//! Account handlers: registration, sign-in, and the caller's profile.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"alice123","full_name":"Alice A",
//!                             "email":"alice@example.com","password":"Str0ng!Pass"}
//! POST /api/v1/auth/login    {"email":"alice@example.com","password":"Str0ng!Pass"}
//! GET  /api/v1/auth/me       Authorization: Bearer <token>
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;
use zeroize::Zeroizing;

use crate::domain::{AuthSession, Error, LoginCredentials, Registration, User};

use super::ApiResult;
use super::bearer::Bearer;
use super::envelope::{ApiResponse, ErrorEnvelope};
use super::state::HttpState;
use super::validation::{
    FieldName, ValidatedJson, require_role, required, trimmed, validate_email,
    validate_password, validate_role,
};

/// Request body for `POST /api/v1/auth/register`.
///
/// `role` may be omitted or empty, in which case the account is a cashier.
#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        required(message = "This field is required"),
        length(min = 3, max = 20, message = "Username length must be between 3 and 20 characters")
    )]
    #[schema(example = "alice123")]
    #[serde(default, deserialize_with = "trimmed")]
    pub username: Option<String>,
    #[validate(
        required(message = "This field is required"),
        length(min = 3, max = 255, message = "Full name must be between 3 and 255 characters")
    )]
    #[schema(example = "Alice A")]
    #[serde(default, deserialize_with = "trimmed")]
    pub full_name: Option<String>,
    #[validate(required(message = "This field is required"), custom(function = "validate_email"))]
    #[schema(example = "alice@example.com")]
    #[serde(default, deserialize_with = "trimmed")]
    pub email: Option<String>,
    #[validate(
        required(message = "This field is required"),
        custom(function = "validate_password")
    )]
    #[schema(example = "Str0ng!Pass")]
    pub password: Option<String>,
    #[validate(custom(function = "validate_role"))]
    #[schema(example = "pharmacist")]
    pub role: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: required(value.username, FieldName::new("username"))?,
            full_name: required(value.full_name, FieldName::new("full_name"))?,
            email: required(value.email, FieldName::new("email"))?,
            password: Zeroizing::new(required(value.password, FieldName::new("password"))?),
            role: require_role(value.role.as_deref(), FieldName::new("role"))?,
        })
    }
}

/// Request body for `POST /api/v1/auth/login`.
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(required(message = "This field is required"), custom(function = "validate_email"))]
    #[schema(example = "alice@example.com")]
    #[serde(default, deserialize_with = "trimmed")]
    pub email: Option<String>,
    #[validate(
        required(message = "This field is required"),
        length(min = 1, message = "This field is required")
    )]
    #[schema(example = "Str0ng!Pass")]
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Ok(Self::new(
            required(value.email, FieldName::new("email"))?,
            required(value.password, FieldName::new("password"))?,
        ))
    }
}

/// Create an account and return a signed token for it.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthSession>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 409, description = "Email or username already in use", body = ErrorEnvelope),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: ValidatedJson<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let session = state.auth.register(registration).await?;
    info!(user_id = session.user.id, "user registered");
    Ok(ApiResponse::with_data("User registered successfully", session).respond(StatusCode::CREATED))
}

/// Exchange credentials for a signed token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<AuthSession>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: ValidatedJson<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.auth.login(credentials).await?;
    Ok(ApiResponse::with_data("Login successful", session).respond(StatusCode::OK))
}

/// Profile of the account behind the bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<User>),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "Account no longer exists", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "currentUser",
    security(("BearerAuth" = []))
)]
#[get("/auth/me")]
pub async fn current_user(state: web::Data<HttpState>, bearer: Bearer) -> ApiResult<HttpResponse> {
    let user = state.auth.current_user(bearer.user()).await?;
    Ok(ApiResponse::with_data("User retrieved successfully", user).respond(StatusCode::OK))
}
