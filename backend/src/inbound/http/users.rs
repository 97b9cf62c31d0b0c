//! Staff directory handlers.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, web};

use crate::domain::User;

use super::ApiResult;
use super::bearer::{ADMINISTRATORS, Bearer};
use super::envelope::{ApiResponse, ErrorEnvelope};
use super::state::HttpState;
use super::validation::PageQuery;

/// List staff accounts, most recently updated first. Admins only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of users", body = ApiResponse<Vec<User>>),
        (status = 400, description = "Invalid pagination", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller is not an admin", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("BearerAuth" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    bearer: Bearer,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    bearer.require_any(ADMINISTRATORS)?;
    let page = state.users.list(query.into_inner().into_page_request()?).await?;
    Ok(ApiResponse::page("Users retrieved successfully", page).respond(StatusCode::OK))
}
