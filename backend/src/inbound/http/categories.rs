//! Category listing and creation.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Category, CategoryDraft, Error};

use super::ApiResult;
use super::bearer::{Bearer, CATALOGUE_EDITORS};
use super::envelope::{ApiResponse, ErrorEnvelope};
use super::state::HttpState;
use super::validation::{FieldName, PageQuery, parse_body, required, trimmed};

/// Request body for `POST /api/v1/categories`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(
        required(message = "This field is required"),
        length(min = 1, max = 255, message = "Invalid length")
    )]
    #[schema(example = "Analgesics")]
    #[serde(default, deserialize_with = "trimmed")]
    pub name: Option<String>,
    #[schema(example = "Pain relief")]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Value must be greater than or equal to 1"))]
    pub parent_category_id: Option<i64>,
}

impl TryFrom<CategoryRequest> for CategoryDraft {
    type Error = Error;

    fn try_from(value: CategoryRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required(value.name, FieldName::new("name"))?,
            description: value.description.unwrap_or_default(),
            parent_category_id: value.parent_category_id,
        })
    }
}

/// List categories, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of categories", body = ApiResponse<Vec<Category>>),
        (status = 400, description = "Invalid pagination", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["categories"],
    operation_id = "listCategories",
    security(("BearerAuth" = []))
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    _bearer: Bearer,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let page = state
        .categories
        .list(query.into_inner().into_page_request()?)
        .await?;
    Ok(ApiResponse::page("Categories retrieved successfully", page).respond(StatusCode::OK))
}

/// Create a category. Admins and pharmacists only.
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Invalid request or unknown parent", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller may not edit the catalogue", body = ErrorEnvelope)
    ),
    tags = ["categories"],
    operation_id = "createCategory",
    security(("BearerAuth" = []))
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    bearer: Bearer,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    bearer.require_any(CATALOGUE_EDITORS)?;
    let request: CategoryRequest = parse_body(&body)?;
    let category = state
        .category_commands
        .create(CategoryDraft::try_from(request)?)
        .await?;
    Ok(ApiResponse::with_data("Category added successfully", category).respond(StatusCode::CREATED))
}
