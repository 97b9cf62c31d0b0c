//! Product catalogue handlers.
//!
//! ```text
//! GET    /api/v1/products?page=2&page_size=5
//! GET    /api/v1/products/{id}
//! POST   /api/v1/products        (admin, pharmacist)
//! PUT    /api/v1/products/{id}   (admin, pharmacist)
//! DELETE /api/v1/products/{id}   (admin, pharmacist)
//! ```
//!
//! `POST` and `PUT` take the same body and replace every attribute.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, post, put, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Error, Product, ProductDraft};

use super::ApiResult;
use super::bearer::{Bearer, CATALOGUE_EDITORS};
use super::envelope::{ApiResponse, ErrorEnvelope};
use super::schemas::MessageResponseSchema;
use super::state::HttpState;
use super::validation::{
    FieldName, PageQuery, parse_body, parse_id, require_date, required, trimmed, validate_date,
    validate_non_negative_decimal,
};

const PRODUCT_ID: FieldName = FieldName::new("id");

/// Request body for creating or replacing a product.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(
        required(message = "This field is required"),
        length(min = 1, max = 255, message = "Invalid length")
    )]
    #[schema(example = "Panadol")]
    #[serde(default, deserialize_with = "trimmed")]
    pub name: Option<String>,
    #[validate(
        required(message = "This field is required"),
        range(min = 1, message = "Value must be greater than or equal to 1")
    )]
    pub category_id: Option<i64>,
    #[validate(
        required(message = "This field is required"),
        length(min = 1, max = 255, message = "Invalid length")
    )]
    #[schema(example = "Paracetamol")]
    #[serde(default, deserialize_with = "trimmed")]
    pub generic_name: Option<String>,
    pub description: Option<String>,
    /// Accepts a JSON number or a decimal string.
    #[validate(
        required(message = "This field is required"),
        custom(function = "validate_non_negative_decimal")
    )]
    #[schema(value_type = Option<String>, example = "19.99")]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Value must be greater than or equal to 0"))]
    pub stock: Option<i32>,
    #[validate(
        required(message = "This field is required"),
        length(min = 1, max = 50, message = "Invalid length")
    )]
    #[schema(example = "box")]
    #[serde(default, deserialize_with = "trimmed")]
    pub unit: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[validate(required(message = "This field is required"), custom(function = "validate_date"))]
    #[schema(example = "2027-06-30")]
    #[serde(default, deserialize_with = "trimmed")]
    pub expiration_date: Option<String>,
    #[validate(
        required(message = "This field is required"),
        length(min = 1, max = 100, message = "Invalid length")
    )]
    #[schema(example = "8991234567890")]
    #[serde(default, deserialize_with = "trimmed")]
    pub barcode: Option<String>,
    #[validate(
        required(message = "This field is required"),
        range(min = 1, message = "Value must be greater than or equal to 1")
    )]
    pub supplier_id: Option<i64>,
    #[validate(range(min = 0, message = "Value must be greater than or equal to 0"))]
    pub min_stock: Option<i32>,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

impl TryFrom<ProductRequest> for ProductDraft {
    type Error = Error;

    fn try_from(value: ProductRequest) -> Result<Self, Self::Error> {
        let expiration_date = required(value.expiration_date, FieldName::new("expiration_date"))?;
        Ok(Self {
            name: required(value.name, FieldName::new("name"))?,
            category_id: required(value.category_id, FieldName::new("category_id"))?,
            generic_name: required(value.generic_name, FieldName::new("generic_name"))?,
            description: value.description,
            price: required(value.price, FieldName::new("price"))?,
            stock: value.stock.unwrap_or_default(),
            unit: required(value.unit, FieldName::new("unit"))?,
            expiration_date: require_date(&expiration_date, FieldName::new("expiration_date"))?,
            barcode: required(value.barcode, FieldName::new("barcode"))?,
            supplier_id: required(value.supplier_id, FieldName::new("supplier_id"))?,
            min_stock: value.min_stock.unwrap_or_default(),
            is_active: value.is_active.unwrap_or(true),
        })
    }
}

fn product_draft(body: &[u8]) -> Result<ProductDraft, Error> {
    let request: ProductRequest = parse_body(body)?;
    ProductDraft::try_from(request)
}

/// List products, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of products", body = ApiResponse<Vec<Product>>),
        (status = 400, description = "Invalid pagination", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security(("BearerAuth" = []))
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    _bearer: Bearer,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let page = state
        .products
        .list(query.into_inner().into_page_request()?)
        .await?;
    Ok(ApiResponse::page("Products retrieved successfully", page).respond(StatusCode::OK))
}

/// Fetch one product.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "The product", body = ApiResponse<Product>),
        (status = 400, description = "Identifier is not a positive integer", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 404, description = "No such product", body = ErrorEnvelope)
    ),
    tags = ["products"],
    operation_id = "getProduct",
    security(("BearerAuth" = []))
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    _bearer: Bearer,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path, PRODUCT_ID)?;
    let product = state.products.get(id).await?;
    Ok(ApiResponse::with_data("Product retrieved successfully", product).respond(StatusCode::OK))
}

/// Add a product. Admins and pharmacists only.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Invalid request or unknown reference", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller may not edit the catalogue", body = ErrorEnvelope)
    ),
    tags = ["products"],
    operation_id = "createProduct",
    security(("BearerAuth" = []))
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    bearer: Bearer,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    bearer.require_any(CATALOGUE_EDITORS)?;
    let product = state.product_commands.create(product_draft(&body)?).await?;
    Ok(ApiResponse::with_data("Product added successfully", product).respond(StatusCode::CREATED))
}

/// Replace every attribute of a product. Admins and pharmacists only.
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 400, description = "Invalid request or unknown reference", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller may not edit the catalogue", body = ErrorEnvelope),
        (status = 404, description = "No such product", body = ErrorEnvelope)
    ),
    tags = ["products"],
    operation_id = "updateProduct",
    security(("BearerAuth" = []))
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    bearer.require_any(CATALOGUE_EDITORS)?;
    let id = parse_id(&path, PRODUCT_ID)?;
    let product = state
        .product_commands
        .update(id, product_draft(&body)?)
        .await?;
    Ok(ApiResponse::with_data("Product updated successfully", product).respond(StatusCode::OK))
}

/// Remove a product from the catalogue. Admins and pharmacists only.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponseSchema),
        (status = 400, description = "Identifier is not a positive integer", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller may not edit the catalogue", body = ErrorEnvelope),
        (status = 404, description = "No such product", body = ErrorEnvelope)
    ),
    tags = ["products"],
    operation_id = "deleteProduct",
    security(("BearerAuth" = []))
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    bearer: Bearer,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    bearer.require_any(CATALOGUE_EDITORS)?;
    let id = parse_id(&path, PRODUCT_ID)?;
    state.product_commands.delete(id).await?;
    Ok(ApiResponse::message("Product deleted successfully").respond(StatusCode::OK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::json;

    fn minimal_body() -> serde_json::Value {
        json!({
            "name": " Panadol ",
            "category_id": 1,
            "generic_name": "Paracetamol",
            "price": "4.50",
            "unit": "box",
            "expiration_date": "2027-06-30T00:00:00Z",
            "barcode": "123",
            "supplier_id": 2,
        })
    }

    #[rstest]
    fn omitted_fields_take_defaults() {
        let draft = product_draft(minimal_body().to_string().as_bytes()).expect("valid body");

        assert_eq!(draft.name, "Panadol");
        assert_eq!(draft.stock, 0);
        assert_eq!(draft.min_stock, 0);
        assert!(draft.is_active);
        assert_eq!(draft.description, None);
        assert_eq!(draft.price, Decimal::new(450, 2));
        assert_eq!(
            draft.expiration_date,
            NaiveDate::from_ymd_opt(2027, 6, 30).expect("valid date")
        );
    }

    #[rstest]
    #[case("supplier_id", json!(0))]
    #[case("barcode", json!(""))]
    #[case("min_stock", json!(-1))]
    #[case("expiration_date", json!("30/06/2027"))]
    fn rule_violations_name_the_field(#[case] field: &str, #[case] value: serde_json::Value) {
        let mut body = minimal_body();
        body[field] = value;

        let err = product_draft(body.to_string().as_bytes()).expect_err("invalid body");
        assert!(
            err.details().and_then(|d| d.get(field)).is_some(),
            "{field} missing from {:?}",
            err.details()
        );
    }

    #[rstest]
    #[case("name")]
    #[case("generic_name")]
    #[case("unit")]
    #[case("barcode")]
    fn blank_text_is_rejected(#[case] field: &str) {
        let mut body = minimal_body();
        body[field] = json!("   ");

        let err = product_draft(body.to_string().as_bytes()).expect_err("blank field");
        let details = err.details().expect("field map");
        assert_eq!(details[field], "Invalid length");
    }

    #[rstest]
    fn text_fields_are_stored_trimmed() {
        let mut body = minimal_body();
        body["name"] = json!("  Panadol Extra ");
        body["barcode"] = json!(" 899 ");

        let draft = product_draft(body.to_string().as_bytes()).expect("valid body");
        assert_eq!(draft.name, "Panadol Extra");
        assert_eq!(draft.barcode, "899");
    }

    #[rstest]
    fn wrong_types_are_malformed() {
        let mut body = minimal_body();
        body["stock"] = json!("plenty");

        let err = product_draft(body.to_string().as_bytes()).expect_err("invalid body");
        assert_eq!(err.message(), "Invalid request body");
    }
}
