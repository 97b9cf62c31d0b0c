//! Supplier listing and creation.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Error, Supplier, SupplierDraft};

use super::ApiResult;
use super::bearer::{Bearer, CATALOGUE_EDITORS};
use super::envelope::{ApiResponse, ErrorEnvelope};
use super::state::HttpState;
use super::validation::{
    FieldName, PageQuery, non_blank, parse_body, required, trimmed, validate_optional_email,
};

/// Request body for `POST /api/v1/suppliers`.
///
/// Contact fields are optional; blank strings are stored as absent.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SupplierRequest {
    #[validate(
        required(message = "This field is required"),
        length(min = 1, max = 255, message = "Invalid length")
    )]
    #[schema(example = "Acme Pharma")]
    #[serde(default, deserialize_with = "trimmed")]
    pub name: Option<String>,
    #[validate(length(max = 255, message = "Invalid length"))]
    #[serde(default, deserialize_with = "trimmed")]
    pub contact_person: Option<String>,
    #[validate(length(max = 50, message = "Invalid length"))]
    #[serde(default, deserialize_with = "trimmed")]
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(custom(function = "validate_optional_email"))]
    #[schema(example = "orders@acme.example")]
    #[serde(default, deserialize_with = "trimmed")]
    pub email: Option<String>,
}

impl TryFrom<SupplierRequest> for SupplierDraft {
    type Error = Error;

    fn try_from(value: SupplierRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required(value.name, FieldName::new("name"))?,
            contact_person: non_blank(value.contact_person),
            phone: non_blank(value.phone),
            address: non_blank(value.address),
            email: non_blank(value.email),
        })
    }
}

/// List suppliers, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of suppliers", body = ApiResponse<Vec<Supplier>>),
        (status = 400, description = "Invalid pagination", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope)
    ),
    tags = ["suppliers"],
    operation_id = "listSuppliers",
    security(("BearerAuth" = []))
)]
#[get("/suppliers")]
pub async fn list_suppliers(
    state: web::Data<HttpState>,
    _bearer: Bearer,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let page = state
        .suppliers
        .list(query.into_inner().into_page_request()?)
        .await?;
    Ok(ApiResponse::page("Suppliers retrieved successfully", page).respond(StatusCode::OK))
}

/// Create a supplier. Admins and pharmacists only.
#[utoipa::path(
    post,
    path = "/api/v1/suppliers",
    request_body = SupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = ApiResponse<Supplier>),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorEnvelope),
        (status = 403, description = "Caller may not edit the catalogue", body = ErrorEnvelope)
    ),
    tags = ["suppliers"],
    operation_id = "createSupplier",
    security(("BearerAuth" = []))
)]
#[post("/suppliers")]
pub async fn create_supplier(
    state: web::Data<HttpState>,
    bearer: Bearer,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    bearer.require_any(CATALOGUE_EDITORS)?;
    let request: SupplierRequest = parse_body(&body)?;
    let supplier = state
        .supplier_commands
        .create(SupplierDraft::try_from(request)?)
        .await?;
    Ok(ApiResponse::with_data("Supplier added successfully", supplier).respond(StatusCode::CREATED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn blank_names_are_rejected() {
        let err = parse_body::<SupplierRequest>(br#"{"name": "   "}"#).expect_err("blank name");
        let details = err.details().expect("field map");
        assert_eq!(details["name"], "Invalid length");
    }

    #[rstest]
    fn blank_contact_fields_are_stored_as_absent() {
        let request: SupplierRequest = parse_body(
            br#"{"name": " Acme ", "contact_person": " ", "phone": "", "email": "  "}"#,
        )
        .expect("valid body");
        let draft = SupplierDraft::try_from(request).expect("converts");
        assert_eq!(draft.name, "Acme");
        assert_eq!(draft.contact_person, None);
        assert_eq!(draft.phone, None);
        assert_eq!(draft.email, None);
    }

    #[rstest]
    fn padded_emails_are_validated_trimmed() {
        let request: SupplierRequest =
            parse_body(br#"{"name": "Acme", "email": " orders@acme.example "}"#)
                .expect("valid body");
        let draft = SupplierDraft::try_from(request).expect("converts");
        assert_eq!(draft.email.as_deref(), Some("orders@acme.example"));
    }
}
