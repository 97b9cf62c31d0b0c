//! Request parsing and validation shared by the HTTP handlers.
//!
//! Bodies go through [`ValidatedJson`], which rejects malformed or empty
//! payloads and then runs the request type's `validator` rules, reporting
//! failures as a field-to-message map. Query and path parameters arrive as
//! raw strings and are parsed here so that bad input yields the same
//! envelope instead of Actix's plain-text rejections.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use chrono::{DateTime, NaiveDate};
use futures_util::future::LocalBoxFuture;
use pagination::{PageRequest, PageRequestError};
use regex::Regex;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value, json};
use tracing::debug;
use utoipa::IntoParams;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::{Error, Role};

const REQUIRED: &str = "This field is required";
const INVALID_EMAIL: &str = "Invalid email format";
const NON_NEGATIVE: &str = "Value must be greater than or equal to 0";
const PASSWORD_RULE: &str = "Password must be at least 8 characters long and contain uppercase, \
     lowercase, number, and special character";
const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";
const INVALID_ROLE: &str = "Role must be either 'cashier' or 'pharmacist' or 'admin'";
const INVALID_DATE: &str = "Date must be YYYY-MM-DD or an RFC 3339 timestamp";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: impl Into<String>) -> Error {
    let mut fields = Map::new();
    fields.insert(field.as_str().to_owned(), Value::String(message.into()));
    Error::invalid_request("Validation failed").with_details(Value::Object(fields))
}

pub(crate) fn malformed_body() -> Error {
    Error::invalid_request("Invalid request body")
        .with_details(json!({ "body": "Request body is invalid or malformed" }))
}

fn empty_body() -> Error {
    Error::invalid_request("Request body cannot be empty")
        .with_details(json!({ "body": "Request body cannot be empty" }))
}

/// Collapse `validator` output into `{field: first message}`.
pub(crate) fn validation_failed(errors: &ValidationErrors) -> Error {
    let fields: BTreeMap<String, String> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, failures)| {
            failures.first().map(|failure| {
                let message = failure
                    .message
                    .as_ref()
                    .map_or_else(|| failure.code.to_string(), ToString::to_string);
                (field.to_string(), message)
            })
        })
        .collect();
    Error::invalid_request("Validation failed").with_details(json!(fields))
}

/// Decode and validate a JSON body in one step.
pub(crate) fn parse_body<T>(body: &[u8]) -> Result<T, Error>
where
    T: DeserializeOwned + Validate,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(empty_body());
    }
    let value: Value = serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, "request body is not JSON");
        malformed_body()
    })?;
    if value.as_object().is_some_and(serde_json::Map::is_empty) {
        return Err(empty_body());
    }
    let request: T = serde_json::from_value(value).map_err(|err| {
        debug!(error = %err, "request body does not match the expected shape");
        malformed_body()
    })?;
    request.validate().map_err(|errors| validation_failed(&errors))?;
    Ok(request)
}

/// JSON body extractor that runs the payload's validation rules.
///
/// # Examples
/// ```ignore
/// async fn create(payload: ValidatedJson<ProductRequest>) -> ApiResult<HttpResponse> {
///     let draft = ProductDraft::try_from(payload.into_inner())?;
///     // ...
/// }
/// ```
pub struct ValidatedJson<T>(T);

impl<T> ValidatedJson<T> {
    /// Unwrap the validated payload.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let bytes = web::Bytes::from_request(req, payload);
        Box::pin(async move {
            let body = bytes.await.map_err(|err| {
                debug!(error = %err, "failed to read request body");
                malformed_body()
            })?;
            parse_body(&body).map(ValidatedJson)
        })
    }
}

/// Listing query parameters. Both default when absent.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1).
    #[param(value_type = Option<u32>, minimum = 1)]
    pub page: Option<String>,
    /// Items per page, 1 to 100 (default 10).
    #[param(value_type = Option<u32>, minimum = 1, maximum = 100)]
    pub page_size: Option<String>,
}

const PAGE: FieldName = FieldName::new("page");
const PAGE_SIZE: FieldName = FieldName::new("page_size");

fn parse_page_number(raw: Option<&str>, field: FieldName) -> Result<Option<u32>, Error> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<u32>().map(Some).map_err(|_| {
        let message = if field == PAGE {
            PageRequestError::PageOutOfRange.to_string()
        } else {
            PageRequestError::PageSizeOutOfRange {
                max: pagination::MAX_PAGE_SIZE,
            }
            .to_string()
        };
        field_error(field, message)
    })
}

impl PageQuery {
    /// Validate into a [`PageRequest`], applying defaults.
    pub(crate) fn into_page_request(self) -> Result<PageRequest, Error> {
        let page = parse_page_number(self.page.as_deref(), PAGE)?;
        let page_size = parse_page_number(self.page_size.as_deref(), PAGE_SIZE)?;
        PageRequest::from_parts(page, page_size).map_err(|err| {
            let field = match err {
                PageRequestError::PageOutOfRange => PAGE,
                PageRequestError::PageSizeOutOfRange { .. } => PAGE_SIZE,
            };
            field_error(field, err.to_string())
        })
    }
}

/// Deserialise an optional string with surrounding whitespace removed.
///
/// Text fields use this so that length and format rules see the value that
/// will be stored.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|value| value.map(|text| text.trim().to_owned()))
}

/// Unwrap a field the validation rules already marked as required.
pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| field_error(field, REQUIRED))
}

/// Parse a positive integer identifier from a path segment.
pub(crate) fn parse_id(raw: &str, field: FieldName) -> Result<i64, Error> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| field_error(field, format!("{} must be a positive integer", field.as_str())))
}

fn rule_violation(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Email shape accepted by registration, login, and supplier records.
pub(crate) fn validate_email(value: &str) -> Result<(), ValidationError> {
    if EMAIL_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(rule_violation("email", INVALID_EMAIL))
    }
}

/// At least 8 characters with an uppercase letter, a lowercase letter, a
/// digit, and a symbol.
pub(crate) fn validate_password(value: &str) -> Result<(), ValidationError> {
    let complex = value.chars().count() >= 8
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    if complex {
        Ok(())
    } else {
        Err(rule_violation("password", PASSWORD_RULE))
    }
}

/// Like [`validate_email`], but an empty string counts as "not given".
pub(crate) fn validate_optional_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Ok(())
    } else {
        validate_email(value)
    }
}

/// Empty means "use the default role"; anything else must name a role.
pub(crate) fn validate_role(value: &str) -> Result<(), ValidationError> {
    parse_role(Some(value))
        .map(|_| ())
        .ok_or_else(|| rule_violation("role", INVALID_ROLE))
}

/// Resolve an optional role name, defaulting to [`Role::Cashier`].
pub(crate) fn parse_role(value: Option<&str>) -> Option<Role> {
    match value.map(str::trim).filter(|role| !role.is_empty()) {
        None => Some(Role::default()),
        Some(role) => role.parse().ok(),
    }
}

pub(crate) fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        Err(rule_violation("gte", NON_NEGATIVE))
    } else {
        Ok(())
    }
}

pub(crate) fn validate_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| rule_violation("date", INVALID_DATE))
}

/// Parse an expiration date already accepted by [`validate_date`].
pub(crate) fn require_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    parse_date(value).ok_or_else(|| field_error(field, INVALID_DATE))
}

/// Resolve a role already accepted by [`validate_role`].
pub(crate) fn require_role(value: Option<&str>, field: FieldName) -> Result<Role, Error> {
    parse_role(value).ok_or_else(|| field_error(field, INVALID_ROLE))
}

/// Drop blank optional strings so they are stored as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Accept a calendar date or a full timestamp, keeping only the date.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|ts| ts.date_naive()))
}

#[cfg(test)]
mod tests;
