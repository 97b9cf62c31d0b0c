//! JSON envelopes wrapped around every response body.
//!
//! Success: `{status: "success", message, data?, pagination?}`.
//! Failure: `{status: "error", code, message, errors?, traceId?}`.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use pagination::{PageDescriptor, Paginated};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

use super::schemas::PaginationSchema;

/// Outcome marker carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request succeeded.
    Success,
    /// The request failed; see `code` and `message`.
    Error,
}

/// Success envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `success`.
    pub status: ResponseStatus,
    /// Human-readable summary.
    pub message: String,
    /// Payload, absent for operations that return nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Navigation metadata on listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<PaginationSchema>)]
    pub pagination: Option<PageDescriptor>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Envelope a single payload.
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(data),
            pagination: None,
        }
    }

    /// Serialise with the given status code.
    pub fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl ApiResponse<()> {
    /// Envelope with a message only.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: None,
            pagination: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Envelope one page of a listing.
    pub fn page(message: impl Into<String>, page: Paginated<T>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(page.data),
            pagination: Some(page.pagination),
        }
    }
}

/// Failure envelope rendered from a domain [`Error`].
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `error`.
    pub status: ResponseStatus,
    /// Stable machine-readable category.
    pub code: ErrorCode,
    /// Human-readable message.
    #[schema(example = "Validation failed")]
    pub message: String,
    /// Field-by-field messages for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<Value>,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl From<&Error> for ErrorEnvelope {
    fn from(error: &Error) -> Self {
        Self {
            status: ResponseStatus::Error,
            code: error.code(),
            message: error.message().to_owned(),
            errors: error.details().cloned(),
            trace_id: error.trace_id().map(ToOwned::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagination::PageRequest;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn page_envelope_carries_pagination() {
        let request = PageRequest::new(2, 5).expect("valid request");
        let page = Paginated::new(vec![1, 2, 3, 4, 5], 12, request);
        let value = serde_json::to_value(ApiResponse::page("Products retrieved successfully", page))
            .expect("serialise");

        assert_eq!(value["status"], "success");
        assert_eq!(value["data"], json!([1, 2, 3, 4, 5]));
        assert_eq!(value["pagination"]["total_pages"], 3);
        assert_eq!(value["pagination"]["next_page"], 3);
        assert_eq!(value["pagination"]["previous_page"], 1);
    }

    #[rstest]
    fn message_envelope_omits_data_and_pagination() {
        let value = serde_json::to_value(ApiResponse::message("Product deleted successfully"))
            .expect("serialise");

        assert_eq!(
            value,
            json!({ "status": "success", "message": "Product deleted successfully" })
        );
    }

    #[rstest]
    fn error_envelope_uses_camel_case_trace_id() {
        let error = Error::conflict("email already registered").with_trace_id("abc");
        let value = serde_json::to_value(ErrorEnvelope::from(&error)).expect("serialise");

        assert_eq!(
            value,
            json!({
                "status": "error",
                "code": "conflict",
                "message": "email already registered",
                "traceId": "abc"
            })
        );
    }
}
