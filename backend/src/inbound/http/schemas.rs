//! OpenAPI schema definitions for types outside this crate.
//!
//! The `pagination` crate stays free of utoipa, so its descriptor is
//! documented here with a mirror struct registered under the name
//! `Pagination`.

use utoipa::ToSchema;

/// OpenAPI schema for [`pagination::PageDescriptor`].
#[derive(ToSchema)]
#[schema(as = Pagination)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaginationSchema {
    /// Number of items across every page.
    #[schema(example = 12)]
    total_items: u64,
    /// Number of pages needed to show every item.
    #[schema(example = 3)]
    total_pages: u64,
    /// The page this descriptor belongs to.
    #[schema(example = 2)]
    current_page: u32,
    /// Items per page.
    #[schema(example = 5)]
    page_size: u32,
    /// Whether a page follows this one.
    has_next_page: bool,
    /// Whether a page precedes this one.
    has_prev_page: bool,
    /// `current_page + 1`; check `has_next_page` before following it.
    next_page: Option<u32>,
    /// `current_page - 1`, null on the first page.
    previous_page: Option<u32>,
}

/// OpenAPI schema for a success envelope that carries no payload.
#[derive(ToSchema)]
#[schema(as = MessageResponse)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MessageResponseSchema {
    /// Always `success`.
    #[schema(example = "success")]
    status: String,
    /// Human-readable summary.
    #[schema(example = "Product deleted successfully")]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;
    use utoipa::{PartialSchema, ToSchema as _};

    #[rstest]
    fn pagination_schema_mirrors_descriptor_fields() {
        assert_eq!(PaginationSchema::name(), "Pagination");
        let RefOr::T(Schema::Object(object)) = PaginationSchema::schema() else {
            panic!("expected object schema");
        };
        for field in [
            "total_items",
            "total_pages",
            "current_page",
            "page_size",
            "has_next_page",
            "has_prev_page",
            "next_page",
            "previous_page",
        ] {
            assert!(object.properties.contains_key(field), "missing {field}");
        }
    }

    #[rstest]
    fn message_response_has_no_payload() {
        assert_eq!(MessageResponseSchema::name(), "MessageResponse");
        let RefOr::T(Schema::Object(object)) = MessageResponseSchema::schema() else {
            panic!("expected object schema");
        };
        assert!(object.properties.contains_key("message"));
        assert!(!object.properties.contains_key("data"));
    }
}
