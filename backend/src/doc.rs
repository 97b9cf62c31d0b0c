//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every handler in the inbound HTTP layer plus the health probes
//! - **Schemas**: entities, request bodies, and the success and error envelopes
//! - **Security**: bearer token authentication, applied to every operation
//!   that does not opt out
//!
//! The generated specification is served by Swagger UI in debug builds.

use crate::domain::{AuthSession, Category, ErrorCode, Product, Role, Supplier, User, UserStatus};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::categories::CategoryRequest;
use crate::inbound::http::envelope::{ErrorEnvelope, ResponseStatus};
use crate::inbound::http::products::ProductRequest;
use crate::inbound::http::schemas::{MessageResponseSchema, PaginationSchema};
use crate::inbound::http::suppliers::SupplierRequest;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/v1/auth/register or /api/v1/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pharmly backend API",
        description = "Staff accounts, product catalogue, categories, and suppliers for a pharmacy.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::suppliers::list_suppliers,
        crate::inbound::http::suppliers::create_supplier,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Role,
        UserStatus,
        AuthSession,
        Category,
        Supplier,
        Product,
        RegisterRequest,
        LoginRequest,
        CategoryRequest,
        SupplierRequest,
        ProductRequest,
        ErrorEnvelope,
        ErrorCode,
        ResponseStatus,
        PaginationSchema,
        MessageResponseSchema,
    )),
    tags(
        (name = "auth", description = "Registration, sign-in, and the caller's profile"),
        (name = "users", description = "Staff directory"),
        (name = "categories", description = "Product categories"),
        (name = "suppliers", description = "Suppliers"),
        (name = "products", description = "Product catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure and registered paths.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    fn schema(name: &str) -> RefOr<Schema> {
        let doc = ApiDoc::openapi();
        doc.components
            .expect("components")
            .schemas
            .remove(name)
            .unwrap_or_else(|| panic!("{name} schema registered"))
    }

    #[rstest]
    #[case("ErrorEnvelope", "code")]
    #[case("ErrorEnvelope", "traceId")]
    #[case("Product", "price")]
    #[case("Product", "expiration_date")]
    #[case("User", "email")]
    #[case("Pagination", "has_next_page")]
    #[case("RegisterRequest", "role")]
    fn schemas_expose_fields(#[case] name: &str, #[case] field: &str) {
        assert_object_schema_has_field(&schema(name), field);
    }

    #[rstest]
    fn user_schema_hides_password_hash() {
        let RefOr::T(Schema::Object(user)) = schema("User") else {
            panic!("expected Object schema");
        };
        assert!(!user.properties.contains_key("password_hash"));
    }

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/products/{id}")]
    #[case("/api/v1/suppliers")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
