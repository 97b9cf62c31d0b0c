//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings, SettingsError};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use pharmly_backend::Trace;
#[cfg(debug_assertions)]
use pharmly_backend::doc::ApiDoc;
use pharmly_backend::domain::Error;
use pharmly_backend::inbound::http::auth::{current_user, login, register};
use pharmly_backend::inbound::http::categories::{create_category, list_categories};
use pharmly_backend::inbound::http::health::{HealthState, live, ready};
use pharmly_backend::inbound::http::products::{
    create_product, delete_product, get_product, list_products, update_product,
};
use pharmly_backend::inbound::http::state::HttpState;
use pharmly_backend::inbound::http::suppliers::{create_supplier, list_suppliers};
use pharmly_backend::inbound::http::users::list_users;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Render malformed query strings with the error envelope instead of
/// Actix's plain-text rejection.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request("Invalid query parameters")
            .with_details(serde_json::json!({ "query": err.to_string() }))
            .into()
    })
}

/// Assemble the application with every route and middleware.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .app_data(query_config())
        .service(register)
        .service(login)
        .service(current_user)
        .service(list_users)
        .service(list_categories)
        .service(create_category)
        .service(list_suppliers)
        .service(create_supplier)
        .service(list_products)
        .service(get_product)
        .service(create_product)
        .service(update_product)
        .service(delete_product);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the listener is bound.
/// - `config`: pre-built [`ServerConfig`] with the bind address, token
///   settings, and database pool.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Returns [`std::io::Error`] when no database pool was attached, or when
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        tokens,
        db_pool,
    } = config;
    let pool = db_pool.ok_or_else(|| std::io::Error::other("database pool not configured"))?;
    let http_state = build_http_state(&pool, tokens);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
