//! Backend entry-point: loads settings, migrates the schema, and serves the
//! REST API with OpenAPI docs in debug builds.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pharmly_backend::inbound::http::health::HealthState;
use pharmly_backend::outbound::persistence::{DbPool, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let tokens = settings.token_settings().map_err(std::io::Error::other)?;
    let pool_config = settings.pool_config().map_err(std::io::Error::other)?;

    run_pending_migrations(pool_config.database_url())
        .await
        .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, tokens).with_db_pool(pool);
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}
