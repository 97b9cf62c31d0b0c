//! Embedded schema migrations applied at startup.
//!
//! Migrations are compiled into the binary from `backend/migrations` and
//! run on a short-lived synchronous connection, because `diesel_migrations`
//! has no async harness.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::PoolError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to the database at `database_url`.
///
/// # Errors
///
/// Returns [`PoolError::Startup`] when the connection cannot be opened or a
/// migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), PoolError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || apply_migrations(&url))
        .await
        .map_err(|err| PoolError::startup(format!("migration task failed: {err}")))?
}

fn apply_migrations(database_url: &str) -> Result<(), PoolError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| PoolError::startup(format!("migration connection failed: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PoolError::startup(format!("migration failed: {err}")))?;
    info!(count = applied.len(), "database migrations applied");
    Ok(())
}
