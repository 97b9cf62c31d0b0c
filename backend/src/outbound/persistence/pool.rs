//! Shared `bb8` pool of async PostgreSQL connections.
//!
//! One pool backs the user, category, supplier, and product repositories.
//! Each repository call checks a connection out, runs its statements inside
//! a single transaction, and drops the connection back into the pool.
//! Sizing comes from `PHARMLY_DB_MAX_CONNECTIONS` via the server settings.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Connections kept warm when the caller does not choose.
const DEFAULT_MIN_IDLE: u32 = 2;
const DEFAULT_MAX_SIZE: u32 = 10;
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Database availability failures.
///
/// Repositories report both variants to callers as a storage outage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became free before the checkout timeout, or the
    /// server refused a new one.
    #[error("database unavailable: {message}")]
    Unavailable { message: String },

    /// The pool or the schema could not be prepared at startup.
    #[error("database startup failed: {message}")]
    Startup { message: String },
}

impl PoolError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn startup(message: impl Into<String>) -> Self {
        Self::Startup {
            message: message.into(),
        }
    }
}

/// Connection string and sizing for [`DbPool`].
///
/// The idle floor never exceeds the ceiling: shrinking `max_size` below the
/// current `min_idle` lowers `min_idle` with it.
///
/// # Example
///
/// ```ignore
/// let config = PoolConfig::new("postgres://pharmly@localhost/pharmly")
///     .with_max_size(4)
///     .with_connection_timeout(Duration::from_secs(5));
/// assert_eq!(config.min_idle(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Ten connections, two kept idle, thirty second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            min_idle: Some(DEFAULT_MIN_IDLE),
            connection_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self.min_idle = self.min_idle.map(|idle| idle.min(max_size));
        self
    }

    /// `None` lets the pool drain to zero idle connections.
    #[must_use]
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle.map(|idle| idle.min(self.max_size));
        self
    }

    /// How long a repository call waits for a free connection.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn min_idle(&self) -> Option<u32> {
        self.min_idle
    }

    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }
}

/// Cloneable handle to the shared pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and open the idle connections.
    ///
    /// # Errors
    ///
    /// [`PoolError::Startup`] when the URL is rejected or the first
    /// connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::startup(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check a connection out for one repository call.
    ///
    /// # Errors
    ///
    /// [`PoolError::Unavailable`] when the checkout times out or the
    /// connection cannot be established.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::unavailable(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const URL: &str = "postgres://pharmly@localhost/pharmly";

    #[rstest]
    fn fresh_config_uses_service_defaults() {
        let config = PoolConfig::new(URL);

        assert_eq!(config.database_url(), URL);
        assert_eq!(config.max_size(), 10);
        assert_eq!(config.min_idle(), Some(2));
        assert_eq!(config.connection_timeout(), Duration::from_secs(30));
    }

    #[rstest]
    #[case(1, Some(1))]
    #[case(2, Some(2))]
    #[case(8, Some(2))]
    fn shrinking_the_pool_caps_the_idle_floor(#[case] max: u32, #[case] idle: Option<u32>) {
        let config = PoolConfig::new(URL).with_max_size(max);
        assert_eq!(config.min_idle(), idle);
    }

    #[rstest]
    fn idle_floor_above_ceiling_is_capped() {
        let config = PoolConfig::new(URL)
            .with_max_size(3)
            .with_min_idle(Some(7));
        assert_eq!(config.min_idle(), Some(3));
    }

    #[rstest]
    fn idle_floor_can_be_disabled() {
        let config = PoolConfig::new(URL).with_min_idle(None).with_max_size(4);
        assert_eq!(config.min_idle(), None);
    }

    #[rstest]
    #[case(PoolError::unavailable("timed out"), "database unavailable: timed out")]
    #[case(PoolError::startup("bad url"), "database startup failed: bad url")]
    fn errors_render_their_cause(#[case] error: PoolError, #[case] rendered: &str) {
        assert_eq!(error.to_string(), rendered);
    }
}
