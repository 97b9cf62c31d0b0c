//! Startup settings and the HTTP server configuration object.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use pharmly_backend::outbound::persistence::{DbPool, PoolConfig};
use pharmly_backend::outbound::security::TokenSettings;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ISSUER: &str = "pharmly";

/// Problems found while turning loaded settings into runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// `PHARMLY_DATABASE_URL` was not supplied.
    #[error("database_url is required")]
    MissingDatabaseUrl,
    /// `PHARMLY_JWT_SECRET` was not supplied or is blank.
    #[error("jwt_secret is required")]
    MissingJwtSecret,
    /// The bind address is not `host:port`.
    #[error("bind_addr `{value}` is not a socket address")]
    InvalidBindAddr { value: String },
    /// Token lifetime must be at least one minute.
    #[error("token_ttl_minutes must be positive, got {value}")]
    InvalidTokenTtl { value: i64 },
    /// A pool needs at least one connection.
    #[error("db_max_connections must be positive")]
    InvalidPoolSize,
}

/// Settings loaded from the command line, `PHARMLY_*` environment
/// variables, and configuration files.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PHARMLY")]
pub struct ServerSettings {
    /// Listen address, `0.0.0.0:8080` by default.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// HS256 signing secret for access tokens.
    pub jwt_secret: Option<String>,
    /// Access token lifetime in minutes, one day by default.
    #[ortho_config(default = 1440)]
    pub token_ttl_minutes: i64,
    /// `iss` claim written to and required on tokens.
    pub issuer: Option<String>,
}

impl ServerSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Pool settings for the configured database.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)?;
        let max_size = self.db_max_connections;
        if max_size == 0 {
            return Err(SettingsError::InvalidPoolSize);
        }
        Ok(PoolConfig::new(url).with_max_size(max_size))
    }

    /// Signing parameters for access tokens. The secret is moved into
    /// zeroizing storage.
    pub fn token_settings(&self) -> Result<TokenSettings, SettingsError> {
        let secret = self
            .jwt_secret
            .clone()
            .filter(|secret| !secret.trim().is_empty())
            .map(Zeroizing::new)
            .ok_or(SettingsError::MissingJwtSecret)?;
        let ttl = self.token_ttl_minutes;
        if ttl <= 0 {
            return Err(SettingsError::InvalidTokenTtl { value: ttl });
        }
        let issuer = self.issuer.as_deref().unwrap_or(DEFAULT_ISSUER);
        Ok(TokenSettings::new(secret, issuer, ttl))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from the listen address and token
    /// settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: TokenSettings) -> Self {
        Self {
            bind_addr,
            tokens,
            db_pool: None,
        }
    }

    /// Attach the database connection pool backing every repository.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
