//! Service configuration from the environment.

use std::net::SocketAddr;

use thiserror::Error;

use crate::offers::DEFAULT_OFFER_COUNT;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub offer_count: usize,
    pub db_max_connections: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url.as_ref().map(|_| "[redacted]"))
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("offer_count", &self.offer_count)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

impl AppConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set to an unparsable value.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Core parsing, decoupled from the real environment so tests can feed a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar { var: var.to_string(), reason };

        let mut bind_addr: SocketAddr = present("STOREFRONT_BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8083".to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| invalid("STOREFRONT_BIND_ADDR", e.to_string()))?;
        if let Some(port) = present("PORT") {
            bind_addr.set_port(port.parse().map_err(|e: std::num::ParseIntError| invalid("PORT", e.to_string()))?);
        }

        let offer_count = match present("STOREFRONT_OFFER_COUNT") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| invalid("STOREFRONT_OFFER_COUNT", e.to_string()))?,
            None => DEFAULT_OFFER_COUNT,
        };
        let db_max_connections = match present("STOREFRONT_DB_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| invalid("STOREFRONT_DB_MAX_CONNECTIONS", e.to_string()))?,
            None => 10,
        };

        Ok(Self {
            database_url: present("DATABASE_URL"),
            bind_addr,
            log_level: present("STOREFRONT_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            offer_count,
            db_max_connections,
        })
    }
}
