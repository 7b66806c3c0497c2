//! Server configuration loaded from the environment.

use std::fmt;
use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";

/// Configuration error raised at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read `DATABASE_URL`, `COSMOPORT_HOST`, `COSMOPORT_PORT`, and
    /// `COSMOPORT_UI_ORIGINS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError {
                message: "DATABASE_URL must be set to a PostgreSQL connection string".to_string(),
            })?;
        let host = lookup("COSMOPORT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("COSMOPORT_PORT") {
            Some(raw) => u16::from_str(raw.trim()).map_err(|_| ConfigError {
                message: format!("COSMOPORT_PORT must be a u16 number, got {raw:?}"),
            })?,
            None => DEFAULT_PORT,
        };
        let origins = lookup("COSMOPORT_UI_ORIGINS").unwrap_or_else(|| DEFAULT_ORIGINS.to_string());
        let allowed_origins = origins
            .split(',')
            .map(|value| value.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            database_url,
            host,
            port,
            allowed_origins,
        })
    }
}
