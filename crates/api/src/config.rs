//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BV_DATABASE_URL` (or generic `DATABASE_URL`) - `PostgreSQL` connection
//!   string; when absent the server falls back to the volatile in-memory
//!   store. Required when `BV_ENV=production` - a production deployment must
//!   never silently run on a store that loses all data on restart.
//! - `BV_ENV` - `development` (default) or `production`
//! - `BV_HOST` - Bind address (default: 127.0.0.1)
//! - `BV_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error(
        "BV_ENV=production requires a database: set BV_DATABASE_URL or DATABASE_URL \
         (refusing to fall back to the volatile in-memory store)"
    )]
    ProductionWithoutDatabase,
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Whether this is a production deployment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "unknown environment '{other}' (expected development or production)"
            )),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `PostgreSQL` connection URL (contains password). `None` selects the
    /// volatile in-memory store.
    pub database_url: Option<SecretString>,
    /// Deployment mode.
    pub environment: Environment,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails to parse, or if the
    /// deployment mode is production and no database URL is configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = get_env_or_default("BV_ENV", "development")
            .parse::<Environment>()
            .map_err(|e| ConfigError::InvalidEnvVar("BV_ENV".to_string(), e))?;
        let database_url = get_database_url("BV_DATABASE_URL");
        ensure_persistent_store(environment, database_url.is_some())?;

        let host = get_env_or_default("BV_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BV_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BV_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BV_PORT".to_string(), e.to_string()))?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            environment,
            host,
            port,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Fail fast instead of silently losing data: production must run against
/// the persistent store.
const fn ensure_persistent_store(
    environment: Environment,
    has_database: bool,
) -> Result<(), ConfigError> {
    if environment.is_production() && !has_database {
        return Err(ConfigError::ProductionWithoutDatabase);
    }
    Ok(())
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by managed
/// postgres attach).
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    if let Ok(value) = std::env::var(primary_key) {
        return Some(SecretString::from(value));
    }
    std::env::var("DATABASE_URL").ok().map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_production_requires_database() {
        let result = ensure_persistent_store(Environment::Production, false);
        assert!(matches!(
            result,
            Err(ConfigError::ProductionWithoutDatabase)
        ));
    }

    #[test]
    fn test_development_allows_volatile_store() {
        assert!(ensure_persistent_store(Environment::Development, false).is_ok());
        assert!(ensure_persistent_store(Environment::Production, true).is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config {
            database_url: None,
            environment: Environment::Development,
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = Config {
            database_url: Some(SecretString::from("postgres://user:hunter2@db/bv")),
            environment: Environment::Production,
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            sentry_dsn: None,
        };

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
