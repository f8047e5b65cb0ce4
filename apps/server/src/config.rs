//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, once, at startup.

use std::env;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Session lifetime in hours
    pub session_ttl_hours: i64,

    /// Lock-wait budget for contended writes, in seconds. A checkout that
    /// cannot take the write lock within this budget fails with a
    /// retryable error instead of hanging its caller.
    pub busy_timeout_secs: u64,

    /// Bootstrap admin credentials. The hardcoded fallback is a bootstrap
    /// convenience only; deployments set the environment variables.
    pub default_admin_user: String,
    pub default_admin_password: String,

    /// Bootstrap seller credentials.
    pub default_seller_user: String,
    pub default_seller_password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "almacen.db".to_string()),

            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| almacen_core::DEFAULT_SESSION_TTL_HOURS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SESSION_TTL_HOURS".to_string()))?,

            busy_timeout_secs: env::var("DB_BUSY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_BUSY_TIMEOUT_SECS".to_string()))?,

            default_admin_user: env::var("DEFAULT_ADMIN_USER")
                .unwrap_or_else(|_| "admin".to_string()),

            default_admin_password: env::var("DEFAULT_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123".to_string()),

            default_seller_user: env::var("DEFAULT_SELLER_USER")
                .unwrap_or_else(|_| "seller".to_string()),

            default_seller_password: env::var("DEFAULT_SELLER_PASSWORD")
                .unwrap_or_else(|_| "seller123".to_string()),
        };

        if config.session_ttl_hours <= 0 {
            return Err(ConfigError::InvalidValue("SESSION_TTL_HOURS".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load() {
        // With a clean environment the defaults must produce a valid config.
        let config = ServerConfig::load().unwrap();
        assert_eq!(config.session_ttl_hours, 12);
        assert_eq!(config.busy_timeout_secs, 5);
        assert_eq!(config.default_admin_user, "admin");
        assert_eq!(config.default_seller_user, "seller");
    }
}
