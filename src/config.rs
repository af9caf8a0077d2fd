// Application configuration loaded from environment variables

use thiserror::Error;

/// Development-only fallback secret. Deployments must override JWT_SECRET;
/// startup logs a warning when this value is still in use.
pub const DEV_JWT_SECRET: &str = "storefront-dev-secret-change-in-production";

/// Default token lifetime in seconds (1 hour).
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 3600;

/// Configuration loaded once at startup. The signing secret is handed to the
/// token codec at construction and is never logged.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Server bind host (default `0.0.0.0`).
    pub host: String,
    /// Server bind port (default `8080`).
    pub port: String,
    /// HMAC-SHA256 signing secret for bearer tokens.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub token_expiry_secs: i64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set in environment")]
    MissingDatabaseUrl,
    #[error("TOKEN_EXPIRY_SECS must be a positive integer: {0}")]
    InvalidTokenExpiry(String),
}

impl Config {
    /// Load configuration from environment. Call `dotenv::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());

        let token_expiry_secs = match std::env::var("TOKEN_EXPIRY_SECS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTokenExpiry(raw))?,
            Err(_) => DEFAULT_TOKEN_EXPIRY_SECS,
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            token_expiry_secs,
        })
    }

    /// True when the compiled-in development secret is still in use.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_secret_is_flagged() {
        let config = Config {
            database_url: "postgres://localhost/storefront".to_string(),
            host: "0.0.0.0".to_string(),
            port: "8080".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_expiry_secs: DEFAULT_TOKEN_EXPIRY_SECS,
        };
        assert!(config.uses_default_secret());

        let config = Config {
            jwt_secret: "a-real-deployment-secret".to_string(),
            ..config
        };
        assert!(!config.uses_default_secret());
    }
}
