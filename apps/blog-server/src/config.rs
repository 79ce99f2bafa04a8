//! Application configuration loaded from environment variables.

use std::env;

use blog_infra::JwtConfig;
use blog_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub production: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: parse_var("JWT_EXPIRATION_HOURS").unwrap_or(defaults.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            jwt,
            production: env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false),
        }
    }

    pub fn warn_about_insecure_defaults(&self) {
        if !self.jwt.uses_default_secret() {
            return;
        }
        if self.production {
            tracing::error!(
                "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
            );
        } else {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
