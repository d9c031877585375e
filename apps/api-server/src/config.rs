//! Application configuration loaded from environment variables.

use std::env;

use lectern_core::services::CorePolicy;
use lectern_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub policy: CorePolicy,
    pub request_limit: RequestLimitConfig,
}

/// Coarse per-IP request limit applied at the middleware layer, in front
/// of the per-action limits the core enforces.
#[derive(Debug, Clone)]
pub struct RequestLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        });

        let policy = CorePolicy {
            allow_before_start: env::var("ALLOW_QA_BEFORE_START")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            rate_limit_fail_open: env::var("RATE_LIMIT_FAIL_OPEN")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            policy,
            request_limit: RequestLimitConfig {
                max_requests: env::var("REQUEST_LIMIT_MAX")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
                window_secs: env::var("REQUEST_LIMIT_WINDOW_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            },
        }
    }
}
