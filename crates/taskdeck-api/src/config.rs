//! Server configuration read once from the environment.
//!
//! Environment variables:
//!   DATABASE_URL           - PostgreSQL connection string
//!   HOST / PORT            - bind address (default: 0.0.0.0:3000)
//!   JWT_SECRET             - HS256 signing secret (random per process when unset)
//!   JWT_TTL_HOURS          - token lifetime (default: 24)
//!   ALLOWED_ORIGINS        - comma-separated CORS allow-list
//!   RATE_LIMIT_ENABLED     - "true"/"false" (default: true)
//!   RATE_LIMIT_REQUESTS    - requests per period (default: 100)
//!   RATE_LIMIT_PERIOD_SECS - period in seconds (default: 60)
//!   DB_MAX_CONNECTIONS     - pool size (default: 10)
//!   LOG_FORMAT             - "json" or "text" (default: "text")
//!   LOG_FILE               - path to log file (optional, enables file logging)
//!   LOG_ANSI               - "true"/"false" override ANSI colors

use std::num::NonZeroU32;
use std::time::Duration;

use axum::http::HeaderValue;
use rand::distributions::Alphanumeric;
use rand::Rng;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/taskdeck";
const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
const DEFAULT_RATE_LIMIT_REQUESTS: NonZeroU32 = match NonZeroU32::new(100) {
    Some(n) => n,
    None => NonZeroU32::MIN,
};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub file: Option<String>,
    pub ansi: Option<bool>,
}

/// Global request quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests: NonZeroU32,
    pub period: Duration,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// True when no JWT_SECRET was configured and a random one was generated.
    pub jwt_secret_generated: bool,
    pub jwt_ttl_hours: i64,
    pub allowed_origins: Vec<String>,
    /// `None` disables rate limiting.
    pub rate_limit: Option<RateLimitConfig>,
    pub db_max_connections: u32,
    pub logging: LoggingConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable numbers fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let flag = |key: &str| var(key).map(|v| v == "true" || v == "1");

        let (jwt_secret, jwt_secret_generated) = match var("JWT_SECRET") {
            Some(secret) => (secret, false),
            None => (random_secret(), true),
        };

        let rate_limit = if flag("RATE_LIMIT_ENABLED").unwrap_or(true) {
            let requests = var("RATE_LIMIT_REQUESTS")
                .and_then(|v| v.parse::<u32>().ok())
                .and_then(NonZeroU32::new)
                .unwrap_or(DEFAULT_RATE_LIMIT_REQUESTS);
            let period_secs = var("RATE_LIMIT_PERIOD_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|&s| s > 0)
                .unwrap_or(60);
            Some(RateLimitConfig {
                requests,
                period: Duration::from_secs(period_secs),
            })
        } else {
            None
        };

        let format = match var("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT").and_then(|v| v.parse().ok()).unwrap_or(3000),
            jwt_secret,
            jwt_secret_generated,
            jwt_ttl_hours: var("JWT_TTL_HOURS")
                .and_then(|v| v.parse().ok())
                .filter(|&h: &i64| h > 0)
                .unwrap_or(24),
            allowed_origins: split_origins(
                &var("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ORIGINS.to_string()),
            ),
            rate_limit,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .filter(|&n: &u32| n > 0)
                .unwrap_or(10),
            logging: LoggingConfig {
                format,
                file: var("LOG_FILE"),
                ansi: flag("LOG_ANSI"),
            },
        }
    }

    /// Origins that parse as header values; invalid entries are logged and skipped.
    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
