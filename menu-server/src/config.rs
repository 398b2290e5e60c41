//! Server configuration, read from the environment

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const ENVIRONMENTS: &[&str] = &["development", "staging", "production", "test"];

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:5174",
];

/// Menu server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host (env: SERVER_HOST)
    pub host: String,
    /// HTTP port (env: SERVER_PORT)
    pub port: u16,
    /// development | staging | production | test (env: SERVER_ENVIRONMENT)
    pub environment: String,
    /// Per-request timeout (env: SERVER_REQUEST_TIMEOUT, seconds)
    pub request_timeout: Duration,
    /// PostgreSQL connection URL (env: DATABASE_URL, or assembled from DB_*)
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    /// S3 bucket for menu images
    pub s3_bucket: String,
    /// Region of the bucket (env: S3_REGION, falls back to AWS_REGION)
    pub s3_region: String,
    /// Menu cache entry lifetime
    pub cache_ttl: Duration,
    pub rate_limit_enabled: bool,
    /// Fixed window length for rate limiting
    pub rate_limit_window: Duration,
    pub cors_allowed_origins: Vec<String>,
    /// Default log filter when RUST_LOG is unset (env: LOG_LEVEL)
    pub log_level: String,
    /// json | text (env: LOG_FORMAT)
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{user}:{password}@{host}:{port}/{name}?sslmode={ssl}",
                user = or("DB_USER", "postgres"),
                password = or("DB_PASSWORD", ""),
                host = or("DB_HOST", "localhost"),
                port = or("DB_PORT", "5432"),
                name = or("DB_NAME", "restaurant_menu"),
                ssl = or("DB_SSL_MODE", "disable"),
            ),
        };

        let aws_region = or("AWS_REGION", "us-east-1");

        let config = Self {
            host: or("SERVER_HOST", "0.0.0.0"),
            port: parse(&var, "SERVER_PORT", 8000)?,
            environment: or("SERVER_ENVIRONMENT", "development"),
            request_timeout: Duration::from_secs(parse(&var, "SERVER_REQUEST_TIMEOUT", 30)?),
            database_url,
            db_max_connections: parse(&var, "DB_MAX_CONNS", 25)?,
            db_min_connections: parse(&var, "DB_MIN_CONNS", 5)?,
            s3_bucket: or("S3_BUCKET", "restaurant-menu-images"),
            s3_region: var("S3_REGION").unwrap_or(aws_region),
            cache_ttl: Duration::from_secs(parse(&var, "CACHE_TTL_SECONDS", 300)?),
            rate_limit_enabled: parse(&var, "RATE_LIMIT_ENABLED", true)?,
            rate_limit_window: Duration::from_secs(parse(&var, "RATE_LIMIT_WINDOW_SECONDS", 60)?),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()),
            log_level: or("LOG_LEVEL", "info"),
            log_format: or("LOG_FORMAT", "json"),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), BoxError> {
        if self.port == 0 {
            return Err("SERVER_PORT must be greater than 0".into());
        }
        if !ENVIRONMENTS.contains(&self.environment.as_str()) {
            return Err(format!(
                "SERVER_ENVIRONMENT must be one of {}, got '{}'",
                ENVIRONMENTS.join(", "),
                self.environment
            )
            .into());
        }
        if self.db_max_connections == 0 {
            return Err("DB_MAX_CONNS must be at least 1".into());
        }
        if self.db_min_connections > self.db_max_connections {
            return Err("DB_MIN_CONNS must not exceed DB_MAX_CONNS".into());
        }
        if self.rate_limit_window.is_zero() {
            return Err("RATE_LIMIT_WINDOW_SECONDS must be greater than 0".into());
        }
        if self.s3_bucket.is_empty() {
            return Err("S3_BUCKET must not be empty".into());
        }
        Ok(())
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse<T, F>(var: &F, key: &str, default: T) -> Result<T, BoxError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{key} has an invalid value: '{raw}'").into()),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, BoxError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(
            config.database_url,
            "postgres://postgres:@localhost:5432/restaurant_menu?sslmode=disable"
        );
        assert_eq!(config.db_max_connections, 25);
        assert_eq!(config.s3_bucket, "restaurant-menu-images");
        assert_eq!(config.s3_region, "us-east-1");
        assert_eq!(config.cors_allowed_origins.len(), 3);
        assert!(config.rate_limit_enabled);
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://u:p@db/menu"),
            ("SERVER_PORT", "9090"),
            ("SERVER_ENVIRONMENT", "production"),
            ("AWS_REGION", "me-central-1"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("RATE_LIMIT_ENABLED", "false"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "postgres://u:p@db/menu");
        assert_eq!(config.port, 9090);
        assert!(config.is_production());
        assert_eq!(config.s3_region, "me-central-1");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(!config.rate_limit_enabled);
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("SERVER_ENVIRONMENT", "qa")]).is_err());
        assert!(load(&[("SERVER_PORT", "eighty")]).is_err());
        assert!(load(&[("SERVER_PORT", "0")]).is_err());
        assert!(load(&[("DB_MAX_CONNS", "0")]).is_err());
        assert!(load(&[("DB_MAX_CONNS", "2"), ("DB_MIN_CONNS", "3")]).is_err());
    }
}
