//! Application state shared by all handlers

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::BoxError;
use crate::middleware::RateLimiter;

/// S3 client plus the bucket menu images live in
#[derive(Clone)]
pub struct S3Storage {
    pub client: S3Client,
    pub bucket: String,
    pub region: String,
}

impl S3Storage {
    /// Public object URL (virtual-hosted style)
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }
}

#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Image storage
    pub s3: S3Storage,
    /// Menu read cache
    pub cache: Cache,
    pub rate_limiter: RateLimiter,
    pub config: Arc<Config>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Connect to Postgres, apply pending migrations and build the AWS clients
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(300))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.s3_region.clone()))
            .load()
            .await;
        let client = S3Client::new(&aws_config);

        Ok(Self::from_parts(config.clone(), pool, client))
    }

    /// Assemble state from already-built clients
    pub fn from_parts(config: Config, pool: PgPool, client: S3Client) -> Self {
        let s3 = S3Storage {
            client,
            bucket: config.s3_bucket.clone(),
            region: config.s3_region.clone(),
        };
        Self {
            pool,
            s3,
            cache: Cache::new(config.cache_ttl),
            rate_limiter: RateLimiter::new(config.rate_limit_window),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url() {
        let conf = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("me-central-1"))
            .build();
        let storage = S3Storage {
            client: S3Client::from_conf(conf),
            bucket: "menu-images".into(),
            region: "me-central-1".into(),
        };
        assert_eq!(
            storage.public_url("items/abc.png"),
            "https://menu-images.s3.me-central-1.amazonaws.com/items/abc.png"
        );
    }
}
