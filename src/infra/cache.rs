//! Redis connection used for request rate limiting.
//!
//! Nothing else is cached: all business state lives in PostgreSQL.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::{Config, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::{AppError, AppResult};

/// Outcome of one counted request in a fixed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub count: u64,
    pub limit: u64,
    pub allowed: bool,
}

impl RateLimitStatus {
    pub fn new(count: u64, limit: u64) -> Self {
        Self {
            count,
            limit,
            allowed: count <= limit,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.count)
    }
}

/// Fixed-window request counter consulted by the rate limit middleware
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn hit(&self, identifier: &str, max_requests: u64, window_seconds: u64)
        -> AppResult<RateLimitStatus>;
}

/// Redis wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis connected");

        Ok(Self { connection })
    }

    /// Count one request against `identifier`'s current window.
    ///
    /// The window starts with the first request and expires after
    /// `window_seconds`, after which counting restarts.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<RateLimitStatus> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let count: u64 = conn.incr(&key, 1u64).await.map_err(cache_error)?;
        if count == 1 {
            let window = i64::try_from(window_seconds).unwrap_or(i64::MAX);
            let _: () = conn.expire(&key, window).await.map_err(cache_error)?;
        }

        Ok(RateLimitStatus::new(count, max_requests))
    }

    /// Round-trip check for the health endpoint.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }
}

#[async_trait]
impl RateLimiter for Cache {
    async fn hit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<RateLimitStatus> {
        self.check_rate_limit(identifier, max_requests, window_seconds)
            .await
    }
}

fn cache_error(e: RedisError) -> AppError {
    AppError::internal(format!("Cache error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_status() {
        let within = RateLimitStatus::new(3, 10);
        assert!(within.allowed);
        assert_eq!(within.remaining(), 7);

        let at_limit = RateLimitStatus::new(10, 10);
        assert!(at_limit.allowed);
        assert_eq!(at_limit.remaining(), 0);

        let over = RateLimitStatus::new(11, 10);
        assert!(!over.allowed);
        assert_eq!(over.remaining(), 0);
    }
}
