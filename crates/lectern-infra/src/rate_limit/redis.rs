//! Redis rate limiter - the shared counter the fleet agrees on.
//!
//! One Lua round-trip per check: INCR, EXPIRE on first hit, TTL back.
//! The script runs atomically on the server, so concurrent attempts from
//! different instances never under-count.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Script};

use lectern_core::ports::{RateLimitDecision, RateLimitError, RateLimiter};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub connect_timeout: Duration,
    /// Key prefix for rate limit keys.
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            key_prefix: "ratelimit".to_string(),
        }
    }
}

impl RedisConfig {
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("REDIS_URL").ok()?;
        Some(Self {
            url,
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            key_prefix: std::env::var("RATE_LIMIT_KEY_PREFIX")
                .unwrap_or_else(|_| "ratelimit".to_string()),
        })
    }
}

/// Redis-backed rate limiter using a fixed-window counter.
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    config: RedisConfig,
    /// Lua script for atomic increment with expiry.
    script: Script,
}

impl RedisRateLimiter {
    pub async fn new(config: RedisConfig) -> Result<Self, RateLimitError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        // Bound the handshake so a dead Redis fails fast instead of hanging
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| RateLimitError::Backend("Connection timed out".to_string()))?
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        // Returns: [current_count, ttl_remaining]
        let script = Script::new(
            r#"
            local key = KEYS[1]
            local window_secs = tonumber(ARGV[1])

            local current = redis.call('INCR', key)
            if current == 1 then
                redis.call('EXPIRE', key, window_secs)
            end

            local ttl = redis.call('TTL', key)
            return {current, ttl}
            "#,
        );

        tracing::info!(url = %config.url, "Connected to Redis rate limiter");

        Ok(Self {
            conn,
            config,
            script,
        })
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.key_prefix, key)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check_and_increment(
        &self,
        key: &str,
        max_count: u32,
        window: Duration,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let redis_key = self.make_key(key);
        let mut conn = self.conn.clone();

        let result: Vec<i64> = self
            .script
            .key(&redis_key)
            .arg(window.as_secs())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        let count = result.first().copied().unwrap_or(1) as u32;
        let ttl_secs = result.get(1).copied().unwrap_or(window.as_secs() as i64).max(1) as u64;

        Ok(RateLimitDecision {
            exceeded: count > max_count,
            count,
            retry_after: Duration::from_secs(ttl_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn get_test_ratelimiter() -> Option<RedisRateLimiter> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
            key_prefix: "test_ratelimit".to_string(),
        };

        RedisRateLimiter::new(config).await.ok()
    }

    #[tokio::test]
    async fn test_redis_ratelimiter() {
        let limiter = match get_test_ratelimiter().await {
            Some(l) => l,
            None => return,
        };

        let key = format!("user_{}", uuid::Uuid::new_v4().simple());
        let window = Duration::from_secs(1);

        // First two requests fit the limit
        let res = limiter.check_and_increment(&key, 2, window).await.unwrap();
        assert!(!res.exceeded);
        let res = limiter.check_and_increment(&key, 2, window).await.unwrap();
        assert!(!res.exceeded);

        // Third request is refused but still counted
        let res = limiter.check_and_increment(&key, 2, window).await.unwrap();
        assert!(res.exceeded);
        assert_eq!(res.count, 3);

        // Wait for reset
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let res = limiter.check_and_increment(&key, 2, window).await.unwrap();
        assert!(!res.exceeded);
    }
}
