//! In-memory rate limiter - a per-process fixed-window counter.
//!
//! This is the fallback when Redis is not available. Limits are
//! per-process, not shared across instances, and counters vanish on
//! restart. The window anchors at the first hit for a key and every
//! attempt inside it increments the counter, including refused ones.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use lectern_core::ports::{RateLimitDecision, RateLimitError, RateLimiter};

struct WindowEntry {
    count: u32,
    expires_at: Instant,
}

pub struct InMemoryRateLimiter {
    windows: RwLock<HashMap<String, WindowEntry>>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check_and_increment(
        &self,
        key: &str,
        max_count: u32,
        window: Duration,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let now = Instant::now();
        let mut windows = self.windows.write().await;

        let entry = windows.entry(key.to_owned()).or_insert(WindowEntry {
            count: 0,
            expires_at: now + window,
        });
        if entry.expires_at <= now {
            entry.count = 0;
            entry.expires_at = now + window;
        }
        entry.count += 1;

        Ok(RateLimitDecision {
            exceeded: entry.count > max_count,
            count: entry.count,
            retry_after: entry.expires_at.saturating_duration_since(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_up_to_the_limit() {
        let limiter = InMemoryRateLimiter::new();
        let window = Duration::from_secs(60);

        for i in 1..=3 {
            let decision = limiter.check_and_increment("user-a", 3, window).await.unwrap();
            assert!(!decision.exceeded, "attempt {i}");
            assert_eq!(decision.count, i);
        }

        let decision = limiter.check_and_increment("user-a", 3, window).await.unwrap();
        assert!(decision.exceeded);
        assert_eq!(decision.count, 4);
    }

    #[tokio::test]
    async fn refused_attempts_still_consume_slots() {
        let limiter = InMemoryRateLimiter::new();
        let window = Duration::from_secs(60);

        for _ in 0..5 {
            limiter.check_and_increment("user-b", 2, window).await.unwrap();
        }
        let decision = limiter.check_and_increment("user-b", 2, window).await.unwrap();
        assert_eq!(decision.count, 6);
        assert!(decision.exceeded);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let limiter = InMemoryRateLimiter::new();
        let window = Duration::from_secs(60);

        limiter.check_and_increment("user-c", 1, window).await.unwrap();
        let over = limiter.check_and_increment("user-c", 1, window).await.unwrap();
        assert!(over.exceeded);

        let fresh = limiter.check_and_increment("user-d", 1, window).await.unwrap();
        assert!(!fresh.exceeded);
    }

    #[tokio::test]
    async fn window_expiry_resets_the_counter() {
        let limiter = InMemoryRateLimiter::new();
        let window = Duration::from_millis(200);

        let first = limiter.check_and_increment("user-e", 1, window).await.unwrap();
        assert!(!first.exceeded);
        let second = limiter.check_and_increment("user-e", 1, window).await.unwrap();
        assert!(second.exceeded);

        tokio::time::sleep(Duration::from_millis(250)).await;

        let after = limiter.check_and_increment("user-e", 1, window).await.unwrap();
        assert!(!after.exceeded);
        assert_eq!(after.count, 1);
    }
}
