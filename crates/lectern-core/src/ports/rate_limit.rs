//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Rate limiter trait - abstraction over counter backends.
///
/// Callers pass the limit per call because different actions carry
/// different bounds against the same backend (answers 15/60s, questions
/// 10/60s, the HTTP-level IP limit its own pair).
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Increment the counter behind `key` and report whether the window
    /// limit is now exceeded. The triggering call itself counts toward the
    /// limit, so a refused attempt still consumes a slot.
    async fn check_and_increment(
        &self,
        key: &str,
        max_count: u32,
        window: Duration,
    ) -> Result<RateLimitDecision, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub exceeded: bool,
    /// Count within the current window, including this attempt.
    pub count: u32,
    /// Time until the window resets.
    pub retry_after: Duration,
}

/// Rate limit errors. A backend failure is observably distinct from an
/// exceeded limit; whether the caller then fails open or closed is policy,
/// not the limiter's decision.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Compose a counter key namespaced by action kind and subject, e.g.
/// `answer-rate-limit:7b68…`.
pub fn action_key(action: &str, subject: impl std::fmt::Display) -> String {
    format!("{action}:{subject}")
}
