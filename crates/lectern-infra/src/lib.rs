//! # Lectern Infrastructure
//!
//! Concrete implementations of the ports defined in `lectern-core`.
//! This crate contains the PostgreSQL repositories and the rate-limit
//! counter backends.
//!
//! ## Feature Flags
//!
//! - `redis` (default) - Redis-backed rate limiting; without it only the
//!   per-process in-memory counter is available.

pub mod database;
pub mod rate_limit;

pub use database::{
    DatabaseConfig, PostgresAnswerRepository, PostgresEnrollmentRepository,
    PostgresQuestionRepository, PostgresSessionRepository, connect,
};
pub use rate_limit::InMemoryRateLimiter;

#[cfg(feature = "redis")]
pub use rate_limit::{RedisConfig, RedisRateLimiter};
