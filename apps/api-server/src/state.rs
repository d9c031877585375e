//! Application state - shared across all handlers.

use std::sync::Arc;

use lectern_core::ports::RateLimiter;
use lectern_core::services::{AnswerService, QuestionService, SessionService, UpvoteService};
use lectern_infra::{
    InMemoryRateLimiter, PostgresAnswerRepository, PostgresEnrollmentRepository,
    PostgresQuestionRepository, PostgresSessionRepository, RedisConfig, RedisRateLimiter, connect,
};

use crate::config::AppConfig;

/// Shared application state: the core services wired to their adapters.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
    pub questions: QuestionService,
    pub upvotes: UpvoteService,
    pub answers: AnswerService,
    pub limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let db_config = config.database.as_ref().ok_or_else(|| {
            std::io::Error::other("DATABASE_URL is not set; the Q&A store is required")
        })?;
        let db = connect(db_config).await.map_err(std::io::Error::other)?;

        let limiter = Self::build_limiter().await;

        let sessions_repo = Arc::new(PostgresSessionRepository::new(db.clone()));
        let questions_repo = Arc::new(PostgresQuestionRepository::new(db.clone()));
        let answers_repo = Arc::new(PostgresAnswerRepository::new(db.clone()));
        let enrollments_repo = Arc::new(PostgresEnrollmentRepository::new(db));

        let policy = config.policy;

        tracing::info!("Application state initialized");

        Ok(Self {
            sessions: SessionService::new(
                sessions_repo.clone(),
                enrollments_repo.clone(),
                policy,
            ),
            questions: QuestionService::new(
                sessions_repo,
                questions_repo.clone(),
                enrollments_repo.clone(),
                limiter.clone(),
                policy,
            ),
            upvotes: UpvoteService::new(questions_repo.clone(), policy),
            answers: AnswerService::new(
                questions_repo,
                answers_repo,
                enrollments_repo,
                limiter.clone(),
                policy,
            ),
            limiter,
        })
    }

    /// Prefer the shared Redis counter; fall back to the per-process one
    /// when Redis is not configured or unreachable at startup.
    async fn build_limiter() -> Arc<dyn RateLimiter> {
        match RedisConfig::from_env() {
            Some(redis_config) => match RedisRateLimiter::new(redis_config).await {
                Ok(limiter) => Arc::new(limiter),
                Err(err) => {
                    tracing::error!(
                        "Failed to connect to Redis: {}. Using in-memory rate limiter.",
                        err
                    );
                    Arc::new(InMemoryRateLimiter::new())
                }
            },
            None => {
                tracing::warn!(
                    "REDIS_URL not set. Rate limits are per-process, not shared across instances."
                );
                Arc::new(InMemoryRateLimiter::new())
            }
        }
    }
}
