//! Domain-level error types.

use std::time::Duration;

use thiserror::Error;

/// Domain errors - business logic failures.
///
/// Each variant is a distinct machine-readable kind so the transport layer
/// can map them to distinct status codes instead of collapsing everything
/// into one validation-shaped message.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },

    /// Input validation failure - bad content length or shape.
    #[error("{0}")]
    Validation(String),

    /// State/policy violation - ended session, submissions disabled,
    /// session not yet started.
    #[error("{0}")]
    Policy(String),

    /// The acting user exceeded a per-action rate limit.
    #[error("Rate limit exceeded, try again in {} seconds", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// The caller lacks the course role the operation requires.
    #[error("{0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure - datastore or limiter unreachable.
    /// Retryable, never presented to the user as invalid input.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn policy(msg: impl Into<String>) -> Self {
        Self::Policy(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::Internal("entity vanished mid-operation".into()),
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}
