//! Coordination services - every Q&A mutation flows through these.
//!
//! Each service owns one slice of the write path: the session gate, the
//! question lifecycle, the upvote coordinator, the answer pipeline, and
//! session lifecycle management. Infrastructure is reached only through
//! the ports, so the rules here are testable against in-memory fakes.

mod answers;
mod gate;
mod questions;
mod sessions;
mod upvotes;

pub use answers::{
    ANSWER_MAX_LENGTH, ANSWER_MIN_LENGTH, ANSWER_RATE_LIMIT_COUNT,
    ANSWER_RATE_LIMIT_WINDOW_SECONDS, AnswerService, validate_answer_content,
};
pub use gate::{WriteIntent, ensure_accepts_questions, ensure_session_writable};
pub use questions::{
    NewQuestion, QUESTION_MAX_LENGTH, QUESTION_MIN_LENGTH, QUESTION_RATE_LIMIT_COUNT,
    QUESTION_RATE_LIMIT_WINDOW_SECONDS, QuestionService, validate_question_content,
};
pub use sessions::{NewSession, SessionService};
pub use upvotes::UpvoteService;

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::Role;
use crate::error::DomainError;
use crate::ports::{EnrollmentRepository, RateLimitError, RateLimiter};

/// The acting, already-authenticated user. Authentication itself happens
/// upstream; the core only ever sees an id and a global role.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

/// Knobs that are deployment decisions rather than core rules.
#[derive(Debug, Clone, Copy)]
pub struct CorePolicy {
    /// Whether Q&A writes are allowed while a session is still SCHEDULED.
    /// The observed product behavior gates only on ENDED, so this defaults
    /// to open.
    pub allow_before_start: bool,
    /// What to do when the rate-limit backend is unreachable: proceed
    /// (fail open) or refuse with an infrastructure error (fail closed).
    pub rate_limit_fail_open: bool,
}

impl Default for CorePolicy {
    fn default() -> Self {
        Self {
            allow_before_start: true,
            rate_limit_fail_open: false,
        }
    }
}

/// Run one increment-then-check against the limiter and translate the
/// outcome into the domain error taxonomy.
pub(crate) async fn consume_rate_limit(
    limiter: &Arc<dyn RateLimiter>,
    key: &str,
    max_count: u32,
    window: Duration,
    fail_open: bool,
) -> Result<(), DomainError> {
    match limiter.check_and_increment(key, max_count, window).await {
        Ok(decision) if decision.exceeded => Err(DomainError::RateLimited {
            retry_after: decision.retry_after,
        }),
        Ok(_) => Ok(()),
        Err(RateLimitError::Backend(msg)) if fail_open => {
            tracing::warn!(key, error = %msg, "rate limiter unavailable, failing open");
            Ok(())
        }
        Err(RateLimitError::Backend(msg)) => {
            Err(DomainError::Internal(format!("rate limiter unavailable: {msg}")))
        }
    }
}

/// The caller's effective role within a course: the per-course enrollment
/// role where one exists, the global role otherwise.
pub(crate) async fn effective_role(
    enrollments: &Arc<dyn EnrollmentRepository>,
    caller: &Caller,
    course_id: Uuid,
) -> Result<Role, DomainError> {
    Ok(enrollments
        .role_in_course(caller.user_id, course_id)
        .await?
        .unwrap_or(caller.role))
}

pub(crate) async fn ensure_course_staff(
    enrollments: &Arc<dyn EnrollmentRepository>,
    caller: &Caller,
    course_id: Uuid,
    action: &str,
) -> Result<(), DomainError> {
    let role = effective_role(enrollments, caller, course_id).await?;
    if role.is_staff() {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!("Only course staff can {action}")))
    }
}

#[cfg(test)]
pub(crate) mod testing;
