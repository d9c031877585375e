//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod rate_limit;
mod repository;

pub use rate_limit::{RateLimitDecision, RateLimitError, RateLimiter, action_key};
pub use repository::{
    AnswerRepository, EnrollmentRepository, QuestionRepository, QuestionWithSession,
    SessionRepository,
};
