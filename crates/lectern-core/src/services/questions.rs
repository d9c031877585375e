//! Question lifecycle manager: creation, status transitions, and the
//! visibility trust boundary.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::{Question, QuestionStatus, Visibility};
use crate::error::DomainError;
use crate::ports::{
    EnrollmentRepository, QuestionRepository, RateLimiter, SessionRepository, action_key,
};

use super::gate::{WriteIntent, ensure_accepts_questions, ensure_session_writable};
use super::{Caller, CorePolicy, consume_rate_limit, effective_role, ensure_course_staff};

pub const QUESTION_MIN_LENGTH: usize = 1;
pub const QUESTION_MAX_LENGTH: usize = 2000;
pub const QUESTION_RATE_LIMIT_COUNT: u32 = 10;
pub const QUESTION_RATE_LIMIT_WINDOW_SECONDS: u64 = 60;

const QUESTION_RATE_LIMIT_ACTION: &str = "question-rate-limit";

/// Trim and bound-check question content. Pure, no I/O.
pub fn validate_question_content(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if length < QUESTION_MIN_LENGTH {
        return Err(DomainError::validation("Question cannot be empty"));
    }
    if length > QUESTION_MAX_LENGTH {
        return Err(DomainError::validation(format!(
            "Question cannot exceed {QUESTION_MAX_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Parameters for a new question.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub content: String,
    pub is_anonymous: bool,
    pub visibility: Visibility,
    pub slide_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct QuestionService {
    sessions: Arc<dyn SessionRepository>,
    questions: Arc<dyn QuestionRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    limiter: Arc<dyn RateLimiter>,
    policy: CorePolicy,
}

impl QuestionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        questions: Arc<dyn QuestionRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        limiter: Arc<dyn RateLimiter>,
        policy: CorePolicy,
    ) -> Self {
        Self {
            sessions,
            questions,
            enrollments,
            limiter,
            policy,
        }
    }

    /// Create a question in a session. Anonymous questions never carry an
    /// author reference - the omission happens at construction, before
    /// the write reaches storage.
    pub async fn create(
        &self,
        session_id: Uuid,
        caller: &Caller,
        input: NewQuestion,
    ) -> Result<Question, DomainError> {
        let content = validate_question_content(&input.content)?;

        consume_rate_limit(
            &self.limiter,
            &action_key(QUESTION_RATE_LIMIT_ACTION, caller.user_id),
            QUESTION_RATE_LIMIT_COUNT,
            Duration::from_secs(QUESTION_RATE_LIMIT_WINDOW_SECONDS),
            self.policy.rate_limit_fail_open,
        )
        .await?;

        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session", session_id))?;
        ensure_accepts_questions(&session, &self.policy)?;

        if let Some(slide_id) = input.slide_id {
            let slide = self
                .sessions
                .find_slide(slide_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Slide", slide_id))?;
            if slide.session_id != session.id {
                return Err(DomainError::validation(
                    "Slide belongs to a different session",
                ));
            }
        }

        let question = Question::new(
            session.id,
            input.slide_id,
            caller.user_id,
            content,
            input.is_anonymous,
            input.visibility,
        );
        let question = self.questions.insert(question).await?;
        tracing::debug!(
            session_id = %session_id,
            question_id = %question.id,
            anonymous = question.is_anonymous,
            "question created"
        );
        Ok(question)
    }

    /// Questions in a session the caller is allowed to see, newest first.
    /// INSTRUCTOR_ONLY rows are excluded in the query for non-staff
    /// course roles - this is the trust boundary, not a display concern.
    pub async fn list_for_session(
        &self,
        session_id: Uuid,
        caller: &Caller,
    ) -> Result<Vec<Question>, DomainError> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session", session_id))?;
        let role = effective_role(&self.enrollments, caller, session.course_id).await?;
        Ok(self
            .questions
            .list_for_session(session_id, role.is_staff())
            .await?)
    }

    /// A single question, subject to the same visibility predicate. An
    /// INSTRUCTOR_ONLY question reads as not-found to a student rather
    /// than leaking its existence.
    pub async fn get(&self, question_id: Uuid, caller: &Caller) -> Result<Question, DomainError> {
        let view = self
            .questions
            .find_with_session(question_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Question", question_id))?;
        let role = effective_role(&self.enrollments, caller, view.course_id).await?;
        if !view.question.visible_to(role) {
            return Err(DomainError::not_found("Question", question_id));
        }
        Ok(view.question)
    }

    /// Explicit staff resolution. The status machine is forward-only, so
    /// an already-resolved question refuses rather than re-applying.
    pub async fn resolve(
        &self,
        question_id: Uuid,
        caller: &Caller,
    ) -> Result<Question, DomainError> {
        let view = self
            .questions
            .find_with_session(question_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Question", question_id))?;
        ensure_session_writable(view.session_status, WriteIntent::ResolveQuestion, &self.policy)?;
        ensure_course_staff(&self.enrollments, caller, view.course_id, "resolve questions")
            .await?;

        let current = view.question.status;
        if !current.can_transition(QuestionStatus::Resolved) {
            return Err(DomainError::policy("Question is already resolved"));
        }
        Ok(self
            .questions
            .advance_status(question_id, current, QuestionStatus::Resolved)
            .await?)
    }
}
