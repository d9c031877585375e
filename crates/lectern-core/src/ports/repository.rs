use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Answer, Question, QuestionStatus, Role, Session, SessionStatus, Slide, UpvoteToggle,
};
use crate::error::RepoError;

/// Read model for answer/upvote/resolve validation: the question plus the
/// slice of its parent session the gates need.
#[derive(Debug, Clone)]
pub struct QuestionWithSession {
    pub question: Question,
    pub session_status: SessionStatus,
    pub course_id: Uuid,
}

/// Session repository, including the slides a session owns.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, RepoError>;

    /// Lookup by the human-entry join code.
    async fn find_by_join_code(&self, code: &str) -> Result<Option<Session>, RepoError>;

    async fn insert(&self, session: Session) -> Result<Session, RepoError>;

    async fn update_status(&self, id: Uuid, status: SessionStatus) -> Result<Session, RepoError>;

    async fn update_submissions_enabled(
        &self,
        id: Uuid,
        enabled: bool,
    ) -> Result<Session, RepoError>;

    async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<Session>, RepoError>;

    /// Flip every non-ENDED session whose end time has passed to ENDED.
    /// Returns the number of sessions swept.
    async fn end_overdue(&self, now: DateTime<Utc>) -> Result<u64, RepoError>;

    async fn insert_slide(&self, slide: Slide) -> Result<Slide, RepoError>;

    async fn find_slide(&self, id: Uuid) -> Result<Option<Slide>, RepoError>;

    /// Slides ordered by slide number.
    async fn list_slides(&self, session_id: Uuid) -> Result<Vec<Slide>, RepoError>;
}

/// Question repository. The upvote toggle lives here because the row
/// mutation and the cached counter belong to one transaction.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn insert(&self, question: Question) -> Result<Question, RepoError>;

    async fn find_with_session(&self, id: Uuid)
    -> Result<Option<QuestionWithSession>, RepoError>;

    /// Questions for a session, newest first. INSTRUCTOR_ONLY rows are
    /// excluded in the query itself when `include_instructor_only` is
    /// false; visibility filtering is not left to callers.
    async fn list_for_session(
        &self,
        session_id: Uuid,
        include_instructor_only: bool,
    ) -> Result<Vec<Question>, RepoError>;

    /// Conditional status advance: applied only while the stored status
    /// still equals `from`, making concurrent advances idempotent.
    async fn advance_status(
        &self,
        id: Uuid,
        from: QuestionStatus,
        to: QuestionStatus,
    ) -> Result<Question, RepoError>;

    /// Toggle the (question, user) upvote: insert row + increment counter,
    /// or delete row + decrement, atomically. A unique-constraint loss on
    /// the insert surfaces as `RepoError::Constraint` for the caller to
    /// retry as a removal.
    async fn toggle_upvote(
        &self,
        question_id: Uuid,
        user_id: Uuid,
    ) -> Result<UpvoteToggle, RepoError>;
}

/// Answer repository.
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    /// Insert the answer and, when the parent question is still OPEN, flip
    /// it to ANSWERED in the same transaction.
    async fn insert_marking_answered(&self, answer: Answer) -> Result<Answer, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Answer>, RepoError>;

    /// Answers for a question, oldest first.
    async fn list_for_question(&self, question_id: Uuid) -> Result<Vec<Answer>, RepoError>;

    /// Mark accepted, clearing the flag on the question's other answers in
    /// the same transaction.
    async fn mark_accepted(&self, answer_id: Uuid) -> Result<Answer, RepoError>;
}

/// Enrollment reads - the authorization hook for per-course role checks.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// The caller's role within a course, if enrolled. Overrides the
    /// global role where present.
    async fn role_in_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Role>, RepoError>;
}
