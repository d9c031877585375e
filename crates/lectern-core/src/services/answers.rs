//! Answer validation & submission path.
//!
//! A short-circuiting pipeline: content validation, rate limiting,
//! question/session validation, then persistence with the OPEN->ANSWERED
//! side effect. The order is load-bearing - the cheap local check runs
//! before anything that costs a round-trip or a rate-limit slot.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::Answer;
use crate::error::DomainError;
use crate::ports::{
    AnswerRepository, EnrollmentRepository, QuestionRepository, RateLimiter, action_key,
};

use super::gate::{WriteIntent, ensure_session_writable};
use super::{Caller, CorePolicy, consume_rate_limit, effective_role, ensure_course_staff};

pub const ANSWER_MIN_LENGTH: usize = 1;
pub const ANSWER_MAX_LENGTH: usize = 1000;
pub const ANSWER_RATE_LIMIT_COUNT: u32 = 15;
pub const ANSWER_RATE_LIMIT_WINDOW_SECONDS: u64 = 60;

const ANSWER_RATE_LIMIT_ACTION: &str = "answer-rate-limit";

/// Trim and bound-check answer content. Pure, no I/O.
pub fn validate_answer_content(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if length < ANSWER_MIN_LENGTH {
        return Err(DomainError::validation("Answer cannot be empty"));
    }
    if length > ANSWER_MAX_LENGTH {
        return Err(DomainError::validation(format!(
            "Answer cannot exceed {ANSWER_MAX_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Answer submission and acceptance.
#[derive(Clone)]
pub struct AnswerService {
    questions: Arc<dyn QuestionRepository>,
    answers: Arc<dyn AnswerRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    limiter: Arc<dyn RateLimiter>,
    policy: CorePolicy,
}

impl AnswerService {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        answers: Arc<dyn AnswerRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        limiter: Arc<dyn RateLimiter>,
        policy: CorePolicy,
    ) -> Self {
        Self {
            questions,
            answers,
            enrollments,
            limiter,
            policy,
        }
    }

    /// Submit an answer to a question.
    pub async fn submit(
        &self,
        question_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Answer, DomainError> {
        let content = validate_answer_content(content)?;

        consume_rate_limit(
            &self.limiter,
            &action_key(ANSWER_RATE_LIMIT_ACTION, author_id),
            ANSWER_RATE_LIMIT_COUNT,
            Duration::from_secs(ANSWER_RATE_LIMIT_WINDOW_SECONDS),
            self.policy.rate_limit_fail_open,
        )
        .await?;

        let view = self
            .questions
            .find_with_session(question_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Question", question_id))?;
        ensure_session_writable(view.session_status, WriteIntent::PostAnswer, &self.policy)?;

        let answer = Answer::new(view.question.id, author_id, content);
        let answer = self.answers.insert_marking_answered(answer).await?;
        tracing::debug!(question_id = %question_id, answer_id = %answer.id, "answer persisted");
        Ok(answer)
    }

    /// Answers for a question, oldest first. The parent question's
    /// visibility applies: a student asking for an INSTRUCTOR_ONLY
    /// question's answers sees the same not-found a bad id would get.
    pub async fn list_for_question(
        &self,
        question_id: Uuid,
        caller: &Caller,
    ) -> Result<Vec<Answer>, DomainError> {
        let view = self
            .questions
            .find_with_session(question_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Question", question_id))?;
        let role = effective_role(&self.enrollments, caller, view.course_id).await?;
        if !view.question.visible_to(role) {
            return Err(DomainError::not_found("Question", question_id));
        }
        Ok(self.answers.list_for_question(question_id).await?)
    }

    /// Mark an answer accepted. Staff in the owning course only; the
    /// previously accepted answer, if any, loses the flag in the same
    /// transaction.
    pub async fn accept(&self, answer_id: Uuid, caller: &Caller) -> Result<Answer, DomainError> {
        let answer = self
            .answers
            .find_by_id(answer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Answer", answer_id))?;
        let view = self
            .questions
            .find_with_session(answer.question_id)
            .await?
            .ok_or_else(|| {
                DomainError::Internal("answer references a missing question".into())
            })?;
        ensure_session_writable(view.session_status, WriteIntent::AcceptAnswer, &self.policy)?;
        ensure_course_staff(&self.enrollments, caller, view.course_id, "accept answers").await?;
        Ok(self.answers.mark_accepted(answer_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::super::testing::{FakeLimiter, FakeStore, active_session};
    use super::*;
    use crate::domain::{Question, QuestionStatus, Role, SessionStatus, Visibility};

    struct Harness {
        store: Arc<FakeStore>,
        limiter: Arc<FakeLimiter>,
        service: AnswerService,
        question_id: Uuid,
        course_id: Uuid,
    }

    fn harness() -> Harness {
        harness_with_policy(CorePolicy::default())
    }

    fn harness_with_policy(policy: CorePolicy) -> Harness {
        let store = Arc::new(FakeStore::new());
        let limiter = Arc::new(FakeLimiter::new());
        let session = store.seed_session(active_session());
        let question = store.seed_question(Question::new(
            session.id,
            None,
            Uuid::new_v4(),
            "What does the lifetime elide to?".into(),
            false,
            Visibility::Public,
        ));
        let service = AnswerService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            limiter.clone(),
            policy,
        );
        Harness {
            store,
            limiter,
            service,
            question_id: question.id,
            course_id: session.course_id,
        }
    }

    fn staff_caller(h: &Harness) -> Caller {
        let caller = Caller {
            user_id: Uuid::new_v4(),
            role: Role::Student,
        };
        h.store.enroll(caller.user_id, h.course_id, Role::Ta);
        caller
    }

    #[tokio::test]
    async fn one_character_answer_accepted() {
        let h = harness();
        let answer = h.service.submit(h.question_id, Uuid::new_v4(), "y").await.unwrap();
        assert_eq!(answer.content, "y");
    }

    #[tokio::test]
    async fn whitespace_only_rejected_before_any_io() {
        let h = harness();
        let err = h
            .service
            .submit(h.question_id, Uuid::new_v4(), "   \n\t ")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Answer cannot be empty");
        // the content stage runs first, so no rate-limit slot was spent
        assert_eq!(h.limiter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn max_length_boundary() {
        let h = harness();
        let exactly = "a".repeat(ANSWER_MAX_LENGTH);
        assert!(h.service.submit(h.question_id, Uuid::new_v4(), &exactly).await.is_ok());

        let over = "a".repeat(ANSWER_MAX_LENGTH + 1);
        let err = h
            .service
            .submit(h.question_id, Uuid::new_v4(), &over)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Answer cannot exceed 1000 characters");
    }

    #[tokio::test]
    async fn rate_limit_boundary_and_slot_consumption() {
        let h = harness();
        let author = Uuid::new_v4();

        for i in 1..=ANSWER_RATE_LIMIT_COUNT {
            let result = h.service.submit(h.question_id, author, "an answer").await;
            assert!(result.is_ok(), "submission {i} should pass");
        }

        let err = h
            .service
            .submit(h.question_id, author, "one too many")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RateLimited { .. }));

        // the refused attempt consumed a slot, so the next one fails too
        let err = h
            .service
            .submit(h.question_id, author, "still throttled")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RateLimited { .. }));

        // a fresh window admits submissions again
        h.limiter.reset_window();
        assert!(h.service.submit(h.question_id, author, "after the window").await.is_ok());
    }

    #[tokio::test]
    async fn rate_limit_is_per_author() {
        let h = harness();
        let busy = Uuid::new_v4();
        for _ in 0..ANSWER_RATE_LIMIT_COUNT {
            h.service.submit(h.question_id, busy, "hammering").await.unwrap();
        }
        assert!(h.service.submit(h.question_id, busy, "over").await.is_err());

        let other = Uuid::new_v4();
        assert!(h.service.submit(h.question_id, other, "unaffected").await.is_ok());
    }

    #[tokio::test]
    async fn ended_session_rejects_regardless_of_content_and_limiter() {
        let h = harness();
        {
            let mut sessions = h.store.sessions.lock().unwrap();
            let session = sessions.values_mut().next().unwrap();
            session.status = SessionStatus::Ended;
        }
        let err = h
            .service
            .submit(h.question_id, Uuid::new_v4(), "a perfectly valid answer")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot answer questions in an ended session");
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        let h = harness();
        let bogus = Uuid::new_v4();
        let err = h.service.submit(bogus, Uuid::new_v4(), "hello").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity_type: "Question", .. }));
        assert!(err.to_string().starts_with("Question not found"));
    }

    #[tokio::test]
    async fn first_answer_flips_open_to_answered_and_stays() {
        let h = harness();
        assert_eq!(h.store.stored_question(h.question_id).status, QuestionStatus::Open);

        h.service.submit(h.question_id, Uuid::new_v4(), "first").await.unwrap();
        assert_eq!(
            h.store.stored_question(h.question_id).status,
            QuestionStatus::Answered
        );

        h.service.submit(h.question_id, Uuid::new_v4(), "second").await.unwrap();
        assert_eq!(
            h.store.stored_question(h.question_id).status,
            QuestionStatus::Answered,
            "a later answer never reverts the status"
        );
    }

    #[tokio::test]
    async fn limiter_outage_fails_closed_by_default() {
        let h = harness();
        h.limiter.fail.store(true, Ordering::SeqCst);
        let err = h
            .service
            .submit(h.question_id, Uuid::new_v4(), "fine content")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn limiter_outage_honors_fail_open_policy() {
        let h = harness_with_policy(CorePolicy {
            rate_limit_fail_open: true,
            ..CorePolicy::default()
        });
        h.limiter.fail.store(true, Ordering::SeqCst);
        assert!(h.service.submit(h.question_id, Uuid::new_v4(), "fine content").await.is_ok());
    }

    #[tokio::test]
    async fn accept_clears_previous_accepted_answer() {
        let h = harness();
        let caller = staff_caller(&h);
        let first = h.service.submit(h.question_id, Uuid::new_v4(), "first").await.unwrap();
        let second = h.service.submit(h.question_id, Uuid::new_v4(), "second").await.unwrap();

        let accepted = h.service.accept(first.id, &caller).await.unwrap();
        assert!(accepted.is_accepted);

        let accepted = h.service.accept(second.id, &caller).await.unwrap();
        assert!(accepted.is_accepted);

        let answers = h
            .service
            .list_for_question(h.question_id, &caller)
            .await
            .unwrap();
        let accepted_count = answers.iter().filter(|a| a.is_accepted).count();
        assert_eq!(accepted_count, 1);
        assert!(!answers.iter().find(|a| a.id == first.id).unwrap().is_accepted);
    }

    #[tokio::test]
    async fn students_cannot_accept_answers() {
        let h = harness();
        let answer = h.service.submit(h.question_id, Uuid::new_v4(), "an answer").await.unwrap();
        let student = Caller {
            user_id: Uuid::new_v4(),
            role: Role::Student,
        };
        let err = h.service.accept(answer.id, &student).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn instructor_only_question_hides_its_answers_from_students() {
        let h = harness();
        let session_id = h.store.stored_question(h.question_id).session_id;
        let hidden = h.store.seed_question(Question::new(
            session_id,
            None,
            Uuid::new_v4(),
            "Grading question".into(),
            false,
            Visibility::InstructorOnly,
        ));
        let student = Caller {
            user_id: Uuid::new_v4(),
            role: Role::Student,
        };
        let err = h
            .service
            .list_for_question(hidden.id, &student)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let staff = staff_caller(&h);
        assert!(h.service.list_for_question(hidden.id, &staff).await.is_ok());
    }
}
