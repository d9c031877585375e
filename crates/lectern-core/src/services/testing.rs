//! In-memory fakes of the ports, shared by the service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Answer, Question, QuestionStatus, QuestionUpvote, Role, Session, SessionStatus, Slide,
    UpvoteChange, UpvoteToggle,
};
use crate::error::RepoError;
use crate::ports::{
    AnswerRepository, EnrollmentRepository, QuestionRepository, QuestionWithSession,
    RateLimitDecision, RateLimitError, RateLimiter, SessionRepository,
};

/// Counting limiter with no real clock; tests model window expiry by
/// calling `reset_window`.
#[derive(Default)]
pub(crate) struct FakeLimiter {
    pub calls: AtomicU32,
    pub fail: AtomicBool,
    counts: Mutex<HashMap<String, u32>>,
}

impl FakeLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_window(&self) {
        self.counts.lock().unwrap().clear();
    }
}

#[async_trait]
impl RateLimiter for FakeLimiter {
    async fn check_and_increment(
        &self,
        key: &str,
        max_count: u32,
        window: Duration,
    ) -> Result<RateLimitDecision, RateLimitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(RateLimitError::Backend("connection refused".into()));
        }
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(key.to_owned()).or_insert(0);
        *count += 1;
        Ok(RateLimitDecision {
            exceeded: *count > max_count,
            count: *count,
            retry_after: window,
        })
    }
}

/// One store implementing every repository port over hash maps.
#[derive(Default)]
pub(crate) struct FakeStore {
    pub sessions: Mutex<HashMap<Uuid, Session>>,
    pub slides: Mutex<HashMap<Uuid, Slide>>,
    pub questions: Mutex<HashMap<Uuid, Question>>,
    pub upvotes: Mutex<HashMap<(Uuid, Uuid), QuestionUpvote>>,
    pub answers: Mutex<HashMap<Uuid, Answer>>,
    pub enrollments: Mutex<HashMap<(Uuid, Uuid), Role>>,
    /// When set, the next upvote insert behaves like losing a race: the
    /// winning row lands (with its counter bump) and the call reports a
    /// unique-constraint violation.
    pub inject_upvote_conflict: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_session(&self, session: Session) -> Session {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id, session.clone());
        session
    }

    pub fn seed_question(&self, question: Question) -> Question {
        self.questions
            .lock()
            .unwrap()
            .insert(question.id, question.clone());
        question
    }

    pub fn seed_slide(&self, slide: Slide) -> Slide {
        self.slides.lock().unwrap().insert(slide.id, slide.clone());
        slide
    }

    pub fn enroll(&self, user_id: Uuid, course_id: Uuid, role: Role) {
        self.enrollments
            .lock()
            .unwrap()
            .insert((user_id, course_id), role);
    }

    pub fn upvote_rows(&self, question_id: Uuid) -> usize {
        self.upvotes
            .lock()
            .unwrap()
            .keys()
            .filter(|(q, _)| *q == question_id)
            .count()
    }

    pub fn stored_question(&self, id: Uuid) -> Question {
        self.questions.lock().unwrap().get(&id).cloned().unwrap()
    }

    fn toggle_once(&self, question_id: Uuid, user_id: Uuid) -> Result<UpvoteToggle, RepoError> {
        let mut questions = self.questions.lock().unwrap();
        let question = questions.get_mut(&question_id).ok_or(RepoError::NotFound)?;
        let mut upvotes = self.upvotes.lock().unwrap();
        let key = (question_id, user_id);

        if self.inject_upvote_conflict.swap(false, Ordering::SeqCst)
            && !upvotes.contains_key(&key)
        {
            upvotes.insert(key, QuestionUpvote::new(question_id, user_id));
            question.upvote_count += 1;
            return Err(RepoError::Constraint(
                "duplicate key value violates unique constraint".into(),
            ));
        }

        if upvotes.remove(&key).is_some() {
            question.upvote_count -= 1;
            Ok(UpvoteToggle {
                applied: UpvoteChange::Removed,
                new_count: question.upvote_count,
            })
        } else {
            upvotes.insert(key, QuestionUpvote::new(question_id, user_id));
            question.upvote_count += 1;
            Ok(UpvoteToggle {
                applied: UpvoteChange::Added,
                new_count: question.upvote_count,
            })
        }
    }
}

#[async_trait]
impl SessionRepository for FakeStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, RepoError> {
        Ok(self.sessions.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_join_code(&self, code: &str) -> Result<Option<Session>, RepoError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .find(|s| s.join_code == code)
            .cloned())
    }

    async fn insert(&self, session: Session) -> Result<Session, RepoError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.values().any(|s| s.join_code == session.join_code) {
            return Err(RepoError::Constraint("duplicate join code".into()));
        }
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn update_status(&self, id: Uuid, status: SessionStatus) -> Result<Session, RepoError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(&id).ok_or(RepoError::NotFound)?;
        session.status = status;
        session.updated_at = Utc::now();
        Ok(session.clone())
    }

    async fn update_submissions_enabled(
        &self,
        id: Uuid,
        enabled: bool,
    ) -> Result<Session, RepoError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(&id).ok_or(RepoError::NotFound)?;
        session.is_submissions_enabled = enabled;
        session.updated_at = Utc::now();
        Ok(session.clone())
    }

    async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<Session>, RepoError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn end_overdue(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let mut swept = 0;
        for session in self.sessions.lock().unwrap().values_mut() {
            if session.is_overdue(now) {
                session.status = SessionStatus::Ended;
                session.updated_at = now;
                swept += 1;
            }
        }
        Ok(swept)
    }

    async fn insert_slide(&self, slide: Slide) -> Result<Slide, RepoError> {
        self.slides.lock().unwrap().insert(slide.id, slide.clone());
        Ok(slide)
    }

    async fn find_slide(&self, id: Uuid) -> Result<Option<Slide>, RepoError> {
        Ok(self.slides.lock().unwrap().get(&id).cloned())
    }

    async fn list_slides(&self, session_id: Uuid) -> Result<Vec<Slide>, RepoError> {
        let mut slides: Vec<Slide> = self
            .slides
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.session_id == session_id)
            .cloned()
            .collect();
        slides.sort_by_key(|s| s.slide_number);
        Ok(slides)
    }
}

#[async_trait]
impl QuestionRepository for FakeStore {
    async fn insert(&self, question: Question) -> Result<Question, RepoError> {
        self.questions
            .lock()
            .unwrap()
            .insert(question.id, question.clone());
        Ok(question)
    }

    async fn find_with_session(
        &self,
        id: Uuid,
    ) -> Result<Option<QuestionWithSession>, RepoError> {
        let questions = self.questions.lock().unwrap();
        let Some(question) = questions.get(&id) else {
            return Ok(None);
        };
        let sessions = self.sessions.lock().unwrap();
        let session = sessions.get(&question.session_id).ok_or(RepoError::NotFound)?;
        Ok(Some(QuestionWithSession {
            question: question.clone(),
            session_status: session.status,
            course_id: session.course_id,
        }))
    }

    async fn list_for_session(
        &self,
        session_id: Uuid,
        include_instructor_only: bool,
    ) -> Result<Vec<Question>, RepoError> {
        let mut questions: Vec<Question> = self
            .questions
            .lock()
            .unwrap()
            .values()
            .filter(|q| q.session_id == session_id)
            .filter(|q| {
                include_instructor_only
                    || matches!(q.visibility, crate::domain::Visibility::Public)
            })
            .cloned()
            .collect();
        questions.sort_by_key(|q| std::cmp::Reverse(q.created_at));
        Ok(questions)
    }

    async fn advance_status(
        &self,
        id: Uuid,
        from: QuestionStatus,
        to: QuestionStatus,
    ) -> Result<Question, RepoError> {
        let mut questions = self.questions.lock().unwrap();
        let question = questions.get_mut(&id).ok_or(RepoError::NotFound)?;
        if question.status == from {
            question.status = to;
        }
        Ok(question.clone())
    }

    async fn toggle_upvote(
        &self,
        question_id: Uuid,
        user_id: Uuid,
    ) -> Result<UpvoteToggle, RepoError> {
        self.toggle_once(question_id, user_id)
    }
}

#[async_trait]
impl AnswerRepository for FakeStore {
    async fn insert_marking_answered(&self, answer: Answer) -> Result<Answer, RepoError> {
        let mut questions = self.questions.lock().unwrap();
        let question = questions
            .get_mut(&answer.question_id)
            .ok_or(RepoError::NotFound)?;
        if question.status == QuestionStatus::Open {
            question.status = QuestionStatus::Answered;
        }
        self.answers
            .lock()
            .unwrap()
            .insert(answer.id, answer.clone());
        Ok(answer)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Answer>, RepoError> {
        Ok(self.answers.lock().unwrap().get(&id).cloned())
    }

    async fn list_for_question(&self, question_id: Uuid) -> Result<Vec<Answer>, RepoError> {
        let mut answers: Vec<Answer> = self
            .answers
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.question_id == question_id)
            .cloned()
            .collect();
        answers.sort_by_key(|a| a.created_at);
        Ok(answers)
    }

    async fn mark_accepted(&self, answer_id: Uuid) -> Result<Answer, RepoError> {
        let mut answers = self.answers.lock().unwrap();
        let question_id = answers
            .get(&answer_id)
            .ok_or(RepoError::NotFound)?
            .question_id;
        for answer in answers.values_mut() {
            if answer.question_id == question_id {
                answer.is_accepted = answer.id == answer_id;
            }
        }
        Ok(answers.get(&answer_id).cloned().ok_or(RepoError::NotFound)?)
    }
}

#[async_trait]
impl EnrollmentRepository for FakeStore {
    async fn role_in_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Role>, RepoError> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .get(&(user_id, course_id))
            .copied())
    }
}

/// An ACTIVE session with submissions on, ready for seeding.
pub(crate) fn active_session() -> Session {
    let mut session = Session::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        "Week 5 lecture".into(),
        "7C4F9A".into(),
        Some(Utc::now()),
        None,
    );
    session.status = SessionStatus::Active;
    session
}
