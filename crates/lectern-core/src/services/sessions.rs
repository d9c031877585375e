//! Session lifecycle service - the one place session status moves.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Session, SessionStatus, Slide};
use crate::error::{DomainError, RepoError};
use crate::ports::{EnrollmentRepository, SessionRepository};

use super::gate::{WriteIntent, ensure_session_writable};
use super::{Caller, CorePolicy, ensure_course_staff};

const JOIN_CODE_LENGTH: usize = 6;
const JOIN_CODE_ATTEMPTS: usize = 4;

/// Parameters for a new session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub title: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    policy: CorePolicy,
}

impl SessionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        policy: CorePolicy,
    ) -> Self {
        Self {
            sessions,
            enrollments,
            policy,
        }
    }

    /// Create a session in a course. Staff only. Join-code collisions are
    /// resolved by regenerating; the unique index has the final word.
    pub async fn create(
        &self,
        course_id: Uuid,
        caller: &Caller,
        input: NewSession,
    ) -> Result<Session, DomainError> {
        ensure_course_staff(&self.enrollments, caller, course_id, "create sessions").await?;

        let title = input.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("Session title cannot be empty"));
        }

        let mut attempts = 0;
        loop {
            let session = Session::new(
                course_id,
                caller.user_id,
                title.to_owned(),
                generate_join_code(),
                input.start_time,
                input.end_time,
            );
            match self.sessions.insert(session).await {
                Ok(session) => {
                    tracing::info!(
                        session_id = %session.id,
                        course_id = %course_id,
                        join_code = %session.join_code,
                        "session created"
                    );
                    return Ok(session);
                }
                Err(RepoError::Constraint(_)) if attempts < JOIN_CODE_ATTEMPTS => {
                    attempts += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    pub async fn get(&self, session_id: Uuid) -> Result<Session, DomainError> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session", session_id))
    }

    /// Lookup by join code; input is normalized the way codes are issued.
    pub async fn join_by_code(&self, code: &str) -> Result<Session, DomainError> {
        let normalized = code.trim().to_ascii_uppercase();
        self.sessions
            .find_by_join_code(&normalized)
            .await?
            .ok_or_else(|| DomainError::not_found("Session", normalized))
    }

    pub async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<Session>, DomainError> {
        Ok(self.sessions.list_for_course(course_id).await?)
    }

    /// Move a session along its lifecycle. Forward-only; ENDED is
    /// terminal.
    pub async fn set_status(
        &self,
        session_id: Uuid,
        caller: &Caller,
        next: SessionStatus,
    ) -> Result<Session, DomainError> {
        let session = self.get(session_id).await?;
        ensure_course_staff(&self.enrollments, caller, session.course_id, "manage sessions")
            .await?;

        if !session.status.can_transition(next) {
            return Err(DomainError::policy(format!(
                "Cannot move session from {} to {}",
                session.status, next
            )));
        }
        let session = self.sessions.update_status(session_id, next).await?;
        tracing::info!(session_id = %session_id, status = %next, "session status changed");
        Ok(session)
    }

    /// Flip the submissions soft-lock. Legal in any status - pausing new
    /// questions mid-session must not require ending the session.
    pub async fn set_submissions_enabled(
        &self,
        session_id: Uuid,
        caller: &Caller,
        enabled: bool,
    ) -> Result<Session, DomainError> {
        let session = self.get(session_id).await?;
        ensure_course_staff(&self.enrollments, caller, session.course_id, "manage sessions")
            .await?;
        Ok(self
            .sessions
            .update_submissions_enabled(session_id, enabled)
            .await?)
    }

    pub async fn add_slide(
        &self,
        session_id: Uuid,
        caller: &Caller,
        slide_number: i32,
        content_ref: String,
    ) -> Result<Slide, DomainError> {
        let session = self.get(session_id).await?;
        ensure_course_staff(&self.enrollments, caller, session.course_id, "manage sessions")
            .await?;
        ensure_session_writable(session.status, WriteIntent::AddSlide, &self.policy)?;
        Ok(self
            .sessions
            .insert_slide(Slide::new(session_id, slide_number, content_ref))
            .await?)
    }

    pub async fn list_slides(&self, session_id: Uuid) -> Result<Vec<Slide>, DomainError> {
        // existence check first so an unknown session reads as not-found
        // rather than an empty deck
        self.get(session_id).await?;
        Ok(self.sessions.list_slides(session_id).await?)
    }

    /// End every session whose end time has passed. Driven by the
    /// background sweep.
    pub async fn end_overdue(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let swept = self.sessions.end_overdue(now).await?;
        if swept > 0 {
            tracing::info!(count = swept, "ended overdue sessions");
        }
        Ok(swept)
    }
}

fn generate_join_code() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    raw[..JOIN_CODE_LENGTH].to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::super::testing::{FakeStore, active_session};
    use super::*;
    use crate::domain::Role;

    fn harness() -> (Arc<FakeStore>, SessionService) {
        let store = Arc::new(FakeStore::new());
        let service = SessionService::new(store.clone(), store.clone(), CorePolicy::default());
        (store, service)
    }

    fn staff(store: &FakeStore, course_id: Uuid) -> Caller {
        let caller = Caller {
            user_id: Uuid::new_v4(),
            role: Role::Student,
        };
        store.enroll(caller.user_id, course_id, Role::Professor);
        caller
    }

    #[tokio::test]
    async fn create_requires_course_staff() {
        let (_store, service) = harness();
        let course_id = Uuid::new_v4();
        let outsider = Caller {
            user_id: Uuid::new_v4(),
            role: Role::Student,
        };
        let err = service
            .create(
                course_id,
                &outsider,
                NewSession {
                    title: "Lecture 1".into(),
                    start_time: None,
                    end_time: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn create_issues_join_code_and_scheduled_status() {
        let (store, service) = harness();
        let course_id = Uuid::new_v4();
        let caller = staff(&store, course_id);

        let session = service
            .create(
                course_id,
                &caller,
                NewSession {
                    title: "  Lecture 1  ".into(),
                    start_time: None,
                    end_time: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(session.title, "Lecture 1");
        assert_eq!(session.join_code.len(), 6);
        assert_eq!(session.status, SessionStatus::Scheduled);
        assert!(session.is_submissions_enabled);

        let found = service.join_by_code(&session.join_code.to_lowercase()).await.unwrap();
        assert_eq!(found.id, session.id);
    }

    #[tokio::test]
    async fn status_moves_forward_only() {
        let (store, service) = harness();
        let session = store.seed_session(active_session());
        let caller = staff(&store, session.course_id);

        let ended = service
            .set_status(session.id, &caller, SessionStatus::Ended)
            .await
            .unwrap();
        assert_eq!(ended.status, SessionStatus::Ended);

        let err = service
            .set_status(session.id, &caller, SessionStatus::Active)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot move session from ENDED to ACTIVE");
    }

    #[tokio::test]
    async fn submissions_toggle_works_in_any_status() {
        let (store, service) = harness();
        let mut seeded = active_session();
        seeded.status = SessionStatus::Ended;
        let session = store.seed_session(seeded);
        let caller = staff(&store, session.course_id);

        let updated = service
            .set_submissions_enabled(session.id, &caller, false)
            .await
            .unwrap();
        assert!(!updated.is_submissions_enabled);
    }

    #[tokio::test]
    async fn slides_rejected_after_session_ends() {
        let (store, service) = harness();
        let mut seeded = active_session();
        seeded.status = SessionStatus::Ended;
        let session = store.seed_session(seeded);
        let caller = staff(&store, session.course_id);

        let err = service
            .add_slide(session.id, &caller, 1, "deck.pdf#1".into())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot add slides to an ended session");
    }

    #[tokio::test]
    async fn slides_listed_in_order() {
        let (store, service) = harness();
        let session = store.seed_session(active_session());
        let caller = staff(&store, session.course_id);

        service.add_slide(session.id, &caller, 2, "deck.pdf#2".into()).await.unwrap();
        service.add_slide(session.id, &caller, 1, "deck.pdf#1".into()).await.unwrap();

        let slides = service.list_slides(session.id).await.unwrap();
        let numbers: Vec<i32> = slides.iter().map(|s| s.slide_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[tokio::test]
    async fn overdue_sweep_ends_only_elapsed_sessions() {
        let (store, service) = harness();
        let now = Utc::now();

        let mut overdue = active_session();
        overdue.end_time = Some(now - chrono::Duration::minutes(10));
        let overdue = store.seed_session(overdue);

        let mut running = active_session();
        running.end_time = Some(now + chrono::Duration::hours(1));
        let running = store.seed_session(running);

        let open_ended = store.seed_session(active_session());

        let swept = service.end_overdue(now).await.unwrap();
        assert_eq!(swept, 1);

        let sessions = store.sessions.lock().unwrap();
        assert_eq!(sessions[&overdue.id].status, SessionStatus::Ended);
        assert_eq!(sessions[&running.id].status, SessionStatus::Active);
        assert_eq!(sessions[&open_ended.id].status, SessionStatus::Active);
    }
}
