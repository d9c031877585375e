//! Session state gate - decides which writes a session's lifecycle status
//! admits. The gate only reads status; transitions happen in the session
//! lifecycle service.

use crate::domain::{Session, SessionStatus};
use crate::error::DomainError;

use super::CorePolicy;

/// The write being attempted, so refusals carry the exact rule violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteIntent {
    AskQuestion,
    PostAnswer,
    ToggleUpvote,
    ResolveQuestion,
    AcceptAnswer,
    AddSlide,
}

impl WriteIntent {
    fn ended_message(self) -> &'static str {
        match self {
            WriteIntent::AskQuestion => "Cannot ask questions in an ended session",
            WriteIntent::PostAnswer => "Cannot answer questions in an ended session",
            WriteIntent::ToggleUpvote => "Cannot upvote questions in an ended session",
            WriteIntent::ResolveQuestion => "Cannot resolve questions in an ended session",
            WriteIntent::AcceptAnswer => "Cannot accept answers in an ended session",
            WriteIntent::AddSlide => "Cannot add slides to an ended session",
        }
    }

    /// Q&A traffic is what the before-start policy withholds; staff
    /// housekeeping (slides, resolution) is legal in a SCHEDULED session
    /// either way.
    fn blocked_before_start(self) -> bool {
        matches!(
            self,
            WriteIntent::AskQuestion | WriteIntent::PostAnswer | WriteIntent::ToggleUpvote
        )
    }
}

/// Enforce the lifecycle rules for a write. ENDED is terminal and
/// absolute - no role bypasses it.
pub fn ensure_session_writable(
    status: SessionStatus,
    intent: WriteIntent,
    policy: &CorePolicy,
) -> Result<(), DomainError> {
    match status {
        SessionStatus::Ended => Err(DomainError::policy(intent.ended_message())),
        SessionStatus::Scheduled
            if intent.blocked_before_start() && !policy.allow_before_start =>
        {
            Err(DomainError::policy("Session has not started yet"))
        }
        _ => Ok(()),
    }
}

/// Question creation has one extra gate: the submissions soft-lock, which
/// applies in every status.
pub fn ensure_accepts_questions(session: &Session, policy: &CorePolicy) -> Result<(), DomainError> {
    ensure_session_writable(session.status, WriteIntent::AskQuestion, policy)?;
    if !session.is_submissions_enabled {
        return Err(DomainError::policy(
            "Submissions are currently disabled for this session",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn session(status: SessionStatus, submissions: bool) -> Session {
        let mut s = Session::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Midterm review".into(),
            "A1B2C3".into(),
            None,
            None,
        );
        s.status = status;
        s.is_submissions_enabled = submissions;
        s.updated_at = Utc::now();
        s
    }

    #[test]
    fn ended_blocks_every_intent() {
        let policy = CorePolicy::default();
        for intent in [
            WriteIntent::AskQuestion,
            WriteIntent::PostAnswer,
            WriteIntent::ToggleUpvote,
            WriteIntent::ResolveQuestion,
            WriteIntent::AcceptAnswer,
            WriteIntent::AddSlide,
        ] {
            let err = ensure_session_writable(SessionStatus::Ended, intent, &policy).unwrap_err();
            assert!(matches!(err, DomainError::Policy(_)), "{intent:?}");
        }
    }

    #[test]
    fn ended_messages_name_the_action() {
        let policy = CorePolicy::default();
        let err =
            ensure_session_writable(SessionStatus::Ended, WriteIntent::PostAnswer, &policy)
                .unwrap_err();
        assert_eq!(err.to_string(), "Cannot answer questions in an ended session");
    }

    #[test]
    fn scheduled_open_by_default() {
        let policy = CorePolicy::default();
        assert!(
            ensure_session_writable(SessionStatus::Scheduled, WriteIntent::AskQuestion, &policy)
                .is_ok()
        );
    }

    #[test]
    fn scheduled_blocks_qa_when_policy_closed() {
        let policy = CorePolicy {
            allow_before_start: false,
            ..CorePolicy::default()
        };
        assert!(
            ensure_session_writable(SessionStatus::Scheduled, WriteIntent::PostAnswer, &policy)
                .is_err()
        );
        // staff housekeeping stays legal
        assert!(
            ensure_session_writable(SessionStatus::Scheduled, WriteIntent::AddSlide, &policy)
                .is_ok()
        );
    }

    #[test]
    fn submissions_soft_lock_is_independent_of_status() {
        let policy = CorePolicy::default();
        let active_locked = session(SessionStatus::Active, false);
        let err = ensure_accepts_questions(&active_locked, &policy).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Submissions are currently disabled for this session"
        );

        let active_open = session(SessionStatus::Active, true);
        assert!(ensure_accepts_questions(&active_open, &policy).is_ok());
    }
}
