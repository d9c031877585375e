use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a live Q&A session.
///
/// The machine is linear and forward-only: SCHEDULED -> ACTIVE -> ENDED.
/// Skipping ACTIVE is allowed so a session that never ran can still be
/// closed out. ENDED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Scheduled,
    Active,
    Ended,
}

impl SessionStatus {
    fn rank(self) -> u8 {
        match self {
            SessionStatus::Scheduled => 0,
            SessionStatus::Active => 1,
            SessionStatus::Ended => 2,
        }
    }

    /// Single transition predicate every call site consults; forward moves
    /// only, no self-transitions.
    pub fn can_transition(self, next: SessionStatus) -> bool {
        next.rank() > self.rank()
    }

    pub fn is_ended(self) -> bool {
        matches!(self, SessionStatus::Ended)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SessionStatus::Scheduled => "SCHEDULED",
            SessionStatus::Active => "ACTIVE",
            SessionStatus::Ended => "ENDED",
        })
    }
}

/// Session entity - one live Q&A event belonging to a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub course_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    /// Unique human-entry code students type to join.
    pub join_code: String,
    pub status: SessionStatus,
    /// Soft-lock on *new question* creation, independent of `status`.
    pub is_submissions_enabled: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        course_id: Uuid,
        created_by: Uuid,
        title: String,
        join_code: String,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            course_id,
            created_by,
            title,
            join_code,
            status: SessionStatus::Scheduled,
            is_submissions_enabled: true,
            start_time,
            end_time,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the overdue sweep should end this session at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_ended() && self.end_time.is_some_and(|end| end < now)
    }
}

/// Slide - an ordered content unit within a session that questions may
/// anchor to. `slide_number` is the ordering key, conventionally monotonic
/// but not required unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub id: Uuid,
    pub session_id: Uuid,
    pub slide_number: i32,
    pub content_ref: String,
    pub created_at: DateTime<Utc>,
}

impl Slide {
    pub fn new(session_id: Uuid, slide_number: i32, content_ref: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            slide_number,
            content_ref,
            created_at: Utc::now(),
        }
    }
}
