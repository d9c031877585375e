use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

/// Lifecycle status of a question: OPEN -> ANSWERED -> RESOLVED,
/// forward-only. Staff may resolve an unanswered question, so skipping
/// ANSWERED is a legal move; no status ever moves backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionStatus {
    Open,
    Answered,
    Resolved,
}

impl QuestionStatus {
    fn rank(self) -> u8 {
        match self {
            QuestionStatus::Open => 0,
            QuestionStatus::Answered => 1,
            QuestionStatus::Resolved => 2,
        }
    }

    pub fn can_transition(self, next: QuestionStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            QuestionStatus::Open => "OPEN",
            QuestionStatus::Answered => "ANSWERED",
            QuestionStatus::Resolved => "RESOLVED",
        })
    }
}

/// Who may see a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Public,
    InstructorOnly,
}

impl Visibility {
    /// The single predicate applied at every read boundary.
    pub fn visible_to(self, role: Role) -> bool {
        match self {
            Visibility::Public => true,
            Visibility::InstructorOnly => role.is_staff(),
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Visibility::Public => "PUBLIC",
            Visibility::InstructorOnly => "INSTRUCTOR_ONLY",
        })
    }
}

/// Question entity.
///
/// `upvote_count` is a cached aggregate of the upvote rows; it is mutated
/// exclusively by the upvote coordinator, in the same transaction as the
/// row mutation. `author_id` is never populated for anonymous questions -
/// anonymity is irreversible at the storage layer, not a display-time mask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub session_id: Uuid,
    pub slide_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub content: String,
    pub is_anonymous: bool,
    pub visibility: Visibility,
    pub status: QuestionStatus,
    pub upvote_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Create a new OPEN question. The author reference is dropped here,
    /// at construction, when the question is anonymous.
    pub fn new(
        session_id: Uuid,
        slide_id: Option<Uuid>,
        author_id: Uuid,
        content: String,
        is_anonymous: bool,
        visibility: Visibility,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            slide_id,
            author_id: if is_anonymous { None } else { Some(author_id) },
            content,
            is_anonymous,
            visibility,
            status: QuestionStatus::Open,
            upvote_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn visible_to(&self, role: Role) -> bool {
        self.visibility.visible_to(role)
    }
}
