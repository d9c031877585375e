use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upvote join entity - (question, user), unique on that pair at the
/// storage layer. Row existence is the source of truth for the cached
/// `upvote_count` on the question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionUpvote {
    pub id: Uuid,
    pub question_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl QuestionUpvote {
    pub fn new(question_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Which way a toggle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpvoteChange {
    Added,
    Removed,
}

/// Outcome of a toggle: the direction applied and the refreshed counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpvoteToggle {
    pub applied: UpvoteChange,
    pub new_count: i32,
}
