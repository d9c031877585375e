use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Answer entity - a staff/peer response to a question.
///
/// At most one answer per question carries `is_accepted`; the accept path
/// clears the flag on siblings in the same transaction that sets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: Uuid,
    pub question_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(question_id: Uuid, author_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            question_id,
            author_id,
            content,
            is_accepted: false,
            created_at: Utc::now(),
        }
    }
}
