//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a session in a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Request to move a session along its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSessionStatusRequest {
    /// One of SCHEDULED, ACTIVE, ENDED.
    pub status: String,
}

/// Request to flip the submissions soft-lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSubmissionsRequest {
    pub enabled: bool,
}

/// Response describing a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub join_code: String,
    pub status: String,
    pub is_submissions_enabled: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub created_at: String,
}

/// Request to add a slide to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlideRequest {
    pub slide_number: i32,
    pub content_ref: String,
}

/// Response describing a slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub slide_number: i32,
    pub content_ref: String,
}

/// Request to ask a question in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
    /// PUBLIC (default) or INSTRUCTOR_ONLY.
    pub visibility: Option<String>,
    pub slide_id: Option<Uuid>,
}

/// Response describing a question. `author_id` is absent for anonymous
/// questions because it was never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub slide_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub content: String,
    pub is_anonymous: bool,
    pub visibility: String,
    pub status: String,
    pub upvote_count: i32,
    pub created_at: String,
}

/// Request to answer a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub content: String,
}

/// Response describing an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub id: Uuid,
    pub question_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub is_accepted: bool,
    pub created_at: String,
}

/// Outcome of an upvote toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpvoteResponse {
    /// "added" or "removed".
    pub applied: String,
    pub upvote_count: i32,
}
