//! Question handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use lectern_core::domain::{Question, UpvoteChange, Visibility};
use lectern_core::services::NewQuestion;
use lectern_shared::ApiResponse;
use lectern_shared::dto::{CreateQuestionRequest, QuestionResponse, UpvoteResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::identity::Identity;
use crate::state::AppState;

fn question_response(question: Question) -> QuestionResponse {
    QuestionResponse {
        id: question.id,
        session_id: question.session_id,
        slide_id: question.slide_id,
        author_id: question.author_id,
        content: question.content,
        is_anonymous: question.is_anonymous,
        visibility: question.visibility.to_string(),
        status: question.status.to_string(),
        upvote_count: question.upvote_count,
        created_at: question.created_at.to_rfc3339(),
    }
}

fn parse_visibility(raw: Option<&str>) -> Result<Visibility, AppError> {
    match raw {
        None => Ok(Visibility::default()),
        Some(value) => match value.to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Visibility::Public),
            "INSTRUCTOR_ONLY" => Ok(Visibility::InstructorOnly),
            other => Err(AppError::BadRequest(format!(
                "Unknown visibility: {other}"
            ))),
        },
    }
}

/// POST /api/sessions/{id}/questions
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateQuestionRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let visibility = parse_visibility(req.visibility.as_deref())?;
    let question = state
        .questions
        .create(
            path.into_inner(),
            &identity.caller(),
            NewQuestion {
                content: req.content,
                is_anonymous: req.is_anonymous,
                visibility,
                slide_id: req.slide_id,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(question_response(question))))
}

/// GET /api/sessions/{id}/questions
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let questions = state
        .questions
        .list_for_session(path.into_inner(), &identity.caller())
        .await?;
    let responses: Vec<QuestionResponse> =
        questions.into_iter().map(question_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(responses)))
}

/// GET /api/questions/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let question = state
        .questions
        .get(path.into_inner(), &identity.caller())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(question_response(question))))
}

/// POST /api/questions/{id}/upvote - toggle the caller's upvote.
pub async fn toggle_upvote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let toggle = state
        .upvotes
        .toggle(path.into_inner(), identity.user_id)
        .await?;
    let response = UpvoteResponse {
        applied: match toggle.applied {
            UpvoteChange::Added => "added".to_string(),
            UpvoteChange::Removed => "removed".to_string(),
        },
        upvote_count: toggle.new_count,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// POST /api/questions/{id}/resolve - staff resolution.
pub async fn resolve(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let question = state
        .questions
        .resolve(path.into_inner(), &identity.caller())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(question_response(question))))
}
