//! Answer handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use lectern_core::domain::Answer;
use lectern_shared::ApiResponse;
use lectern_shared::dto::{AnswerResponse, SubmitAnswerRequest};

use crate::middleware::error::AppResult;
use crate::middleware::identity::Identity;
use crate::state::AppState;

fn answer_response(answer: Answer) -> AnswerResponse {
    AnswerResponse {
        id: answer.id,
        question_id: answer.question_id,
        author_id: answer.author_id,
        content: answer.content,
        is_accepted: answer.is_accepted,
        created_at: answer.created_at.to_rfc3339(),
    }
}

/// POST /api/questions/{id}/answers
pub async fn submit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<SubmitAnswerRequest>,
) -> AppResult<HttpResponse> {
    let answer = state
        .answers
        .submit(path.into_inner(), identity.user_id, &body.content)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(answer_response(answer))))
}

/// GET /api/questions/{id}/answers
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let answers = state
        .answers
        .list_for_question(path.into_inner(), &identity.caller())
        .await?;
    let responses: Vec<AnswerResponse> = answers.into_iter().map(answer_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(responses)))
}

/// POST /api/answers/{id}/accept - staff accepts an answer.
pub async fn accept(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let answer = state
        .answers
        .accept(path.into_inner(), &identity.caller())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(answer_response(answer))))
}
