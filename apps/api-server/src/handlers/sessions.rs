//! Session handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use lectern_core::domain::{Session, SessionStatus, Slide};
use lectern_core::services::NewSession;
use lectern_shared::ApiResponse;
use lectern_shared::dto::{
    CreateSessionRequest, CreateSlideRequest, SessionResponse, SetSubmissionsRequest,
    SlideResponse, UpdateSessionStatusRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::identity::Identity;
use crate::state::AppState;

fn session_response(session: Session) -> SessionResponse {
    SessionResponse {
        id: session.id,
        course_id: session.course_id,
        title: session.title,
        join_code: session.join_code,
        status: session.status.to_string(),
        is_submissions_enabled: session.is_submissions_enabled,
        start_time: session.start_time.map(|t| t.to_rfc3339()),
        end_time: session.end_time.map(|t| t.to_rfc3339()),
        created_at: session.created_at.to_rfc3339(),
    }
}

fn slide_response(slide: Slide) -> SlideResponse {
    SlideResponse {
        id: slide.id,
        session_id: slide.session_id,
        slide_number: slide.slide_number,
        content_ref: slide.content_ref,
    }
}

fn parse_status(raw: &str) -> Result<SessionStatus, AppError> {
    match raw.to_ascii_uppercase().as_str() {
        "SCHEDULED" => Ok(SessionStatus::Scheduled),
        "ACTIVE" => Ok(SessionStatus::Active),
        "ENDED" => Ok(SessionStatus::Ended),
        other => Err(AppError::BadRequest(format!(
            "Unknown session status: {other}"
        ))),
    }
}

/// POST /api/courses/{course_id}/sessions
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateSessionRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .sessions
        .create(
            path.into_inner(),
            &identity.caller(),
            NewSession {
                title: req.title,
                start_time: req.start_time,
                end_time: req.end_time,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(session_response(session))))
}

/// GET /api/courses/{course_id}/sessions
pub async fn list_for_course(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let sessions = state.sessions.list_for_course(path.into_inner()).await?;
    let responses: Vec<SessionResponse> = sessions.into_iter().map(session_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(responses)))
}

/// GET /api/sessions/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let session = state.sessions.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(session_response(session))))
}

/// GET /api/sessions/join/{code} - student entry point.
pub async fn join_by_code(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let session = state.sessions.join_by_code(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(session_response(session))))
}

/// PATCH /api/sessions/{id}/status
pub async fn set_status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateSessionStatusRequest>,
) -> AppResult<HttpResponse> {
    let next = parse_status(&body.status)?;
    let session = state
        .sessions
        .set_status(path.into_inner(), &identity.caller(), next)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(session_response(session))))
}

/// PATCH /api/sessions/{id}/submissions
pub async fn set_submissions(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<SetSubmissionsRequest>,
) -> AppResult<HttpResponse> {
    let session = state
        .sessions
        .set_submissions_enabled(path.into_inner(), &identity.caller(), body.enabled)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(session_response(session))))
}

/// POST /api/sessions/{id}/slides
pub async fn add_slide(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateSlideRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let slide = state
        .sessions
        .add_slide(
            path.into_inner(),
            &identity.caller(),
            req.slide_number,
            req.content_ref,
        )
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(slide_response(slide))))
}

/// GET /api/sessions/{id}/slides
pub async fn list_slides(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let slides = state.sessions.list_slides(path.into_inner()).await?;
    let responses: Vec<SlideResponse> = slides.into_iter().map(slide_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(responses)))
}
