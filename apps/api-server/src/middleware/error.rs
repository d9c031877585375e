//! Error handling middleware - maps domain error kinds to RFC 7807
//! responses with distinct status codes.

use std::fmt;
use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use lectern_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    RateLimited { detail: String, retry_after: Duration },
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::RateLimited { detail, .. } => write!(f, "Rate limited: {}", detail),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(detail) => {
                HttpResponse::NotFound().json(ErrorResponse::not_found(detail))
            }
            AppError::BadRequest(detail) => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(detail))
            }
            AppError::Unauthorized(detail) => HttpResponse::Unauthorized()
                .json(ErrorResponse::unauthorized().with_detail(detail)),
            AppError::Forbidden(detail) => {
                HttpResponse::Forbidden().json(ErrorResponse::forbidden(detail))
            }
            AppError::Conflict(detail) => {
                HttpResponse::Conflict().json(ErrorResponse::conflict(detail))
            }
            AppError::RateLimited {
                detail,
                retry_after,
            } => HttpResponse::TooManyRequests()
                .insert_header(("Retry-After", retry_after.as_secs().to_string()))
                .json(ErrorResponse::too_many_requests(detail, retry_after.as_secs())),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                HttpResponse::InternalServerError().json(ErrorResponse::internal_error())
            }
        }
    }
}

impl From<lectern_core::DomainError> for AppError {
    fn from(err: lectern_core::DomainError) -> Self {
        use lectern_core::DomainError;
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            // policy violations are conflicts with current state, not bad
            // input - the client did nothing malformed
            DomainError::Policy(msg) => AppError::Conflict(msg),
            DomainError::RateLimited { retry_after } => AppError::RateLimited {
                detail: format!(
                    "Rate limit exceeded, try again in {} seconds",
                    retry_after.as_secs()
                ),
                retry_after,
            },
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
