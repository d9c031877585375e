//! Identity extraction from trusted upstream headers.
//!
//! Authentication happens at the institution's SSO reverse proxy, which
//! strips these headers from inbound traffic and injects the
//! authenticated user's identity. The API only parses them.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use std::future::{Ready, ready};

use lectern_core::domain::Role;
use lectern_core::services::Caller;
use lectern_shared::ErrorResponse;

pub static USER_ID_HEADER: &str = "X-User-Id";
pub static USER_ROLE_HEADER: &str = "X-User-Role";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require an authenticated caller:
/// ```ignore
/// async fn ask(identity: Identity, ...) -> AppResult<HttpResponse> {
///     let caller = identity.caller();
///     ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub role: Role,
}

impl Identity {
    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

/// Error type for identity extraction failures.
#[derive(Debug)]
pub struct IdentityError(String);

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for IdentityError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::Unauthorized()
            .json(ErrorResponse::unauthorized().with_detail(self.0.clone()))
    }
}

fn header<'r>(req: &'r HttpRequest, name: &str) -> Result<&'r str, IdentityError> {
    req.headers()
        .get(name)
        .ok_or_else(|| IdentityError(format!("Missing {name} header")))?
        .to_str()
        .map_err(|_| IdentityError(format!("Malformed {name} header")))
}

impl FromRequest for Identity {
    type Error = IdentityError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result: Result<Identity, IdentityError> = (|| {
            let user_id = header(req, USER_ID_HEADER)?
                .parse::<uuid::Uuid>()
                .map_err(|_| IdentityError(format!("Malformed {USER_ID_HEADER} header")))?;
            let role = header(req, USER_ROLE_HEADER)?
                .parse::<Role>()
                .map_err(|_| IdentityError(format!("Malformed {USER_ROLE_HEADER} header")))?;
            Ok(Identity { user_id, role })
        })();
        ready(result)
    }
}
