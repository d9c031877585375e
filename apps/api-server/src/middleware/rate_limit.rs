//! Per-IP request limiting middleware.
//!
//! A coarse guard in front of the per-action limits the core enforces,
//! sharing the same limiter port. Fails open on backend errors: a dead
//! Redis must not take the API down with it.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};

use lectern_core::ports::{RateLimiter, action_key};
use lectern_shared::ErrorResponse;

use crate::config::RequestLimitConfig;

/// Rate limiting middleware factory.
pub struct RequestLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
    config: RequestLimitConfig,
}

impl RequestLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>, config: RequestLimitConfig) -> Self {
        Self { limiter, config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequestLimitService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLimitService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            config: self.config.clone(),
        }))
    }
}

pub struct RequestLimitService<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    config: RequestLimitConfig,
}

impl<S, B> Service<ServiceRequest> for RequestLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();
        let max_requests = self.config.max_requests;
        let window = Duration::from_secs(self.config.window_secs);

        // Client identifier: real IP as seen through the proxy
        let key = action_key(
            "request-rate-limit",
            req.connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown"),
        );

        Box::pin(async move {
            match limiter.check_and_increment(&key, max_requests, window).await {
                Ok(decision) if decision.exceeded => {
                    tracing::warn!(key = %key, "request rate limit exceeded");

                    let retry_secs = decision.retry_after.as_secs();
                    let error = ErrorResponse::too_many_requests(
                        format!("Rate limit exceeded. Try again in {retry_secs} seconds."),
                        retry_secs,
                    );
                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("Retry-After", retry_secs.to_string()))
                        .json(error);

                    let (http_req, _payload) = req.into_parts();
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                other => {
                    if let Err(err) = other {
                        tracing::error!(error = %err, "rate limiter error, failing open");
                    }
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}
