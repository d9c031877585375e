//! HTTP handlers and route configuration.

mod answers;
mod health;
mod questions;
mod sessions;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Sessions within a course
            .service(
                web::scope("/courses/{course_id}/sessions")
                    .route("", web::post().to(sessions::create))
                    .route("", web::get().to(sessions::list_for_course)),
            )
            // Session lifecycle, slides, and questions
            .service(
                web::scope("/sessions")
                    .route("/join/{code}", web::get().to(sessions::join_by_code))
                    .route("/{id}", web::get().to(sessions::get))
                    .route("/{id}/status", web::patch().to(sessions::set_status))
                    .route("/{id}/submissions", web::patch().to(sessions::set_submissions))
                    .route("/{id}/slides", web::post().to(sessions::add_slide))
                    .route("/{id}/slides", web::get().to(sessions::list_slides))
                    .route("/{id}/questions", web::post().to(questions::create))
                    .route("/{id}/questions", web::get().to(questions::list)),
            )
            // Per-question operations
            .service(
                web::scope("/questions")
                    .route("/{id}", web::get().to(questions::get))
                    .route("/{id}/upvote", web::post().to(questions::toggle_upvote))
                    .route("/{id}/resolve", web::post().to(questions::resolve))
                    .route("/{id}/answers", web::post().to(answers::submit))
                    .route("/{id}/answers", web::get().to(answers::list)),
            )
            // Per-answer operations
            .service(
                web::scope("/answers").route("/{id}/accept", web::post().to(answers::accept)),
            ),
    );
}
