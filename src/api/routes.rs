// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .service(
            web::scope("/form")
                .route("/field", web::post().to(handlers::edit_field))
                .route("/submit", web::post().to(handlers::submit))
                .route("/reset", web::post().to(handlers::reset))
        )
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(handlers::health_check))
                .route("/session", web::get().to(handlers::get_session))
        )
        .route("/static/{file:.*}", web::get().to(handlers::static_file_handler));
}
