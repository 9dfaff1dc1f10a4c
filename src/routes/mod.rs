pub mod auth;
pub mod health;
pub mod todos;
pub mod users;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::AppError;

/// Message for any JSON body that cannot be read.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Turns unreadable JSON bodies (wrong types, unknown status values) into the same
/// `400 {"errors": [...]}` shape as validation failures. The parser detail is logged only.
fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected body for {} {}: {}", req.method(), req.path(), err);
    AppError::validation(INVALID_BODY_MESSAGE).into()
}

/// Registers every `/api` route. Mount it under `web::scope("/api")` wrapped in
/// `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(web::scope("/users").service(users::register))
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::current_user),
        )
        .service(
            web::scope("/todos")
                .service(todos::get_todos)
                .service(todos::create_todo)
                .service(todos::get_todo)
                .service(todos::update_todo)
                .service(todos::delete_todo),
        );
}
