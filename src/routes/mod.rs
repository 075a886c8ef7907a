pub mod health;
pub mod todos;
pub mod users;

use actix_web::{web, HttpResponse};

use crate::auth::RequireSession;
use crate::error::AppError;

/// Mounts the `/api/v1` routes. Extractor failures are reported through `AppError`
/// so every error body has the same shape.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/users")
            .service(users::register)
            .service(users::sign_in)
            .service(users::sign_out)
            .service(users::me),
    )
    .service(
        web::scope("/todos")
            .wrap(RequireSession)
            .service(todos::list_todos)
            .service(todos::create_todo)
            .service(todos::get_todo)
            .service(todos::update_todo)
            .service(todos::delete_todo),
    );
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Not Found".into()))
}
