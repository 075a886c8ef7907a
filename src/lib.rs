#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "Session-authenticated to-do list REST API: domain models and their SQL, cookie"]
#![doc = "sessions, ownership checks, routing and error handling. The binary (`main.rs`)"]
#![doc = "only loads configuration, prepares the database and serves `build_app`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Logger, NormalizePath},
    web, App,
};

pub use crate::config::{AuthSettings, Config};
pub use crate::db::DbPool;
pub use crate::error::AppError;

/// Assembles the application: shared state, middleware, `/health`, `/api/v1` and
/// the JSON 404 fallback. Used by `main` and by the integration tests.
pub fn build_app(
    pool: DbPool,
    config: &Config,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);
    for origin in &config.allowed_origins {
        cors = cors.allowed_origin(origin);
    }

    App::new()
        .app_data(web::Data::new(pool))
        .app_data(web::Data::new(config.auth.clone()))
        .wrap(NormalizePath::trim())
        .wrap(cors)
        .wrap(Logger::default())
        .service(routes::health::health)
        .service(web::scope("/api/v1").configure(routes::config))
        .default_service(web::to(routes::not_found))
}
