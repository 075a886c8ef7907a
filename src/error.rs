//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the service.
//! Every failure a handler can produce, from a missing session cookie to a database
//! fault, is expressed as one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers return
//! `Result<_, AppError>` and the framework renders the matching status code with a
//! `{"error": "..."}` JSON body. `From` implementations for `sqlx::Error`,
//! `validator::ValidationErrors` and `bcrypt::BcryptError` let the `?` operator do
//! the conversion.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use log::error;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// The request carries no valid session, or the supplied credentials are wrong (HTTP 401).
    Unauthorized(String),
    /// The caller is authenticated but does not own the target record (HTTP 403).
    Forbidden(String),
    /// The resource being created already exists, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// Malformed request: unparsable JSON body or path parameter (HTTP 400).
    BadRequest(String),
    /// A requested resource was not found (HTTP 404).
    NotFound(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Error originating from database operations (HTTP 500).
    /// Wraps errors from the `sqlx` crate.
    DatabaseError(String),
    /// Failed input validation on a well-formed payload (HTTP 400).
    /// Wraps errors from the `validator` crate.
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl AppError {
    fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg)
            | AppError::ValidationError(msg) => msg,
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        // Database details stay in the log; clients get a generic message.
        let message = match self {
            AppError::DatabaseError(_) => "Database error",
            other => other.message(),
        };
        HttpResponse::build(status).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound` and a unique-constraint violation becomes
/// `Conflict`; anything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                AppError::Conflict("Resource already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
