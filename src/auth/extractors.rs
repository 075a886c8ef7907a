use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// The identity resolved from the session cookie.
///
/// `RequireSession` inserts it into the request extensions; handlers take it as an
/// argument. Reaching a handler without the middleware fails with
/// `AppError::Unauthorized` instead of running unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub session_token: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::Unauthorized("You must be signed in to continue".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
