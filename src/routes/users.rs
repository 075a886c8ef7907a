use crate::{
    auth::{removal_cookie, session_cookie, AuthenticatedUser, RequireSession},
    config::AuthSettings,
    db::DbPool,
    error::AppError,
    models::{Credentials, Session, SignInRequest, User},
    services::users,
};
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// ## Responses:
/// - `200 OK`: the created user (`id`, `email`).
/// - `400 Bad Request`: malformed body, invalid email or a password shorter than 6 characters.
/// - `409 Conflict`: the email is already registered.
#[post("")]
pub async fn register(
    pool: web::Data<DbPool>,
    settings: web::Data<AuthSettings>,
    payload: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let user = users::register(&pool, &settings, &payload).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Sign in
///
/// Verifies the credentials, opens a server-side session and sets the session cookie.
///
/// ## Responses:
/// - `200 OK`: `{ "message": ..., "user": {...} }` plus `Set-Cookie`.
/// - `400 Bad Request`: malformed body or a missing field.
/// - `401 Unauthorized`: unknown email or wrong password.
#[post("/sessions")]
pub async fn sign_in(
    pool: web::Data<DbPool>,
    settings: web::Data<AuthSettings>,
    payload: web::Json<SignInRequest>,
) -> Result<impl Responder, AppError> {
    let (user, session) = users::sign_in(&pool, &settings, &payload).await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&settings, &session.token))
        .json(json!({
            "message": "Signed in successfully!",
            "user": user
        })))
}

/// Sign out
///
/// Drops the session named by the cookie, if any, and clears the cookie. Always succeeds.
#[delete("/sessions")]
pub async fn sign_out(
    pool: web::Data<DbPool>,
    settings: web::Data<AuthSettings>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    if let Some(cookie) = req.cookie(&settings.cookie_name) {
        Session::delete(&pool, cookie.value()).await?;
    }

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&settings))
        .json(json!({
            "success": true,
            "message": "Signed out successfully!"
        })))
}

/// The currently signed-in user.
#[get("/me", wrap = "RequireSession")]
pub async fn me(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = User::find_by_id(&pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(HttpResponse::Ok().json(user))
}
