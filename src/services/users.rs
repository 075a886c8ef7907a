//! Registration and sign-in on top of the `users` and `sessions` tables.

use chrono::Utc;
use log::{info, warn};

use crate::auth::{hash_password, verify_password};
use crate::config::AuthSettings;
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::{Credentials, Session, SignInRequest, User};

/// Creates an account. Fails with `Conflict` when the email is taken.
pub async fn register(
    pool: &DbPool,
    settings: &AuthSettings,
    credentials: &Credentials,
) -> Result<User, AppError> {
    if User::find_by_email(pool, &credentials.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&credentials.password, settings.bcrypt_cost)?;
    // A concurrent registration can still win the race; the unique index turns
    // that into a Conflict as well.
    let user = User::insert(pool, &credentials.email, &password_hash).await?;
    info!("registered user {}", user.id);
    Ok(user)
}

/// Checks the credentials and opens a session.
///
/// Unknown emails and wrong passwords produce the same `Unauthorized` error.
pub async fn sign_in(
    pool: &DbPool,
    settings: &AuthSettings,
    credentials: &SignInRequest,
) -> Result<(User, Session), AppError> {
    let invalid = || AppError::Unauthorized("Invalid email/password".into());

    let user = match User::find_by_email(pool, &credentials.email).await? {
        Some(user) => user,
        None => {
            warn!("sign-in attempt for unknown email");
            return Err(invalid());
        }
    };

    if !verify_password(&credentials.password, &user.password_hash)? {
        warn!("wrong password for user {}", user.id);
        return Err(invalid());
    }

    let purged = Session::purge_expired(pool, Utc::now()).await?;
    if purged > 0 {
        info!("purged {} expired sessions", purged);
    }

    let session = Session::create(pool, user.id, settings.session_ttl_secs).await?;
    info!("user {} signed in", user.id);
    Ok((user, session))
}
