use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::db::DbPool;
use crate::error::AppError;

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Email/password payload shared by registration and login.
#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String, // plaintext; only its bcrypt hash is stored
}

/// Login payload. No format rules: a malformed email or short password is just
/// a credential mismatch.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl User {
    pub async fn insert(pool: &DbPool, email: &str, password_hash: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2)
             RETURNING id, email, password_hash",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }
}
