use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;

/// Server-side record binding an opaque cookie token to a user.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Opens a session for `user_id` that lives for `ttl_secs` seconds.
    ///
    /// A TTL whose expiry falls outside the representable date range is an
    /// internal error rather than a panic.
    pub async fn create(pool: &DbPool, user_id: i64, ttl_secs: i64) -> Result<Session, AppError> {
        let expires_at = Duration::try_seconds(ttl_secs)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::InternalServerError(format!("session TTL out of range: {}s", ttl_secs))
            })?;
        let token = Uuid::new_v4().simple().to_string();

        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)
             RETURNING token, user_id, expires_at",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;
        Ok(session)
    }

    /// Resolves a token to a live session. Expired rows are removed on sight.
    pub async fn find_active(pool: &DbPool, token: &str) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, user_id, expires_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        match session {
            Some(session) if session.is_expired(Utc::now()) => {
                debug!("session for user {} expired at {}", session.user_id, session.expires_at);
                Session::delete(pool, &session.token).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub async fn delete(pool: &DbPool, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Drops every session that expired at or before `now`; returns how many.
    pub async fn purge_expired(pool: &DbPool, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
