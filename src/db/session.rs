//! Login session repository.
//!
//! A session row binds an opaque cookie value to a user until it
//! expires or is revoked.

use super::{DbPool, SQL_NOW};
use crate::{BoardsError, Result};

const SESSION_COLUMNS: &str = "id, session_key, user_id, expires_at, created_at, revoked_at";

/// Session entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// Session ID.
    pub id: i64,
    /// Opaque key stored in the session cookie.
    pub session_key: String,
    /// Owning user ID.
    pub user_id: i64,
    /// Expiration timestamp.
    pub expires_at: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Revocation timestamp (None if not revoked).
    pub revoked_at: Option<String>,
}

/// New session for creation.
pub struct NewSession {
    /// Opaque key stored in the session cookie.
    pub session_key: String,
    /// Owning user ID.
    pub user_id: i64,
    /// Expiration timestamp.
    pub expires_at: String,
}

/// Repository for session operations.
pub struct SessionRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new session.
    pub async fn create(&self, new_session: &NewSession) -> Result<Session> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sessions (session_key, user_id, expires_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_session.session_key)
        .bind(new_session.user_id)
        .bind(&new_session.expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| BoardsError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BoardsError::NotFound("session".into()))
    }

    /// Get a session by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Session>> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?");
        let session = sqlx::query_as::<_, Session>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(session)
    }

    /// Get a valid (not expired, not revoked) session.
    pub async fn get_valid(&self, session_key: &str) -> Result<Option<Session>> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions
             WHERE session_key = ?
               AND revoked_at IS NULL
               AND expires_at > {SQL_NOW}"
        );
        let session = sqlx::query_as::<_, Session>(&sql)
            .bind(session_key)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(session)
    }

    /// Revoke a session.
    pub async fn revoke(&self, session_key: &str) -> Result<bool> {
        let sql = format!(
            "UPDATE sessions SET revoked_at = {SQL_NOW} WHERE session_key = ? AND revoked_at IS NULL"
        );
        let result = sqlx::query(&sql)
            .bind(session_key)
            .execute(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Revoke all sessions for a user.
    pub async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64> {
        let sql = format!(
            "UPDATE sessions SET revoked_at = {SQL_NOW} WHERE user_id = ? AND revoked_at IS NULL"
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Revoke every session of a user except the one with `keep_key`.
    pub async fn revoke_all_for_user_except(&self, user_id: i64, keep_key: &str) -> Result<u64> {
        let sql = format!(
            "UPDATE sessions SET revoked_at = {SQL_NOW}
             WHERE user_id = ? AND session_key != ? AND revoked_at IS NULL"
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(keep_key)
            .execute(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Delete expired and revoked sessions.
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let sql = format!(
            "DELETE FROM sessions WHERE expires_at < {SQL_NOW} OR revoked_at IS NOT NULL"
        );
        let result = sqlx::query(&sql)
            .execute(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
