//! Login sessions.
//!
//! Credentials are checked by [`authenticate`]; a successful login is
//! recorded as a session row whose key travels in the session cookie.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::verify_password;
use crate::db::{DbPool, NewSession, Session, SessionRepository, User, UserRepository, TIMESTAMP_FORMAT};
use crate::Result;

/// Default session lifetime (two weeks).
pub const DEFAULT_SESSION_AGE_SECS: u64 = 14 * 24 * 60 * 60;

/// Login errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Invalid credentials (wrong username or password).
    #[error("Please enter a correct username and password. Note that both fields may be case-sensitive.")]
    InvalidCredentials,

    /// Account is inactive.
    #[error("This account is inactive.")]
    AccountInactive,

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Check a username/password pair.
///
/// Returns the user when the password matches and the account is active.
pub async fn authenticate(
    repo: &UserRepository<'_>,
    username: &str,
    password: &str,
) -> std::result::Result<User, SessionError> {
    let user = repo
        .get_by_username(username.trim())
        .await
        .map_err(|e| SessionError::Database(e.to_string()))?
        .ok_or(SessionError::InvalidCredentials)?;

    if verify_password(password, &user.password).is_err() {
        warn!(username = %user.username, "Failed login attempt");
        return Err(SessionError::InvalidCredentials);
    }

    if !user.is_active {
        return Err(SessionError::AccountInactive);
    }

    Ok(user)
}

/// Session manager backed by the sessions table.
pub struct SessionManager<'a> {
    pool: &'a DbPool,
    session_age: Duration,
}

impl<'a> SessionManager<'a> {
    /// Create a session manager issuing sessions of the given lifetime.
    pub fn new(pool: &'a DbPool, session_age: Duration) -> Self {
        Self { pool, session_age }
    }

    /// Start a session for a user and stamp their last login.
    pub async fn login(&self, user: &User) -> Result<Session> {
        let age = chrono::Duration::from_std(self.session_age).unwrap_or_default();
        let expires_at = (Utc::now() + age).format(TIMESTAMP_FORMAT).to_string();

        let session = SessionRepository::new(self.pool)
            .create(&NewSession {
                session_key: Uuid::new_v4().to_string(),
                user_id: user.id,
                expires_at,
            })
            .await?;

        UserRepository::new(self.pool)
            .update_last_login(user.id)
            .await?;

        info!(user_id = user.id, username = %user.username, "User logged in");
        Ok(session)
    }

    /// Resolve a session key to its active user.
    ///
    /// Expired, revoked and unknown keys, as well as inactive users,
    /// resolve to `None`.
    pub async fn current_user(&self, session_key: &str) -> Result<Option<User>> {
        let Some(session) = SessionRepository::new(self.pool)
            .get_valid(session_key)
            .await?
        else {
            debug!("No valid session for key");
            return Ok(None);
        };

        let user = UserRepository::new(self.pool)
            .get_by_id(session.user_id)
            .await?
            .filter(|u| u.is_active);
        Ok(user)
    }

    /// End a session.
    pub async fn logout(&self, session_key: &str) -> Result<bool> {
        let revoked = SessionRepository::new(self.pool)
            .revoke(session_key)
            .await?;
        if revoked {
            info!("User logged out");
        }
        Ok(revoked)
    }

    /// End every session of a user, optionally sparing `keep`.
    ///
    /// Returns how many sessions were ended.
    pub async fn logout_everywhere(&self, user_id: i64, keep: Option<&str>) -> Result<u64> {
        let repo = SessionRepository::new(self.pool);
        let revoked = match keep {
            Some(key) => repo.revoke_all_for_user_except(user_id, key).await?,
            None => repo.revoke_all_for_user(user_id).await?,
        };
        debug!(user_id, revoked, "Sessions revoked");
        Ok(revoked)
    }
}
