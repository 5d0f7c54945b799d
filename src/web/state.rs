//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{PasswordResetTokenGenerator, SessionManager};
use crate::board::BoardService;
use crate::db::UserRepository;
use crate::mail::{backend_from_config, EmailBackend};
use crate::{Config, Database, Result};

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Outgoing mail backend.
    pub mailer: Arc<dyn EmailBackend>,
    /// Password reset token generator.
    pub tokens: PasswordResetTokenGenerator,
}

impl AppState {
    /// Build state with an explicit mail backend.
    pub fn new(db: Database, config: Config, mailer: Arc<dyn EmailBackend>) -> Self {
        let tokens = PasswordResetTokenGenerator::new(
            &config.auth.secret_key,
            Duration::from_secs(config.auth.password_reset_timeout_secs),
        );
        Self {
            db,
            config: Arc::new(config),
            mailer,
            tokens,
        }
    }

    /// Build state, choosing the mail backend from the configuration.
    pub fn from_config(db: Database, config: Config) -> Result<Self> {
        let mailer = backend_from_config(&config.mail)?;
        Ok(Self::new(db, config, mailer))
    }

    /// Session manager using the configured session lifetime.
    pub fn sessions(&self) -> SessionManager<'_> {
        SessionManager::new(
            self.db.pool(),
            Duration::from_secs(self.config.auth.session_age_secs),
        )
    }

    /// Board service.
    pub fn boards(&self) -> BoardService<'_> {
        BoardService::new(&self.db)
    }

    /// User repository.
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self.db.pool())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("site", &self.config.site.name)
            .finish_non_exhaustive()
    }
}
