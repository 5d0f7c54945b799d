//! Configuration module.

use serde::Deserialize;
use std::path::Path;

use crate::auth::MAX_RESET_TIMEOUT_SECS;
use crate::{BoardsError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL used when building absolute links (e.g. in e-mails).
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// Whether to serve static files.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_site_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_static_path() -> String {
    "static".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            site_url: default_site_url(),
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/boards.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Site information.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site name shown in page titles and e-mail subjects.
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Sender address for outgoing e-mail.
    #[serde(default = "default_from_email")]
    pub default_from_email: String,
}

fn default_site_name() -> String {
    "Boards".to_string()
}

fn default_from_email() -> String {
    "Boards <noreply@boards.local>".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            default_from_email: default_from_email(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret key used to sign password reset tokens (must be set).
    #[serde(default)]
    pub secret_key: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_age")]
    pub session_age_secs: u64,
    /// Password reset link lifetime in seconds.
    #[serde(default = "default_password_reset_timeout")]
    pub password_reset_timeout_secs: u64,
    /// Path of the login page used for login redirects.
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// Path users land on after login or logout.
    #[serde(default = "default_login_redirect_url")]
    pub login_redirect_url: String,
}

fn default_session_age() -> u64 {
    1_209_600 // 2 weeks
}

fn default_password_reset_timeout() -> u64 {
    259_200 // 3 days
}

fn default_login_url() -> String {
    "/login/".to_string()
}

fn default_login_redirect_url() -> String {
    "/".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            session_age_secs: default_session_age(),
            password_reset_timeout_secs: default_password_reset_timeout(),
            login_url: default_login_url(),
            login_redirect_url: default_login_redirect_url(),
        }
    }
}

/// Pagination configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Topics per page on the board page.
    #[serde(default = "default_topics_per_page")]
    pub topics_per_page: u32,
    /// Posts per page on the topic page.
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: u32,
}

fn default_topics_per_page() -> u32 {
    20
}

fn default_posts_per_page() -> u32 {
    2
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            topics_per_page: default_topics_per_page(),
            posts_per_page: default_posts_per_page(),
        }
    }
}

/// Mail backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailBackendKind {
    /// Write messages to the log.
    #[default]
    Console,
    /// Keep messages in memory (testing).
    Memory,
    /// Deliver through an SMTP relay.
    Smtp,
}

/// Mail configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Backend used to deliver e-mail.
    #[serde(default)]
    pub backend: MailBackendKind,
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// Upgrade the connection with STARTTLS.
    #[serde(default = "default_smtp_starttls")]
    pub smtp_starttls: bool,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_starttls() -> bool {
    true
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            backend: MailBackendKind::default(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            smtp_starttls: default_smtp_starttls(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file (empty for console only).
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/boards.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Site information.
    #[serde(default)]
    pub site: SiteConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Pagination configuration.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Mail configuration.
    #[serde(default)]
    pub mail: MailConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BoardsError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BoardsError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `BOARDS_SECRET_KEY`: Override the secret key
    /// - `BOARDS_DATABASE_PATH`: Override the database path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("BOARDS_SECRET_KEY") {
            if !secret.is_empty() {
                self.auth.secret_key = secret;
            }
        }
        if let Ok(path) = std::env::var("BOARDS_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the secret key is missing, the site URL does not
    /// parse, a pagination size is zero, or the reset link lifetime is zero
    /// or longer than a year.
    pub fn validate(&self) -> Result<()> {
        if self.auth.secret_key.is_empty() {
            return Err(BoardsError::Config(
                "secret_key is not set. \
                 Set it in config.toml or via BOARDS_SECRET_KEY environment variable."
                    .to_string(),
            ));
        }
        url::Url::parse(&self.server.site_url)
            .map_err(|e| BoardsError::Config(format!("invalid site_url: {e}")))?;
        if self.pagination.topics_per_page == 0 || self.pagination.posts_per_page == 0 {
            return Err(BoardsError::Config(
                "pagination sizes must be greater than zero".to_string(),
            ));
        }
        let reset_timeout = self.auth.password_reset_timeout_secs;
        if reset_timeout == 0 || reset_timeout > MAX_RESET_TIMEOUT_SECS {
            return Err(BoardsError::Config(format!(
                "password_reset_timeout_secs must be between 1 and {MAX_RESET_TIMEOUT_SECS}"
            )));
        }
        Ok(())
    }
}
