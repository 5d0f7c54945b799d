//! Error types for the boards application.

use thiserror::Error;

/// Common error type for the boards application.
#[derive(Error, Debug)]
pub enum BoardsError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Mail delivery error.
    #[error("mail error: {0}")]
    Mail(#[from] crate::mail::MailError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for BoardsError {
    fn from(e: sqlx::Error) -> Self {
        BoardsError::Database(e.to_string())
    }
}

/// Result type alias for boards operations.
pub type Result<T> = std::result::Result<T, BoardsError>;
