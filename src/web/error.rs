//! Error pages for the web front end.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::BoardsError;

/// Error returned by page handlers.
#[derive(Debug, Error)]
pub enum PageError {
    /// The requested object does not exist or is not visible to the user.
    #[error("page not found")]
    NotFound,

    /// Anything else; logged and shown as a generic error page.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PageError {
    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BoardsError> for PageError {
    fn from(err: BoardsError) -> Self {
        match err {
            BoardsError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        Self::Internal(format!("template error: {err}"))
    }
}

#[derive(Template)]
#[template(path = "404.html")]
struct NotFoundTemplate;

#[derive(Template)]
#[template(path = "500.html")]
struct ServerErrorTemplate;

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::NotFound => NotFoundTemplate.render(),
            Self::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                ServerErrorTemplate.render()
            }
        }
        .unwrap_or_else(|_| status.to_string());

        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PageError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            PageError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_boards_error() {
        let err: PageError = BoardsError::NotFound("post".to_string()).into();
        assert!(matches!(err, PageError::NotFound));

        let err: PageError = BoardsError::Database("locked".to_string()).into();
        assert!(matches!(err, PageError::Internal(_)));
    }

    #[test]
    fn test_into_response() {
        let response = PageError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = PageError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
