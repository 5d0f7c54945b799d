//! Page handlers.

pub mod account;
pub mod board;
pub mod password;

pub use account::*;
pub use board::*;
pub use password::*;

use askama::Template;
use axum::response::Html;

use super::error::PageError;

/// Render a template into an HTML response body.
pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>, PageError> {
    Ok(Html(template.render()?))
}
