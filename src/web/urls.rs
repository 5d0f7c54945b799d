//! URL building and redirects.

use axum::{
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Home page.
pub const HOME: &str = "/";
/// Sign-up page.
pub const SIGNUP: &str = "/signup/";
/// Password reset request page.
pub const PASSWORD_RESET: &str = "/reset/";
/// Shown after a reset request, whether or not an e-mail was sent.
pub const PASSWORD_RESET_DONE: &str = "/reset/done/";
/// Shown after a new password was set through a reset link.
pub const PASSWORD_RESET_COMPLETE: &str = "/reset/complete/";
/// Password change page.
pub const PASSWORD_CHANGE: &str = "/settings/password/";
/// Shown after a password change.
pub const PASSWORD_CHANGE_DONE: &str = "/settings/password/done/";
/// Account settings page.
pub const MY_ACCOUNT: &str = "/settings/account/";

pub fn board_topics(board_id: i64) -> String {
    format!("/boards/{board_id}/")
}

pub fn new_topic(board_id: i64) -> String {
    format!("/boards/{board_id}/new/")
}

pub fn topic_posts(board_id: i64, topic_id: i64) -> String {
    format!("/boards/{board_id}/topics/{topic_id}/")
}

pub fn reply_topic(board_id: i64, topic_id: i64) -> String {
    format!("/boards/{board_id}/topics/{topic_id}/reply/")
}

pub fn edit_post(board_id: i64, topic_id: i64, post_id: i64) -> String {
    format!("/boards/{board_id}/topics/{topic_id}/posts/{post_id}/edit/")
}

pub fn password_reset_confirm(uidb64: &str, token: &str) -> String {
    format!("/reset/{uidb64}/{token}/")
}

/// Login page URL carrying the page to return to.
///
/// Slashes in `next` are kept as-is; other reserved characters are
/// percent-encoded.
pub fn login_with_next(login_url: &str, next: &str) -> String {
    let encoded = urlencoding::encode(next).replace("%2F", "/");
    format!("{login_url}?next={encoded}")
}

/// Whether `next` is a path on this site that a login may redirect to.
///
/// Browsers drop tabs and newlines while parsing a `Location`, so any
/// control character could turn `/\t/host` into `//host`.
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && !next.chars().any(char::is_control)
}

/// A `302 Found` redirect.
pub fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::warn!(location, "Refusing redirect to invalid location");
            (StatusCode::FOUND, [(LOCATION, HeaderValue::from_static(HOME))]).into_response()
        }
    }
}
