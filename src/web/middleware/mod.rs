//! Request extractors and middleware for the web front end.

pub mod auth;
pub mod security;

pub use auth::{
    removal_cookie, session_cookie, CurrentUser, OptionalUser, SESSION_COOKIE,
};
pub use security::security_headers;
