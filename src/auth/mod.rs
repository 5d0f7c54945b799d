//! Authentication module.
//!
//! This module provides password hashing, login sessions, user
//! registration and password reset tokens.

mod password;
mod registration;
mod session;
mod token;
pub mod validation;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use registration::{register, RegistrationError, RegistrationRequest};
pub use session::{authenticate, SessionError, SessionManager, DEFAULT_SESSION_AGE_SECS};
pub use token::{
    decode_uid, encode_uid, PasswordResetTokenGenerator, TokenError, DEFAULT_RESET_TIMEOUT_SECS,
    MAX_RESET_TIMEOUT_SECS,
};
pub use validation::ValidationError;
