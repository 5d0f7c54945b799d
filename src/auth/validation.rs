//! Input validation for account fields.
//!
//! Usernames and e-mail addresses are checked here; the password policy
//! lives in [`crate::auth::password`].

use thiserror::Error;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of first and last name.
pub const MAX_NAME_LENGTH: usize = 150;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is empty.
    #[error("This field is required.")]
    UsernameEmpty,

    /// Username is too long.
    #[error("Ensure this value has at most {MAX_USERNAME_LENGTH} characters.")]
    UsernameTooLong,

    /// Username contains invalid characters.
    #[error("Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.")]
    UsernameInvalidChars,

    /// Email is too long.
    #[error("Ensure this value has at most {MAX_EMAIL_LENGTH} characters.")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("Enter a valid email address.")]
    EmailInvalidFormat,
}

/// Validate a username.
///
/// Requirements:
/// - Length: 1-150 characters
/// - Characters: letters, digits and `@ . + - _`
///
/// # Examples
///
/// ```
/// use boards::auth::validation::validate_username;
///
/// assert!(validate_username("john.doe@home").is_ok());
/// assert!(validate_username("john doe").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameEmpty);
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Validate an email address.
///
/// Empty input is accepted; callers that require an address check for
/// emptiness themselves.
///
/// # Examples
///
/// ```
/// use boards::auth::validation::validate_email;
///
/// assert!(validate_email("").is_ok());
/// assert!(validate_email("john@doe.com").is_ok());
/// assert!(validate_email("invalid").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Ok(());
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let (local, domain) = email
        .rsplit_once('@')
        .ok_or(ValidationError::EmailInvalidFormat)?;
    if local.is_empty() || local.contains('@') {
        return Err(ValidationError::EmailInvalidFormat);
    }
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}
