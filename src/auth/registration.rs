//! User registration.

use thiserror::Error;
use tracing::info;

use crate::auth::validation::{validate_email, validate_username, ValidationError};
use crate::auth::{hash_password, validate_password, PasswordError};
use crate::db::{NewUser, User, UserRepository};

/// Registration-specific errors.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Username or e-mail failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// E-mail address is missing.
    #[error("This field is required.")]
    EmailRequired,

    /// Username already exists.
    #[error("A user with that username already exists.")]
    UsernameExists,

    /// Password failed the policy or could not be hashed.
    #[error("{0}")]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username.
    pub username: String,
    /// E-mail address (required).
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Register a new user.
///
/// Validates the username, e-mail and password policy, rejects taken
/// usernames, hashes the password and stores the user.
pub async fn register(
    repo: &UserRepository<'_>,
    request: RegistrationRequest,
) -> std::result::Result<User, RegistrationError> {
    let username = request.username.trim();
    let email = request.email.trim();

    validate_username(username)?;
    if email.is_empty() {
        return Err(RegistrationError::EmailRequired);
    }
    validate_email(email)?;
    validate_password(&request.password, username)?;

    if repo
        .username_exists(username)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?
    {
        return Err(RegistrationError::UsernameExists);
    }

    let password_hash = hash_password(&request.password)?;
    let new_user = NewUser::new(username, password_hash).with_email(email);

    let user = repo
        .create(&new_user)
        .await
        .map_err(|e| RegistrationError::Database(e.to_string()))?;

    info!(
        username = %user.username,
        user_id = user.id,
        "New user registered"
    );

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::db::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = register(
            &repo,
            RegistrationRequest::new("john", "john@doe.com", "abcdef123456"),
        )
        .await
        .unwrap();

        assert_eq!(user.username, "john");
        assert_eq!(user.email, "john@doe.com");
        assert_ne!(user.password, "abcdef123456");
        assert!(verify_password("abcdef123456", &user.password).is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        register(
            &repo,
            RegistrationRequest::new("john", "john@doe.com", "abcdef123456"),
        )
        .await
        .unwrap();

        let result = register(
            &repo,
            RegistrationRequest::new("John", "other@doe.com", "abcdef123456"),
        )
        .await;
        assert!(matches!(result, Err(RegistrationError::UsernameExists)));
    }

    #[tokio::test]
    async fn test_register_requires_email() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let result = register(&repo, RegistrationRequest::new("john", "  ", "abcdef123456")).await;
        assert!(matches!(result, Err(RegistrationError::EmailRequired)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let result = register(&repo, RegistrationRequest::new("john", "john@doe.com", "123")).await;
        assert!(matches!(
            result,
            Err(RegistrationError::Password(PasswordError::TooShort))
        ));
    }

    #[tokio::test]
    async fn test_register_invalid_username() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let result = register(
            &repo,
            RegistrationRequest::new("john doe", "john@doe.com", "abcdef123456"),
        )
        .await;
        assert!(matches!(
            result,
            Err(RegistrationError::Validation(
                ValidationError::UsernameInvalidChars
            ))
        ));
    }
}
