//! HTML form payloads and their errors.
//!
//! Every form decodes with `#[serde(default)]` so that a missing field is
//! reported as a field error instead of a rejected request.

use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

/// Message for a missing required field.
pub const REQUIRED: &str = "This field is required.";

/// Errors collected while validating a submitted form.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a form with its derived rules.
    pub fn validate<T: Validate>(form: &T) -> Self {
        match form.validate() {
            Ok(()) => Self::new(),
            Err(errors) => Self::from_validation_errors(&errors),
        }
    }

    /// Convert validator errors into per-field messages.
    pub fn from_validation_errors(errors: &ValidationErrors) -> Self {
        let mut form_errors = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Enter a valid value.".to_string());
                form_errors.add(field, message);
            }
        }
        form_errors
    }

    /// Add an error to a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Add an error that belongs to the form as a whole.
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    /// Errors of one field.
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether a field has errors.
    pub fn has(&self, name: &str) -> bool {
        !self.field(name).is_empty()
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    /// Total number of error messages.
    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum::<usize>() + self.non_field.len()
    }
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required").with_message(REQUIRED.into()));
    }
    Ok(())
}

/// Start a topic.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewTopicForm {
    #[validate(custom(function = "not_blank"))]
    #[validate(length(
        max = 255,
        message = "Ensure this value has at most 255 characters."
    ))]
    pub subject: String,

    #[validate(custom(function = "not_blank"))]
    #[validate(length(
        max = 4000,
        message = "Ensure this value has at most 4000 characters."
    ))]
    pub message: String,
}

/// Reply to a topic, or edit a post.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(custom(function = "not_blank"))]
    #[validate(length(
        max = 4000,
        message = "Ensure this value has at most 4000 characters."
    ))]
    pub message: String,
}

/// Create an account.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignUpForm {
    #[validate(custom(function = "not_blank"))]
    pub username: String,
    #[validate(custom(function = "not_blank"))]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password1: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password2: String,
}

/// Log in.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(custom(function = "not_blank"))]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    pub next: String,
}

/// Query string of the login page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: String,
}

/// Query string of paginated listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Request a password reset e-mail.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PasswordResetForm {
    #[validate(custom(function = "not_blank"))]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
}

/// Choose a new password through a reset link.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SetPasswordForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub new_password1: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub new_password2: String,
}

/// Change the password of the logged-in user.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PasswordChangeForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub old_password: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub new_password1: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub new_password2: String,
}

/// Edit account details.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AccountForm {
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: String,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: String,
    #[validate(custom(function = "not_blank"))]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
}

/// Message when the two password fields differ.
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
