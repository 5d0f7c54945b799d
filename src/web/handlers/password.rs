//! Password reset by e-mail.
//!
//! 1. `/reset/` takes an e-mail address and mails a one-time link to every
//!    active account registered with it. The reply is the same whether or
//!    not an account matched.
//! 2. `/reset/<uidb64>/<token>/` checks the link and lets the user choose a
//!    new password.
//! 3. `/reset/complete/` confirms the change.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use tracing::{error, info};
use url::Url;

use super::render;
use crate::auth::{decode_uid, encode_uid, hash_password, validate_password};
use crate::db::{User, UserUpdate};
use crate::mail::EmailMessage;
use crate::web::error::PageError;
use crate::web::forms::{FormErrors, PasswordResetForm, SetPasswordForm, PASSWORD_MISMATCH};
use crate::web::middleware::OptionalUser;
use crate::web::state::AppState;
use crate::web::templates::{
    Layout, PasswordResetCompleteTemplate, PasswordResetConfirmTemplate,
    PasswordResetDoneTemplate, PasswordResetEmail, PasswordResetTemplate,
};
use crate::web::urls;

/// Build the reset e-mail for one user.
fn reset_email(state: &AppState, user: &User) -> Result<EmailMessage, PageError> {
    let token = state
        .tokens
        .make_token(user)
        .map_err(|e| PageError::internal(e.to_string()))?;
    let path = urls::password_reset_confirm(&encode_uid(user.id), &token);
    let reset_url = Url::parse(&state.config.server.site_url)
        .and_then(|base| base.join(&path))
        .map_err(|e| PageError::internal(format!("invalid site_url: {e}")))?;

    let site_name = &state.config.site.name;
    let body = PasswordResetEmail {
        site_name,
        username: &user.username,
        reset_url: reset_url.as_str(),
    }
    .render()?;

    Ok(EmailMessage::new(
        &state.config.site.default_from_email,
        &user.email,
        format!("[{site_name}] Please reset your password"),
        body,
    ))
}

/// Password reset request form.
pub async fn password_reset_page(
    State(state): State<AppState>,
    viewer: OptionalUser,
) -> Result<Html<String>, PageError> {
    render(&PasswordResetTemplate {
        layout: Layout::new(&state, viewer.user()),
        email: String::new(),
        errors: FormErrors::new(),
    })
}

/// Send reset links for an e-mail address.
pub async fn password_reset(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Form(form): Form<PasswordResetForm>,
) -> Result<Response, PageError> {
    let errors = FormErrors::validate(&form);
    if !errors.is_empty() {
        let page = render(&PasswordResetTemplate {
            layout: Layout::new(&state, viewer.user()),
            email: form.email,
            errors,
        })?;
        return Ok(page.into_response());
    }

    let users = state.users().list_active_by_email(form.email.trim()).await?;
    let messages = users
        .iter()
        .map(|user| reset_email(&state, user))
        .collect::<Result<Vec<_>, _>>()?;

    if !messages.is_empty() {
        match state.mailer.send_messages(&messages).await {
            Ok(sent) => info!(sent, "Password reset e-mail sent"),
            Err(e) => error!(error = %e, "Failed to send password reset e-mail"),
        }
    }

    Ok(urls::found(urls::PASSWORD_RESET_DONE))
}

/// Shown after a reset request.
pub async fn password_reset_done(
    State(state): State<AppState>,
    viewer: OptionalUser,
) -> Result<Html<String>, PageError> {
    render(&PasswordResetDoneTemplate {
        layout: Layout::new(&state, viewer.user()),
    })
}

/// The user a reset link was issued for, if the link is still valid.
async fn user_for_link(
    state: &AppState,
    uidb64: &str,
    token: &str,
) -> Result<Option<User>, PageError> {
    let Some(id) = decode_uid(uidb64) else {
        return Ok(None);
    };
    let user = state
        .users()
        .get_by_id(id)
        .await?
        .filter(|user| user.is_active && state.tokens.check_token(user, token));
    Ok(user)
}

/// New password form behind a reset link.
///
/// An invalid or used link renders an explanation instead of the form.
pub async fn password_reset_confirm_page(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path((uidb64, token)): Path<(String, String)>,
) -> Result<Html<String>, PageError> {
    let user = user_for_link(&state, &uidb64, &token).await?;
    render(&PasswordResetConfirmTemplate {
        layout: Layout::new(&state, viewer.user()),
        valid_link: user.is_some(),
        errors: FormErrors::new(),
    })
}

/// Set a new password through a reset link.
pub async fn password_reset_confirm(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path((uidb64, token)): Path<(String, String)>,
    Form(form): Form<SetPasswordForm>,
) -> Result<Response, PageError> {
    let Some(user) = user_for_link(&state, &uidb64, &token).await? else {
        let page = render(&PasswordResetConfirmTemplate {
            layout: Layout::new(&state, viewer.user()),
            valid_link: false,
            errors: FormErrors::new(),
        })?;
        return Ok(page.into_response());
    };

    let mut errors = FormErrors::validate(&form);
    if !form.new_password2.is_empty() && form.new_password1 != form.new_password2 {
        errors.add("new_password2", PASSWORD_MISMATCH);
    } else if !form.new_password1.is_empty() {
        if let Err(e) = validate_password(&form.new_password1, &user.username) {
            errors.add("new_password2", e.to_string());
        }
    }

    if !errors.is_empty() {
        let page = render(&PasswordResetConfirmTemplate {
            layout: Layout::new(&state, viewer.user()),
            valid_link: true,
            errors,
        })?;
        return Ok(page.into_response());
    }

    let hash =
        hash_password(&form.new_password1).map_err(|e| PageError::internal(e.to_string()))?;
    state
        .users()
        .update(user.id, &UserUpdate::new().password(hash))
        .await?
        .ok_or(PageError::NotFound)?;
    let revoked = state.sessions().logout_everywhere(user.id, None).await?;
    info!(user_id = user.id, revoked_sessions = revoked, "Password reset");

    Ok(urls::found(urls::PASSWORD_RESET_COMPLETE))
}

/// Shown after a password was reset.
pub async fn password_reset_complete(
    State(state): State<AppState>,
    viewer: OptionalUser,
) -> Result<Html<String>, PageError> {
    render(&PasswordResetCompleteTemplate {
        layout: Layout::new(&state, viewer.user()),
    })
}
