//! Sign-up, login, logout and account settings.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use super::render;
use crate::auth::{
    authenticate, hash_password, register, validate_password, verify_password,
    RegistrationError, RegistrationRequest, SessionError, ValidationError,
};
use crate::db::{User, UserUpdate};
use crate::web::error::PageError;
use crate::web::forms::{
    AccountForm, FormErrors, LoginForm, NextQuery, PasswordChangeForm, SignUpForm,
    PASSWORD_MISMATCH,
};
use crate::web::middleware::{
    removal_cookie, session_cookie, CurrentUser, OptionalUser, SESSION_COOKIE,
};
use crate::web::state::AppState;
use crate::web::templates::{
    Layout, LoginTemplate, MyAccountTemplate, PasswordChangeDoneTemplate,
    PasswordChangeTemplate, SignUpTemplate,
};
use crate::web::urls;

const OLD_PASSWORD_INCORRECT: &str =
    "Your old password was entered incorrectly. Please enter it again.";

/// Start a session for `user`, replacing any session the client already had.
async fn start_session(state: &AppState, jar: CookieJar, user: &User) -> Result<CookieJar, PageError> {
    let sessions = state.sessions();
    if let Some(old) = jar.get(SESSION_COOKIE) {
        sessions.logout(old.value()).await?;
    }
    let session = sessions.login(user).await?;
    Ok(jar.add(session_cookie(session.session_key)))
}

/// Sign-up form.
pub async fn signup_page(
    State(state): State<AppState>,
    viewer: OptionalUser,
) -> Result<Html<String>, PageError> {
    render(&SignUpTemplate {
        layout: Layout::new(&state, viewer.user()),
        form: SignUpForm::default(),
        errors: FormErrors::new(),
    })
}

/// Create an account and log it in.
pub async fn signup(
    State(state): State<AppState>,
    viewer: OptionalUser,
    jar: CookieJar,
    Form(form): Form<SignUpForm>,
) -> Result<Response, PageError> {
    let mut errors = FormErrors::validate(&form);
    if !form.password2.is_empty() && form.password1 != form.password2 {
        errors.add("password2", PASSWORD_MISMATCH);
    }

    if errors.is_empty() {
        let request = RegistrationRequest::new(&form.username, &form.email, &form.password1);
        match register(&state.users(), request).await {
            Ok(user) => {
                let jar = start_session(&state, jar, &user).await?;
                let target = urls::found(&state.config.auth.login_redirect_url);
                return Ok((jar, target).into_response());
            }
            Err(RegistrationError::Database(e)) => return Err(PageError::Internal(e)),
            Err(e) => {
                let field = match &e {
                    RegistrationError::Validation(
                        ValidationError::EmailTooLong | ValidationError::EmailInvalidFormat,
                    )
                    | RegistrationError::EmailRequired => "email",
                    RegistrationError::Password(_) => "password2",
                    _ => "username",
                };
                errors.add(field, e.to_string());
            }
        }
    }

    let page = render(&SignUpTemplate {
        layout: Layout::new(&state, viewer.user()),
        form: SignUpForm {
            password1: String::new(),
            password2: String::new(),
            ..form
        },
        errors,
    })?;
    Ok(page.into_response())
}

/// Login form.
pub async fn login_page(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Query(query): Query<NextQuery>,
) -> Result<Html<String>, PageError> {
    let next = if urls::is_safe_next(&query.next) {
        query.next
    } else {
        String::new()
    };
    render(&LoginTemplate {
        layout: Layout::new(&state, viewer.user()),
        username: String::new(),
        next,
        errors: FormErrors::new(),
    })
}

/// Check credentials and start a session.
///
/// On success the client is sent to `next` when it is a local path, and to
/// the configured landing page otherwise.
pub async fn login(
    State(state): State<AppState>,
    viewer: OptionalUser,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let mut errors = FormErrors::validate(&form);

    if errors.is_empty() {
        match authenticate(&state.users(), &form.username, &form.password).await {
            Ok(user) => {
                let jar = start_session(&state, jar, &user).await?;
                let target = if urls::is_safe_next(&form.next) {
                    form.next.as_str()
                } else {
                    state.config.auth.login_redirect_url.as_str()
                };
                return Ok((jar, urls::found(target)).into_response());
            }
            Err(SessionError::Database(e)) => return Err(PageError::Internal(e)),
            Err(e) => errors.add_non_field(e.to_string()),
        }
    }

    let next = if urls::is_safe_next(&form.next) {
        form.next
    } else {
        String::new()
    };
    let page = render(&LoginTemplate {
        layout: Layout::new(&state, viewer.user()),
        username: form.username,
        next,
        errors,
    })?;
    Ok(page.into_response())
}

/// End the current session.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<Response, PageError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions().logout(cookie.value()).await?;
    }
    let jar = jar.remove(removal_cookie());
    Ok((jar, urls::found(&state.config.auth.login_redirect_url)).into_response())
}

/// Account details form.
pub async fn my_account_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Html<String>, PageError> {
    let form = AccountForm {
        first_name: current.user.first_name.clone(),
        last_name: current.user.last_name.clone(),
        email: current.user.email.clone(),
    };
    render(&MyAccountTemplate {
        layout: Layout::new(&state, Some(&current.user)),
        form,
        errors: FormErrors::new(),
    })
}

/// Save account details.
pub async fn my_account(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<AccountForm>,
) -> Result<Response, PageError> {
    let errors = FormErrors::validate(&form);
    if errors.is_empty() {
        let update = UserUpdate::new()
            .first_name(form.first_name.trim())
            .last_name(form.last_name.trim())
            .email(form.email.trim());
        state
            .users()
            .update(current.user.id, &update)
            .await?
            .ok_or(PageError::NotFound)?;
        info!(user_id = current.user.id, "Account details updated");
        return Ok(urls::found(urls::MY_ACCOUNT));
    }

    let page = render(&MyAccountTemplate {
        layout: Layout::new(&state, Some(&current.user)),
        form,
        errors,
    })?;
    Ok(page.into_response())
}

/// Password change form.
pub async fn password_change_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Html<String>, PageError> {
    render(&PasswordChangeTemplate {
        layout: Layout::new(&state, Some(&current.user)),
        errors: FormErrors::new(),
    })
}

/// Change the password.
///
/// Every other session of the user is ended; the current one stays valid.
pub async fn password_change(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<PasswordChangeForm>,
) -> Result<Response, PageError> {
    let mut errors = FormErrors::validate(&form);

    if !form.old_password.is_empty()
        && verify_password(&form.old_password, &current.user.password).is_err()
    {
        errors.add("old_password", OLD_PASSWORD_INCORRECT);
    }
    if !form.new_password2.is_empty() && form.new_password1 != form.new_password2 {
        errors.add("new_password2", PASSWORD_MISMATCH);
    } else if !form.new_password1.is_empty() {
        if let Err(e) = validate_password(&form.new_password1, &current.user.username) {
            errors.add("new_password2", e.to_string());
        }
    }

    if errors.is_empty() {
        let hash = hash_password(&form.new_password1)
            .map_err(|e| PageError::internal(e.to_string()))?;
        state
            .users()
            .update(current.user.id, &UserUpdate::new().password(hash))
            .await?
            .ok_or(PageError::NotFound)?;
        let revoked = state
            .sessions()
            .logout_everywhere(current.user.id, Some(&current.session_key))
            .await?;
        info!(
            user_id = current.user.id,
            revoked_sessions = revoked,
            "Password changed"
        );
        return Ok(urls::found(urls::PASSWORD_CHANGE_DONE));
    }

    warn!(user_id = current.user.id, "Password change rejected");
    let page = render(&PasswordChangeTemplate {
        layout: Layout::new(&state, Some(&current.user)),
        errors,
    })?;
    Ok(page.into_response())
}

/// Shown after a password change.
pub async fn password_change_done(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Html<String>, PageError> {
    render(&PasswordChangeDoneTemplate {
        layout: Layout::new(&state, Some(&current.user)),
    })
}
