//! Session cookie authentication.

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::db::User;
use crate::web::error::PageError;
use crate::web::state::AppState;
use crate::web::urls;

/// Name of the cookie holding the session key.
pub const SESSION_COOKIE: &str = "sessionid";

/// Build the session cookie for a freshly issued session key.
pub fn session_cookie(session_key: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_key))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie value that clears the session cookie.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// The logged-in user of a request.
///
/// Handlers taking this extractor require authentication: anonymous
/// requests are answered with a redirect to the login page, carrying the
/// requested URL in `next`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user.
    pub user: User,
    /// Key of the session the request was made with.
    pub session_key: String,
}

/// The logged-in user, if any.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl OptionalUser {
    /// The user, if logged in.
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref().map(|current| &current.user)
    }
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<CurrentUser>, PageError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(session_key) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return Ok(None);
    };

    let user = state.sessions().current_user(&session_key).await?;
    Ok(user.map(|user| CurrentUser { user, session_key }))
}

/// Path and query of the URL the client asked for.
fn requested_url(parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await {
            Ok(Some(current)) => Ok(current),
            Ok(None) => {
                let next = requested_url(parts);
                tracing::debug!(next = %next, "Anonymous request to protected page");
                Err(urls::found(&urls::login_with_next(
                    &state.config.auth.login_url,
                    &next,
                )))
            }
            Err(e) => Err(e.into_response()),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await
            .map(OptionalUser)
            .map_err(IntoResponse::into_response)
    }
}
