//! Router configuration for the web front end.

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::error::PageError;
use super::handlers::{
    board_topics, edit_post, edit_post_page, home, login, login_page, logout, my_account,
    my_account_page, new_topic, new_topic_page, password_change, password_change_done,
    password_change_page, password_reset, password_reset_complete, password_reset_confirm,
    password_reset_confirm_page, password_reset_done, password_reset_page, reply_topic,
    reply_topic_page, signup, signup_page, topic_posts,
};
use super::middleware::security_headers;
use super::state::AppState;

/// Create the page router.
pub fn create_router(state: AppState) -> Router {
    let board_routes = Router::new()
        .route("/", get(home))
        .route("/boards/:board_id/", get(board_topics))
        .route("/boards/:board_id/new/", get(new_topic_page).post(new_topic))
        .route("/boards/:board_id/topics/:topic_id/", get(topic_posts))
        .route(
            "/boards/:board_id/topics/:topic_id/reply/",
            get(reply_topic_page).post(reply_topic),
        )
        .route(
            "/boards/:board_id/topics/:topic_id/posts/:post_id/edit/",
            get(edit_post_page).post(edit_post),
        );

    let account_routes = Router::new()
        .route("/signup/", get(signup_page).post(signup))
        .route("/login/", get(login_page).post(login))
        .route("/logout/", get(logout).post(logout))
        .route("/settings/account/", get(my_account_page).post(my_account))
        .route(
            "/settings/password/",
            get(password_change_page).post(password_change),
        )
        .route("/settings/password/done/", get(password_change_done));

    let reset_routes = Router::new()
        .route("/reset/", get(password_reset_page).post(password_reset))
        .route("/reset/done/", get(password_reset_done))
        .route(
            "/reset/:uidb64/:token/",
            get(password_reset_confirm_page).post(password_reset_confirm),
        )
        .route("/reset/complete/", get(password_reset_complete));

    Router::new()
        .merge(board_routes)
        .merge(account_routes)
        .merge(reset_routes)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(state)
}

async fn not_found() -> PageError {
    PageError::NotFound
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Serve files under `/static/` from a directory.
///
/// Returns `None` when the directory does not exist.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let path = std::path::Path::new(static_path);
    if !path.is_dir() {
        tracing::warn!(path = static_path, "Static directory not found");
        return None;
    }
    Some(Router::new().nest_service("/static", ServeDir::new(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let response = create_health_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_static_router_missing_dir() {
        assert!(create_static_router("/nonexistent/static/dir").is_none());
    }

    #[test]
    fn test_static_router_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(create_static_router(dir.path().to_str().unwrap()).is_some());
    }
}
