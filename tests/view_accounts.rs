//! Sign-up, login, logout and account settings tests.

mod common;

use axum::http::{header::COOKIE, StatusCode};
use boards::db::SessionRepository;
use boards::{verify_password, UserRepository};
use common::{location, set_cookie, spawn_app};

#[tokio::test]
async fn test_signup_page() {
    let app = spawn_app().await;
    let response = app.server.get("/signup/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains(r#"name="password2""#));
}

#[tokio::test]
async fn test_signup_creates_user_and_logs_in() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/signup/")
        .form(&[
            ("username", "john"),
            ("email", "john@doe.com"),
            ("password1", "abcdef123456"),
            ("password2", "abcdef123456"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    let user = UserRepository::new(app.db().pool())
        .get_by_username("john")
        .await
        .unwrap()
        .expect("user should be created");
    assert_eq!(user.email, "john@doe.com");

    let cookie = set_cookie(&response, "sessionid").expect("session cookie should be set");
    let response = app
        .server
        .get("/settings/account/")
        .add_header(COOKIE, cookie)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_invalid_data() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/signup/")
        .form(&[
            ("username", "john"),
            ("email", "john@doe.com"),
            ("password1", "abcdef123456"),
            ("password2", "abcdef654321"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(UserRepository::new(app.db().pool()).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let app = spawn_app().await;
    app.create_user("john", "john@doe.com", "123").await;

    let response = app
        .server
        .post("/signup/")
        .form(&[
            ("username", "John"),
            ("email", "other@doe.com"),
            ("password1", "abcdef123456"),
            ("password2", "abcdef123456"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .text()
        .contains("A user with that username already exists."));
    assert_eq!(UserRepository::new(app.db().pool()).count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_login_redirects_to_next() {
    let app = spawn_app().await;
    app.create_user("john", "john@doe.com", "123").await;

    let response = app
        .server
        .post("/login/")
        .form(&[
            ("username", "john"),
            ("password", "123"),
            ("next", "/boards/1/new/"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/boards/1/new/");
    assert!(set_cookie(&response, "sessionid").is_some());
}

#[tokio::test]
async fn test_login_ignores_offsite_next() {
    let app = spawn_app().await;
    app.create_user("john", "john@doe.com", "123").await;

    let response = app
        .server
        .post("/login/")
        .form(&[
            ("username", "john"),
            ("password", "123"),
            ("next", "//evil.example/"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_login_ignores_next_with_control_characters() {
    let app = spawn_app().await;
    app.create_user("john", "john@doe.com", "123").await;

    for next in ["/\t/evil.example/", "/\n/evil.example/"] {
        let response = app
            .server
            .post("/login/")
            .form(&[("username", "john"), ("password", "123"), ("next", next)])
            .await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(location(&response), "/");
    }
}

#[tokio::test]
async fn test_login_page_keeps_next() {
    let app = spawn_app().await;

    let response = app
        .server
        .get("/login/")
        .add_query_param("next", "/boards/1/new/")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .text()
        .contains(r#"name="next" value="/boards/1/new/""#));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = spawn_app().await;
    app.create_user("john", "john@doe.com", "123").await;

    let response = app
        .server
        .post("/login/")
        .form(&[("username", "john"), ("password", "wrong")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .text()
        .contains("Please enter a correct username and password."));
    assert!(set_cookie(&response, "sessionid").is_none());
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = spawn_app().await;
    let john = app.create_user("john", "john@doe.com", "123").await;
    let cookie = app.login(&john).await;

    let response = app
        .server
        .post("/logout/")
        .add_header(COOKIE, cookie.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    let response = app
        .server
        .get("/settings/account/")
        .add_header(COOKIE, cookie)
        .await;
    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login/?next=/settings/account/");
}

#[tokio::test]
async fn test_my_account_update() {
    let app = spawn_app().await;
    let john = app.create_user("john", "john@doe.com", "123").await;
    let cookie = app.login(&john).await;

    let response = app
        .server
        .post("/settings/account/")
        .add_header(COOKIE, cookie)
        .form(&[
            ("first_name", "John"),
            ("last_name", "Doe"),
            ("email", "johndoe@example.com"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/settings/account/");

    let john = app.user(john.id).await;
    assert_eq!(john.first_name, "John");
    assert_eq!(john.last_name, "Doe");
    assert_eq!(john.email, "johndoe@example.com");
}

#[tokio::test]
async fn test_my_account_invalid_email() {
    let app = spawn_app().await;
    let john = app.create_user("john", "john@doe.com", "123").await;
    let cookie = app.login(&john).await;

    let response = app
        .server
        .post("/settings/account/")
        .add_header(COOKIE, cookie)
        .form(&[("first_name", "John"), ("last_name", ""), ("email", "nope")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(app.user(john.id).await.email, "john@doe.com");
}

#[tokio::test]
async fn test_password_change() {
    let app = spawn_app().await;
    let john = app.create_user("john", "john@doe.com", "old_password").await;
    let cookie = app.login(&john).await;
    let other_session = app.login(&john).await;

    let response = app
        .server
        .post("/settings/password/")
        .add_header(COOKIE, cookie.clone())
        .form(&[
            ("old_password", "old_password"),
            ("new_password1", "new_password"),
            ("new_password2", "new_password"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/settings/password/done/");
    assert!(verify_password("new_password", &app.user(john.id).await.password).is_ok());

    // The current session survives; the other one is ended.
    let response = app
        .server
        .get("/settings/password/done/")
        .add_header(COOKIE, cookie)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let other_key = other_session.trim_start_matches("sessionid=");
    let sessions = SessionRepository::new(app.db().pool());
    assert!(sessions.get_valid(other_key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_password_change_wrong_old_password() {
    let app = spawn_app().await;
    let john = app.create_user("john", "john@doe.com", "old_password").await;
    let cookie = app.login(&john).await;

    let response = app
        .server
        .post("/settings/password/")
        .add_header(COOKIE, cookie)
        .form(&[
            ("old_password", "wrong"),
            ("new_password1", "new_password"),
            ("new_password2", "new_password"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .text()
        .contains("Your old password was entered incorrectly."));
    assert!(verify_password("old_password", &app.user(john.id).await.password).is_ok());
}

#[tokio::test]
async fn test_password_change_requires_login() {
    let app = spawn_app().await;
    let response = app.server.get("/settings/password/").await;
    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login/?next=/settings/password/");
}
