//! New topic page tests.

mod common;

use axum::http::{header::COOKIE, StatusCode};
use common::{location, spawn_app};

#[tokio::test]
async fn test_new_topic_page_renders_for_logged_in_user() {
    let app = spawn_app().await;
    let board = app.create_board("Django", "Django board.").await;
    let john = app.create_user("john", "john@doe.com", "123").await;
    let cookie = app.login(&john).await;

    let response = app
        .server
        .get(&format!("/boards/{}/new/", board.id))
        .add_header(COOKIE, cookie)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains(r#"name="subject""#));
    assert!(body.contains(r#"name="message""#));
    assert!(body.contains(&format!(r#"href="/boards/{}/""#, board.id)));
}

#[tokio::test]
async fn test_new_topic_unknown_board_is_not_found() {
    let app = spawn_app().await;
    let john = app.create_user("john", "john@doe.com", "123").await;
    let cookie = app.login(&john).await;

    let response = app
        .server
        .get("/boards/99/new/")
        .add_header(COOKIE, cookie)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_new_topic_requires_login() {
    let app = spawn_app().await;
    let board = app.create_board("Django", "Django board.").await;
    let url = format!("/boards/{}/new/", board.id);

    let response = app.server.get(&url).await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/login/?next={url}"));
}

#[tokio::test]
async fn test_anonymous_post_creates_nothing() {
    let app = spawn_app().await;
    let board = app.create_board("Django", "Django board.").await;
    let url = format!("/boards/{}/new/", board.id);

    let response = app
        .server
        .post(&url)
        .form(&[("subject", "Test title"), ("message", "Lorem ipsum dolor sit amet")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/login/?next={url}"));
    assert_eq!(app.topic_count().await, 0);
    assert_eq!(app.post_count().await, 0);
}

#[tokio::test]
async fn test_new_topic_valid_post_data() {
    let app = spawn_app().await;
    let board = app.create_board("Django", "Django board.").await;
    let john = app.create_user("john", "john@doe.com", "123").await;
    let cookie = app.login(&john).await;

    let response = app
        .server
        .post(&format!("/boards/{}/new/", board.id))
        .add_header(COOKIE, cookie)
        .form(&[("subject", "Test title"), ("message", "Lorem ipsum dolor sit amet")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(app.topic_count().await, 1);
    assert_eq!(app.post_count().await, 1);

    let topic = app.topic(1).await;
    assert_eq!(topic.subject, "Test title");
    assert_eq!(topic.board_id, board.id);
    assert_eq!(topic.starter_id, john.id);

    let post = app.post(1).await;
    assert_eq!(post.topic_id, topic.id);
    assert_eq!(post.created_by, john.id);
    assert_eq!(post.message, "Lorem ipsum dolor sit amet");

    assert_eq!(
        location(&response),
        format!("/boards/{}/topics/{}/", board.id, topic.id)
    );
}

#[tokio::test]
async fn test_new_topic_invalid_post_data() {
    let app = spawn_app().await;
    let board = app.create_board("Django", "Django board.").await;
    let john = app.create_user("john", "john@doe.com", "123").await;
    let cookie = app.login(&john).await;

    let response = app
        .server
        .post(&format!("/boards/{}/new/", board.id))
        .add_header(COOKIE, cookie)
        .form(&Vec::<(String, String)>::new())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("This field is required."));
    assert_eq!(app.topic_count().await, 0);
    assert_eq!(app.post_count().await, 0);
}

#[tokio::test]
async fn test_new_topic_invalid_post_data_empty_fields() {
    let app = spawn_app().await;
    let board = app.create_board("Django", "Django board.").await;
    let john = app.create_user("john", "john@doe.com", "123").await;
    let cookie = app.login(&john).await;

    let response = app
        .server
        .post(&format!("/boards/{}/new/", board.id))
        .add_header(COOKIE, cookie)
        .form(&[("subject", ""), ("message", "")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(app.topic_count().await, 0);
    assert_eq!(app.post_count().await, 0);
}

#[tokio::test]
async fn test_new_topic_keeps_submitted_values_on_error() {
    let app = spawn_app().await;
    let board = app.create_board("Django", "Django board.").await;
    let john = app.create_user("john", "john@doe.com", "123").await;
    let cookie = app.login(&john).await;

    let response = app
        .server
        .post(&format!("/boards/{}/new/", board.id))
        .add_header(COOKIE, cookie)
        .form(&[("subject", "Kept <subject>"), ("message", "")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Kept &lt;subject&gt;"));
    assert!(!body.contains("Kept <subject>"));
}
