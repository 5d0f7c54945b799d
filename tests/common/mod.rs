//! Test helpers for the page tests.
//!
//! Each test gets its own in-memory database, an in-memory mail outbox and
//! an `axum_test::TestServer` wrapping the full router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::{LOCATION, SET_COOKIE};
use axum_test::{TestResponse, TestServer};

use boards::auth::SessionManager;
use boards::board::{BoardService, Post, PostRepository, Topic, TopicRepository};
use boards::config::Config;
use boards::db::{NewUser, User, UserRepository};
use boards::mail::MemoryBackend;
use boards::web::{create_router, AppState};
use boards::{hash_password, Board, Database};

/// Secret used to sign reset tokens in tests.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// A running application for one test.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub mailer: MemoryBackend,
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.secret_key = TEST_SECRET.to_string();
    config.server.site_url = "http://testserver".to_string();
    config.site.name = "Boards".to_string();
    config
}

/// Create a test server with an in-memory database.
pub async fn spawn_app() -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let mailer = MemoryBackend::new();
    let state = AppState::new(db, test_config(), Arc::new(mailer.clone()));
    let server =
        TestServer::new(create_router(state.clone())).expect("Failed to create test server");

    TestApp {
        server,
        state,
        mailer,
    }
}

impl TestApp {
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Create a user directly in the database.
    pub async fn create_user(&self, username: &str, email: &str, password: &str) -> User {
        let hash = hash_password(password).expect("Failed to hash password");
        UserRepository::new(self.db().pool())
            .create(&NewUser::new(username, hash).with_email(email))
            .await
            .expect("Failed to create test user")
    }

    pub async fn create_board(&self, name: &str, description: &str) -> Board {
        BoardService::new(self.db())
            .create_board(name, description)
            .await
            .expect("Failed to create test board")
    }

    pub async fn start_topic(&self, board: &Board, starter: &User, subject: &str) -> (Topic, Post) {
        BoardService::new(self.db())
            .start_topic(board.id, starter.id, subject, "Lorem ipsum dolor sit amet")
            .await
            .expect("Failed to create test topic")
    }

    /// Open a session for `user` and return the matching `Cookie` header value.
    pub async fn login(&self, user: &User) -> String {
        let session = SessionManager::new(self.db().pool(), std::time::Duration::from_secs(3600))
            .login(user)
            .await
            .expect("Failed to create session");
        format!("sessionid={}", session.session_key)
    }

    pub async fn user(&self, id: i64) -> User {
        UserRepository::new(self.db().pool())
            .get_by_id(id)
            .await
            .unwrap()
            .expect("user should exist")
    }

    pub async fn topic(&self, id: i64) -> Topic {
        TopicRepository::new(self.db().pool())
            .get_by_id(id)
            .await
            .unwrap()
            .expect("topic should exist")
    }

    pub async fn post(&self, id: i64) -> Post {
        PostRepository::new(self.db().pool())
            .get_by_id(id)
            .await
            .unwrap()
            .expect("post should exist")
    }

    pub async fn topic_count(&self) -> i64 {
        TopicRepository::new(self.db().pool()).count().await.unwrap()
    }

    pub async fn post_count(&self) -> i64 {
        PostRepository::new(self.db().pool()).count().await.unwrap()
    }
}

/// The `Location` header of a redirect.
pub fn location(response: &TestResponse) -> String {
    response
        .header(LOCATION)
        .to_str()
        .expect("Location should be ASCII")
        .to_string()
}

/// The `name=value` pair of a cookie set by the response, if any.
pub fn set_cookie(response: &TestResponse, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_string)
}
