//! Post repository.
//!
//! This module provides CRUD operations for posts in the database.

use sqlx::SqliteConnection;

use super::post::{NewPost, Post, PostWithAuthor};
use crate::db::{DbPool, SQL_NOW};
use crate::{BoardsError, Result};

const POST_COLUMNS: &str = "id, message, topic_id, created_by, created_at, updated_by, updated_at";

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a post on an existing connection (e.g. inside a transaction).
    ///
    /// Returns the new post ID.
    pub async fn insert(conn: &mut SqliteConnection, new_post: &NewPost) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (message, topic_id, created_by) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_post.message)
        .bind(new_post.topic_id)
        .bind(new_post.created_by)
        .fetch_one(conn)
        .await
        .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(id)
    }

    /// Create a new post in the database.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id = {
            let mut conn = self.pool.acquire().await?;
            Self::insert(&mut *conn, new_post).await?
        };

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BoardsError::NotFound("post".to_string()))
    }

    /// Get a post by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?");
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(post)
    }

    /// Get a post by ID, only if it belongs to the given topic.
    pub async fn get_in_topic(&self, topic_id: i64, id: i64) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ? AND topic_id = ?");
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(topic_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(post)
    }

    /// List posts of a topic in creation order, with pagination.
    pub async fn list_by_topic_paginated(
        &self,
        topic_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(
            "SELECT p.id, p.message, p.topic_id, p.created_by,
                    u.username AS author_username,
                    (SELECT COUNT(*) FROM posts a WHERE a.created_by = p.created_by) AS author_post_count,
                    p.created_at, p.updated_at
             FROM posts p
             JOIN users u ON u.id = p.created_by
             WHERE p.topic_id = ?
             ORDER BY p.created_at, p.id
             LIMIT ? OFFSET ?",
        )
        .bind(topic_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await
        .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(posts)
    }

    /// List the most recent posts of a topic, newest first.
    pub async fn list_recent_by_topic(&self, topic_id: i64, limit: i64) -> Result<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(
            "SELECT p.id, p.message, p.topic_id, p.created_by,
                    u.username AS author_username,
                    (SELECT COUNT(*) FROM posts a WHERE a.created_by = p.created_by) AS author_post_count,
                    p.created_at, p.updated_at
             FROM posts p
             JOIN users u ON u.id = p.created_by
             WHERE p.topic_id = ?
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT ?",
        )
        .bind(topic_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await
        .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(posts)
    }

    /// Count posts in a topic.
    pub async fn count_by_topic(&self, topic_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE topic_id = ?")
            .bind(topic_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(count)
    }

    /// Count all posts.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(count)
    }

    /// Replace a post's message and record who edited it and when.
    ///
    /// Returns the updated post, or None if not found.
    pub async fn update_message(&self, id: i64, message: &str, editor_id: i64) -> Result<Option<Post>> {
        let sql = format!(
            "UPDATE posts SET message = ?, updated_by = ?, updated_at = {SQL_NOW} WHERE id = ?"
        );
        let result = sqlx::query(&sql)
            .bind(message)
            .bind(editor_id)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardRepository, NewBoard, NewTopic, TopicRepository};
    use crate::db::Database;

    async fn setup_db() -> (Database, i64) {
        let db = Database::open_in_memory().await.unwrap();
        for name in ["john", "jane"] {
            sqlx::query("INSERT INTO users (username, password) VALUES (?, 'x')")
                .bind(name)
                .execute(db.pool())
                .await
                .unwrap();
        }
        let board = BoardRepository::new(db.pool())
            .create(&NewBoard::new("Django"))
            .await
            .unwrap();
        let topic = TopicRepository::new(db.pool())
            .create(&NewTopic::new(board.id, "Hello, world", 1))
            .await
            .unwrap();
        (db, topic.id)
    }

    #[tokio::test]
    async fn test_create_post() {
        let (db, topic_id) = setup_db().await;
        let repo = PostRepository::new(db.pool());

        let post = repo
            .create(&NewPost::new(topic_id, "Lorem ipsum dolor sit amet", 1))
            .await
            .unwrap();
        assert_eq!(post.message, "Lorem ipsum dolor sit amet");
        assert_eq!(post.topic_id, topic_id);
        assert_eq!(post.created_by, 1);
        assert!(post.updated_by.is_none());
        assert!(post.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_get_in_topic() {
        let (db, topic_id) = setup_db().await;
        let repo = PostRepository::new(db.pool());
        let post = repo.create(&NewPost::new(topic_id, "Hi", 1)).await.unwrap();

        assert!(repo.get_in_topic(topic_id, post.id).await.unwrap().is_some());
        assert!(repo.get_in_topic(topic_id + 1, post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_topic_paginated() {
        let (db, topic_id) = setup_db().await;
        let repo = PostRepository::new(db.pool());

        for (i, author) in [1, 2, 1].iter().enumerate() {
            repo.create(&NewPost::new(topic_id, format!("post {i}"), *author))
                .await
                .unwrap();
        }

        let page = repo.list_by_topic_paginated(topic_id, 0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].message, "post 0");
        assert_eq!(page[0].author_username, "john");
        assert_eq!(page[0].author_post_count, 2);
        assert_eq!(page[1].author_username, "jane");

        let page = repo.list_by_topic_paginated(topic_id, 2, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].message, "post 2");

        let recent = repo.list_recent_by_topic(topic_id, 2).await.unwrap();
        assert_eq!(recent[0].message, "post 2");

        assert_eq!(repo.count_by_topic(topic_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_message() {
        let (db, topic_id) = setup_db().await;
        let repo = PostRepository::new(db.pool());
        let post = repo.create(&NewPost::new(topic_id, "Hi", 1)).await.unwrap();

        let updated = repo
            .update_message(post.id, "edited message", 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.message, "edited message");
        assert_eq!(updated.updated_by, Some(1));
        assert!(updated.updated_at.is_some());

        assert!(repo.update_message(999, "x", 1).await.unwrap().is_none());
    }
}
