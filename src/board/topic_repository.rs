//! Topic repository.
//!
//! This module provides CRUD operations for topics in the database.

use sqlx::SqliteConnection;

use super::topic::{NewTopic, Topic, TopicSummary};
use crate::db::{DbPool, SQL_NOW};
use crate::{BoardsError, Result};

const TOPIC_COLUMNS: &str = "id, subject, board_id, starter_id, views, last_updated";

/// Repository for topic CRUD operations.
pub struct TopicRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> TopicRepository<'a> {
    /// Create a new TopicRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a topic on an existing connection (e.g. inside a transaction).
    ///
    /// Returns the new topic ID.
    pub async fn insert(conn: &mut SqliteConnection, new_topic: &NewTopic) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO topics (subject, board_id, starter_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_topic.subject)
        .bind(new_topic.board_id)
        .bind(new_topic.starter_id)
        .fetch_one(conn)
        .await
        .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(id)
    }

    /// Bump a topic's last_updated to now on an existing connection.
    pub async fn touch_on(conn: &mut SqliteConnection, id: i64) -> Result<()> {
        let sql = format!("UPDATE topics SET last_updated = {SQL_NOW} WHERE id = ?");
        sqlx::query(&sql)
            .bind(id)
            .execute(conn)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(())
    }

    /// Create a new topic in the database.
    ///
    /// Returns the created topic with the assigned ID.
    pub async fn create(&self, new_topic: &NewTopic) -> Result<Topic> {
        let id = {
            let mut conn = self.pool.acquire().await?;
            Self::insert(&mut *conn, new_topic).await?
        };

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BoardsError::NotFound("topic".to_string()))
    }

    /// Get a topic by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Topic>> {
        let sql = format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = ?");
        let topic = sqlx::query_as::<_, Topic>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(topic)
    }

    /// Get a topic by ID, only if it belongs to the given board.
    pub async fn get_in_board(&self, board_id: i64, id: i64) -> Result<Option<Topic>> {
        let sql = format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE id = ? AND board_id = ?");
        let topic = sqlx::query_as::<_, Topic>(&sql)
            .bind(id)
            .bind(board_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(topic)
    }

    /// List topics in a board with pagination, most recently active first.
    pub async fn list_by_board_paginated(
        &self,
        board_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<TopicSummary>> {
        let topics = sqlx::query_as::<_, TopicSummary>(
            "SELECT t.id, t.subject, t.board_id, u.username AS starter_username, t.views,
                    t.last_updated,
                    MAX((SELECT COUNT(*) FROM posts p WHERE p.topic_id = t.id) - 1, 0) AS replies
             FROM topics t
             JOIN users u ON u.id = t.starter_id
             WHERE t.board_id = ?
             ORDER BY t.last_updated DESC, t.id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(board_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await
        .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(topics)
    }

    /// Count topics in a board.
    pub async fn count_by_board(&self, board_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics WHERE board_id = ?")
            .bind(board_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(count)
    }

    /// Count all topics.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics")
            .fetch_one(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(count)
    }

    /// Add one to a topic's view counter.
    pub async fn increment_views(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE topics SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(())
    }
}
