//! Board repository.
//!
//! This module provides CRUD operations for boards in the database.

use super::types::{Board, BoardSummary, NewBoard};
use crate::db::DbPool;
use crate::{BoardsError, Result};

/// Repository for board CRUD operations.
pub struct BoardRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> BoardRepository<'a> {
    /// Create a new BoardRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new board in the database.
    ///
    /// Returns the created board with the assigned ID.
    pub async fn create(&self, new_board: &NewBoard) -> Result<Board> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO boards (name, description) VALUES (?, ?) RETURNING id")
                .bind(&new_board.name)
                .bind(&new_board.description)
                .fetch_one(self.pool)
                .await
                .map_err(|e| BoardsError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BoardsError::NotFound("board".to_string()))
    }

    /// Get a board by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(
            "SELECT id, name, description FROM boards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(board)
    }

    /// Get a board by name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(
            "SELECT id, name, description FROM boards WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(board)
    }

    /// List all boards with their topic/post counts and latest post.
    pub async fn list_summaries(&self) -> Result<Vec<BoardSummary>> {
        let summaries = sqlx::query_as::<_, BoardSummary>(
            "SELECT b.id, b.name, b.description,
                    (SELECT COUNT(*) FROM topics t WHERE t.board_id = b.id) AS topic_count,
                    (SELECT COUNT(*) FROM posts p JOIN topics t ON p.topic_id = t.id
                      WHERE t.board_id = b.id) AS post_count,
                    lp.topic_id AS last_post_topic_id,
                    lp.created_at AS last_post_at,
                    u.username AS last_post_by
             FROM boards b
             LEFT JOIN posts lp ON lp.id = (
                 SELECT p.id FROM posts p JOIN topics t ON p.topic_id = t.id
                 WHERE t.board_id = b.id
                 ORDER BY p.created_at DESC, p.id DESC LIMIT 1)
             LEFT JOIN users u ON u.id = lp.created_by
             ORDER BY b.id",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| BoardsError::Database(e.to_string()))?;

        Ok(summaries)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_board() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());

        let board = repo
            .create(&NewBoard::new("Django").with_description("Django board."))
            .await
            .unwrap();

        assert!(board.id > 0);
        assert_eq!(board.name, "Django");
        assert_eq!(board.description, "Django board.");
    }

    #[tokio::test]
    async fn test_board_name_unique() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());

        repo.create(&NewBoard::new("Django")).await.unwrap();
        assert!(repo.create(&NewBoard::new("Django")).await.is_err());
    }

    #[tokio::test]
    async fn test_get_by_id_and_name() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());

        let django = repo.create(&NewBoard::new("Django")).await.unwrap();
        let rust = repo.create(&NewBoard::new("Rust")).await.unwrap();

        assert_eq!(repo.get_by_id(django.id).await.unwrap().unwrap().name, "Django");
        assert_eq!(repo.get_by_name("Rust").await.unwrap().unwrap().id, rust.id);
        assert!(repo.get_by_id(999).await.unwrap().is_none());

    }

    #[tokio::test]
    async fn test_list_summaries() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());

        let board = repo.create(&NewBoard::new("Django")).await.unwrap();
        repo.create(&NewBoard::new("Empty")).await.unwrap();

        sqlx::query("INSERT INTO users (username, password) VALUES ('john', 'x')")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("INSERT INTO topics (subject, board_id, starter_id) VALUES ('Hi', ?, 1)")
            .bind(board.id)
            .execute(db.pool())
            .await
            .unwrap();
        for message in ["first", "second"] {
            sqlx::query("INSERT INTO posts (message, topic_id, created_by) VALUES (?, 1, 1)")
                .bind(message)
                .execute(db.pool())
                .await
                .unwrap();
        }

        let summaries = repo.list_summaries().await.unwrap();
        assert_eq!(summaries.len(), 2);

        let django = &summaries[0];
        assert_eq!(django.topic_count, 1);
        assert_eq!(django.post_count, 2);
        assert_eq!(django.last_post_topic_id, Some(1));
        assert_eq!(django.last_post_by.as_deref(), Some("john"));

        let empty = &summaries[1];
        assert_eq!(empty.post_count, 0);
        assert!(empty.last_post_at.is_none());
        assert!(empty.last_post_by.is_none());
    }
}
