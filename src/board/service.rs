//! Board service.
//!
//! This module provides high-level operations for boards, topics, and
//! posts: input checks, ownership rules and pagination on top of the
//! repositories.

use tracing::info;

use crate::db::Database;
use crate::{BoardsError, Result};

use super::pagination::{Page, Pagination};
use super::post::{NewPost, Post, PostWithAuthor, MAX_MESSAGE_LENGTH};
use super::post_repository::PostRepository;
use super::repository::BoardRepository;
use super::topic::{NewTopic, Topic, TopicSummary, MAX_SUBJECT_LENGTH};
use super::topic_repository::TopicRepository;
use super::types::{Board, BoardSummary, NewBoard, MAX_BOARD_DESCRIPTION_LENGTH, MAX_BOARD_NAME_LENGTH};

/// Validate a topic subject.
fn validate_subject(subject: &str) -> Result<()> {
    if subject.trim().is_empty() {
        return Err(BoardsError::Validation("subject is required".to_string()));
    }
    if subject.chars().count() > MAX_SUBJECT_LENGTH {
        return Err(BoardsError::Validation(format!(
            "subject must be at most {MAX_SUBJECT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a post message.
fn validate_message(message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(BoardsError::Validation("message is required".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(BoardsError::Validation(format!(
            "message must be at most {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Service for board operations.
pub struct BoardService<'a> {
    db: &'a Database,
}

impl<'a> BoardService<'a> {
    /// Create a new BoardService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a board.
    pub async fn create_board(&self, name: &str, description: &str) -> Result<Board> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_BOARD_NAME_LENGTH {
            return Err(BoardsError::Validation(format!(
                "board name must be 1-{MAX_BOARD_NAME_LENGTH} characters"
            )));
        }
        if description.chars().count() > MAX_BOARD_DESCRIPTION_LENGTH {
            return Err(BoardsError::Validation(format!(
                "board description must be at most {MAX_BOARD_DESCRIPTION_LENGTH} characters"
            )));
        }

        let repo = BoardRepository::new(self.db.pool());
        if repo.get_by_name(name).await?.is_some() {
            return Err(BoardsError::Validation(format!(
                "board '{name}' already exists"
            )));
        }

        let board = repo
            .create(&NewBoard::new(name).with_description(description.trim()))
            .await?;
        info!(board_id = board.id, name = %board.name, "Board created");
        Ok(board)
    }

    /// List all boards with their activity figures.
    pub async fn list_boards(&self) -> Result<Vec<BoardSummary>> {
        BoardRepository::new(self.db.pool()).list_summaries().await
    }

    /// Get a board by ID.
    pub async fn get_board(&self, board_id: i64) -> Result<Board> {
        BoardRepository::new(self.db.pool())
            .get_by_id(board_id)
            .await?
            .ok_or_else(|| BoardsError::NotFound("board".to_string()))
    }

    /// Get a topic, which must belong to the given board.
    pub async fn get_topic(&self, board_id: i64, topic_id: i64) -> Result<Topic> {
        TopicRepository::new(self.db.pool())
            .get_in_board(board_id, topic_id)
            .await?
            .ok_or_else(|| BoardsError::NotFound("topic".to_string()))
    }

    /// List topics of a board, most recently active first.
    pub async fn list_topics(
        &self,
        board_id: i64,
        page: Option<&str>,
        per_page: i64,
    ) -> Result<Page<TopicSummary>> {
        let repo = TopicRepository::new(self.db.pool());
        let total = repo.count_by_board(board_id).await?;
        let pagination = Pagination::new(page, total, per_page);
        let items = repo
            .list_by_board_paginated(board_id, pagination.offset(), pagination.limit())
            .await?;
        Ok(pagination.into_page(items))
    }

    /// List posts of a topic in creation order.
    pub async fn list_posts(
        &self,
        topic_id: i64,
        page: Option<&str>,
        per_page: i64,
    ) -> Result<Page<PostWithAuthor>> {
        let repo = PostRepository::new(self.db.pool());
        let total = repo.count_by_topic(topic_id).await?;
        let pagination = Pagination::new(page, total, per_page);
        let items = repo
            .list_by_topic_paginated(topic_id, pagination.offset(), pagination.limit())
            .await?;
        Ok(pagination.into_page(items))
    }

    /// Most recent posts of a topic, newest first (shown under the reply form).
    pub async fn recent_posts(&self, topic_id: i64, limit: i64) -> Result<Vec<PostWithAuthor>> {
        PostRepository::new(self.db.pool())
            .list_recent_by_topic(topic_id, limit)
            .await
    }

    /// Count one view of a topic.
    pub async fn record_view(&self, topic_id: i64) -> Result<()> {
        TopicRepository::new(self.db.pool())
            .increment_views(topic_id)
            .await
    }

    /// Start a topic with its opening post.
    ///
    /// The topic and the post are written in one transaction; on any error
    /// neither exists.
    pub async fn start_topic(
        &self,
        board_id: i64,
        starter_id: i64,
        subject: &str,
        message: &str,
    ) -> Result<(Topic, Post)> {
        self.get_board(board_id).await?;
        validate_subject(subject)?;
        validate_message(message)?;

        let mut tx = self.db.pool().begin().await?;
        let topic_id =
            TopicRepository::insert(&mut *tx, &NewTopic::new(board_id, subject.trim(), starter_id))
                .await?;
        let post_id =
            PostRepository::insert(&mut *tx, &NewPost::new(topic_id, message, starter_id)).await?;
        tx.commit().await?;

        let topic = TopicRepository::new(self.db.pool())
            .get_by_id(topic_id)
            .await?
            .ok_or_else(|| BoardsError::NotFound("topic".to_string()))?;
        let post = PostRepository::new(self.db.pool())
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| BoardsError::NotFound("post".to_string()))?;

        info!(
            topic_id = topic.id,
            board_id,
            starter_id,
            "Topic started"
        );
        Ok((topic, post))
    }

    /// Reply to a topic and bump its last activity time.
    pub async fn reply(
        &self,
        board_id: i64,
        topic_id: i64,
        author_id: i64,
        message: &str,
    ) -> Result<Post> {
        self.get_topic(board_id, topic_id).await?;
        validate_message(message)?;

        let mut tx = self.db.pool().begin().await?;
        let post_id =
            PostRepository::insert(&mut *tx, &NewPost::new(topic_id, message, author_id)).await?;
        TopicRepository::touch_on(&mut *tx, topic_id).await?;
        tx.commit().await?;

        info!(post_id, topic_id, author_id, "Reply posted");
        PostRepository::new(self.db.pool())
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| BoardsError::NotFound("post".to_string()))
    }

    /// Get a post for editing.
    ///
    /// The post must sit in the given topic of the given board and be
    /// written by `user_id`; otherwise it is reported as not found.
    pub async fn get_post_for_edit(
        &self,
        board_id: i64,
        topic_id: i64,
        post_id: i64,
        user_id: i64,
    ) -> Result<Post> {
        self.get_topic(board_id, topic_id).await?;
        PostRepository::new(self.db.pool())
            .get_in_topic(topic_id, post_id)
            .await?
            .filter(|post| post.is_owned_by(user_id))
            .ok_or_else(|| BoardsError::NotFound("post".to_string()))
    }

    /// Edit the message of a post owned by `editor_id`.
    pub async fn edit_post(
        &self,
        board_id: i64,
        topic_id: i64,
        post_id: i64,
        editor_id: i64,
        message: &str,
    ) -> Result<Post> {
        let post = self
            .get_post_for_edit(board_id, topic_id, post_id, editor_id)
            .await?;
        validate_message(message)?;

        let post = PostRepository::new(self.db.pool())
            .update_message(post.id, message, editor_id)
            .await?
            .ok_or_else(|| BoardsError::NotFound("post".to_string()))?;

        info!(post_id = post.id, editor_id, "Post edited");
        Ok(post)
    }
}
