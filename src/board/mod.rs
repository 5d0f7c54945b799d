//! Board module.
//!
//! This module provides the forum content:
//! - Boards, created administratively
//! - Topics inside a board, each opened with a first post
//! - Posts inside a topic, editable by their author
//! - Page-number pagination for topic and post listings

mod pagination;
mod post;
mod post_repository;
mod repository;
mod service;
mod topic;
mod topic_repository;
mod types;

pub use pagination::{Page, Pagination};
pub use post::{NewPost, Post, PostWithAuthor, MAX_MESSAGE_LENGTH};
pub use post_repository::PostRepository;
pub use repository::BoardRepository;
pub use service::BoardService;
pub use topic::{NewTopic, Topic, TopicSummary, MAX_SUBJECT_LENGTH};
pub use topic_repository::TopicRepository;
pub use types::{
    Board, BoardSummary, NewBoard, MAX_BOARD_DESCRIPTION_LENGTH, MAX_BOARD_NAME_LENGTH,
};
