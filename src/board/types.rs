//! Board model.
//!
//! This module defines the Board struct and the per-board summary shown
//! on the home page.

/// Maximum length of a board name (in characters).
pub const MAX_BOARD_NAME_LENGTH: usize = 30;

/// Maximum length of a board description (in characters).
pub const MAX_BOARD_DESCRIPTION_LENGTH: usize = 100;

/// Board entity grouping related topics.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID.
    pub id: i64,
    /// Board name (unique).
    pub name: String,
    /// Board description.
    pub description: String,
}

/// Data for creating a new board.
#[derive(Debug, Clone)]
pub struct NewBoard {
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
}

impl NewBoard {
    /// Create a new board with minimal required fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A board together with its activity figures.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BoardSummary {
    /// Board ID.
    pub id: i64,
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
    /// Number of topics in the board.
    pub topic_count: i64,
    /// Number of posts across all topics.
    pub post_count: i64,
    /// Topic holding the most recent post.
    pub last_post_topic_id: Option<i64>,
    /// Creation time of the most recent post.
    pub last_post_at: Option<String>,
    /// Author of the most recent post.
    pub last_post_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = NewBoard::new("Django").with_description("Django board.");
        assert_eq!(board.name, "Django");
        assert_eq!(board.description, "Django board.");
    }

    #[test]
    fn test_new_board_default_description() {
        assert!(NewBoard::new("Rust").description.is_empty());
    }
}
