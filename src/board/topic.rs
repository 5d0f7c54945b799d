//! Topic model.

/// Maximum length of a topic subject (in characters).
pub const MAX_SUBJECT_LENGTH: usize = 255;

/// Topic entity representing a discussion inside a board.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Topic {
    /// Unique topic ID.
    pub id: i64,
    /// Topic subject.
    pub subject: String,
    /// ID of the board this topic belongs to.
    pub board_id: i64,
    /// ID of the user who started the topic.
    pub starter_id: i64,
    /// Number of times the topic was viewed.
    pub views: i64,
    /// Last activity timestamp (bumped by replies).
    pub last_updated: String,
}

/// A topic row in a board listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TopicSummary {
    /// Topic ID.
    pub id: i64,
    /// Topic subject.
    pub subject: String,
    /// Board ID.
    pub board_id: i64,
    /// Username of the starter.
    pub starter_username: String,
    /// View counter.
    pub views: i64,
    /// Last activity timestamp.
    pub last_updated: String,
    /// Number of posts after the opening one.
    pub replies: i64,
}

/// Data for creating a new topic.
#[derive(Debug, Clone)]
pub struct NewTopic {
    /// ID of the board to create the topic in.
    pub board_id: i64,
    /// Topic subject.
    pub subject: String,
    /// ID of the user starting the topic.
    pub starter_id: i64,
}

impl NewTopic {
    /// Create a new topic with required fields.
    pub fn new(board_id: i64, subject: impl Into<String>, starter_id: i64) -> Self {
        Self {
            board_id,
            subject: subject.into(),
            starter_id,
        }
    }
}
