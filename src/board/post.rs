//! Post model.

/// Maximum length of a post message (in characters).
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Post entity representing a message in a topic.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Post message (Markdown).
    pub message: String,
    /// ID of the topic this post belongs to.
    pub topic_id: i64,
    /// ID of the user who wrote the post.
    pub created_by: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// ID of the user who last edited the post.
    pub updated_by: Option<i64>,
    /// Last edit timestamp.
    pub updated_at: Option<String>,
}

impl Post {
    /// Check if the given user wrote this post.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.created_by == user_id
    }
}

/// A post joined with its author, for display.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthor {
    /// Post ID.
    pub id: i64,
    /// Post message (Markdown).
    pub message: String,
    /// Topic ID.
    pub topic_id: i64,
    /// Author ID.
    pub created_by: i64,
    /// Author username.
    pub author_username: String,
    /// Total number of posts written by the author.
    pub author_post_count: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Last edit timestamp.
    pub updated_at: Option<String>,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// ID of the topic to post in.
    pub topic_id: i64,
    /// Post message.
    pub message: String,
    /// ID of the user writing the post.
    pub created_by: i64,
}

impl NewPost {
    /// Create a new post with required fields.
    pub fn new(topic_id: i64, message: impl Into<String>, created_by: i64) -> Self {
        Self {
            topic_id,
            message: message.into(),
            created_by,
        }
    }
}
