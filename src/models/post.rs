//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity: a text post owned by a user.
///
/// `likes` is a membership set of user ids, loaded alongside the post.
/// The store enforces that it contains no duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Owning user id
    pub user_id: i64,
    /// Text content
    pub content: String,
    /// Ids of users who liked this post
    pub likes: Vec<i64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Check whether the given user has liked this post
    pub fn liked_by(&self, user_id: i64) -> bool {
        self.likes.contains(&user_id)
    }

    /// Number of likes
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }
}
