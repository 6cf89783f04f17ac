//! Post service
//!
//! Business logic for posts: creation, content edits, the like toggle, and
//! a user's post feed.

use std::sync::Arc;

use anyhow::Context;

use crate::db::repositories::{PostRepository, UserRepository};
use crate::models::{Post, User};

/// Error types for post operations
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    /// Post does not exist
    #[error("Post not found")]
    NotFound,

    /// Store failure
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Post service
pub struct PostService {
    post_repo: Arc<dyn PostRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl PostService {
    /// Create a new post service with the given repositories
    pub fn new(post_repo: Arc<dyn PostRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            post_repo,
            user_repo,
        }
    }

    /// Create a post owned by `user_id`.
    pub async fn create(&self, user_id: i64, content: &str) -> Result<Post, PostError> {
        let post = self
            .post_repo
            .create(user_id, content)
            .await
            .context("Failed to create post")?;
        tracing::debug!(post_id = post.id, user_id, "Post created");
        Ok(post)
    }

    /// Fetch a post by id.
    pub async fn get(&self, post_id: i64) -> Result<Post, PostError> {
        self.post_repo
            .get_by_id(post_id)
            .await
            .context("Failed to load post")?
            .ok_or(PostError::NotFound)
    }

    /// Fetch a post with its owner resolved.
    pub async fn get_with_author(&self, post_id: i64) -> Result<(Post, Option<User>), PostError> {
        let post = self.get(post_id).await?;
        let author = self
            .user_repo
            .get_by_id(post.user_id)
            .await
            .context("Failed to load post author")?;
        Ok((post, author))
    }

    /// Replace a post's content. Author and likes are untouched.
    pub async fn update_content(&self, post_id: i64, content: &str) -> Result<(), PostError> {
        let updated = self
            .post_repo
            .update_content(post_id, content)
            .await
            .context("Failed to update post")?;
        if !updated {
            return Err(PostError::NotFound);
        }
        Ok(())
    }

    /// Toggle `user_id`'s membership in the post's likes set.
    ///
    /// Absent → added; present → removed. Returns whether the post is liked
    /// after the toggle.
    pub async fn toggle_like(&self, post_id: i64, user_id: i64) -> Result<bool, PostError> {
        // Confirm the post exists so a bad id is NotFound, not a silent no-op
        if self
            .post_repo
            .get_by_id(post_id)
            .await
            .context("Failed to load post")?
            .is_none()
        {
            return Err(PostError::NotFound);
        }

        let liked = self
            .post_repo
            .has_like(post_id, user_id)
            .await
            .context("Failed to check like")?;

        if liked {
            self.post_repo
                .remove_like(post_id, user_id)
                .await
                .context("Failed to remove like")?;
        } else {
            self.post_repo
                .add_like(post_id, user_id)
                .await
                .context("Failed to add like")?;
        }

        Ok(!liked)
    }

    /// A user's posts, newest first, with likes loaded.
    pub async fn posts_for_user(&self, user_id: i64) -> Result<Vec<Post>, PostError> {
        Ok(self
            .post_repo
            .list_by_user(user_id)
            .await
            .context("Failed to list posts")?)
    }
}
