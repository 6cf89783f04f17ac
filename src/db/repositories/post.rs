//! Post repository
//!
//! Database operations for posts and their like memberships. Likes live in
//! the `post_likes` table keyed by `(post_id, user_id)`, so the set can
//! never hold duplicates; posts are loaded with their likes attached.

use crate::db::DbPool;
use crate::models::Post;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post owned by `user_id`
    async fn create(&self, user_id: i64, content: &str) -> Result<Post>;

    /// Get post by ID, with likes loaded
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// List a user's posts, newest first, with likes loaded
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Post>>;

    /// Replace a post's content. Returns false if the post does not exist.
    async fn update_content(&self, id: i64, content: &str) -> Result<bool>;

    /// Check whether `user_id` has liked the post
    async fn has_like(&self, post_id: i64, user_id: i64) -> Result<bool>;

    /// Add `user_id` to the post's likes set
    async fn add_like(&self, post_id: i64, user_id: i64) -> Result<()>;

    /// Remove `user_id` from the post's likes set
    async fn remove_like(&self, post_id: i64, user_id: i64) -> Result<()>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: DbPool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }

    async fn likes_for_post(&self, post_id: i64) -> Result<Vec<i64>> {
        let rows = sqlx::query(
            "SELECT user_id FROM post_likes WHERE post_id = ? ORDER BY created_at",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load post likes")?;

        Ok(rows.iter().map(|row| row.get::<i64, _>("user_id")).collect())
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, user_id: i64, content: &str) -> Result<Post> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO posts (user_id, content, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create post")?;

        Ok(Post {
            id: result.last_insert_rowid(),
            user_id,
            content: content.to_string(),
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query(
            "SELECT id, user_id, content, created_at, updated_at FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post by ID")?;

        match row {
            Some(row) => {
                let mut post = row_to_post(&row)?;
                post.likes = self.likes_for_post(post.id).await?;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, content, created_at, updated_at
            FROM posts
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts")?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            let mut post = row_to_post(&row)?;
            post.likes = self.likes_for_post(post.id).await?;
            posts.push(post);
        }

        Ok(posts)
    }

    async fn update_content(&self, id: i64, content: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE posts SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update post content")?;

        Ok(result.rows_affected() > 0)
    }

    async fn has_like(&self, post_id: i64, user_id: i64) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM post_likes WHERE post_id = ? AND user_id = ?",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check like")?;

        Ok(row.get::<i64, _>("count") > 0)
    }

    async fn add_like(&self, post_id: i64, user_id: i64) -> Result<()> {
        // OR IGNORE keeps a racing double-insert from failing the request
        sqlx::query(
            "INSERT OR IGNORE INTO post_likes (post_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to add like")?;

        Ok(())
    }

    async fn remove_like(&self, post_id: i64, user_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to remove like")?;

        Ok(())
    }
}

fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> Result<Post> {
    Ok(Post {
        id: row.get("id"),
        user_id: row.get("user_id"),
        content: row.get("content"),
        likes: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::user::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::User;

    async fn setup() -> (SqlxUserRepository, SqlxPostRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        (
            SqlxUserRepository::new(pool.clone()),
            SqlxPostRepository::new(pool),
        )
    }

    async fn create_user(repo: &SqlxUserRepository, email: &str) -> User {
        repo.create(&User::new(
            "author".to_string(),
            "Author".to_string(),
            email.to_string(),
            None,
            "$argon2id$fake".to_string(),
        ))
        .await
        .expect("Failed to create user")
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let (users, posts) = setup().await;
        let user = create_user(&users, "a@example.com").await;

        let post = posts
            .create(user.id, "first post")
            .await
            .expect("Failed to create post");
        assert!(post.id > 0);
        assert!(post.likes.is_empty());

        let found = posts
            .get_by_id(post.id)
            .await
            .expect("Failed to get post")
            .expect("Post not found");
        assert_eq!(found.content, "first post");
        assert_eq!(found.user_id, user.id);
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let (_, posts) = setup().await;
        let found = posts.get_by_id(42).await.expect("Failed to get post");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_by_user_newest_first() {
        let (users, posts) = setup().await;
        let user = create_user(&users, "list@example.com").await;
        let other = create_user(&users, "other@example.com").await;

        posts.create(user.id, "one").await.expect("create failed");
        posts.create(user.id, "two").await.expect("create failed");
        posts.create(other.id, "not mine").await.expect("create failed");

        let listed = posts
            .list_by_user(user.id)
            .await
            .expect("Failed to list posts");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].content, "two");
        assert_eq!(listed[1].content, "one");
    }

    #[tokio::test]
    async fn test_update_content_only_touches_content() {
        let (users, posts) = setup().await;
        let user = create_user(&users, "edit@example.com").await;
        let post = posts.create(user.id, "draft").await.expect("create failed");
        posts.add_like(post.id, user.id).await.expect("like failed");

        let updated = posts
            .update_content(post.id, "final")
            .await
            .expect("Failed to update post");
        assert!(updated);

        let found = posts
            .get_by_id(post.id)
            .await
            .expect("Failed to get post")
            .expect("Post not found");
        assert_eq!(found.content, "final");
        assert_eq!(found.user_id, user.id);
        assert_eq!(found.likes, vec![user.id]);
    }

    #[tokio::test]
    async fn test_update_content_missing_post() {
        let (_, posts) = setup().await;
        let updated = posts
            .update_content(999, "nope")
            .await
            .expect("Update should not error");
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_like_membership() {
        let (users, posts) = setup().await;
        let author = create_user(&users, "author@example.com").await;
        let fan = create_user(&users, "fan@example.com").await;
        let post = posts.create(author.id, "likeable").await.expect("create failed");

        assert!(!posts.has_like(post.id, fan.id).await.expect("check failed"));

        posts.add_like(post.id, fan.id).await.expect("like failed");
        assert!(posts.has_like(post.id, fan.id).await.expect("check failed"));

        // A second add is a no-op, not a duplicate
        posts.add_like(post.id, fan.id).await.expect("re-like failed");
        let found = posts
            .get_by_id(post.id)
            .await
            .expect("Failed to get post")
            .expect("Post not found");
        assert_eq!(found.likes, vec![fan.id]);

        posts.remove_like(post.id, fan.id).await.expect("unlike failed");
        assert!(!posts.has_like(post.id, fan.id).await.expect("check failed"));
    }
}
