//! Post endpoints
//!
//! Session-guarded handlers for creating posts, editing content, and the
//! like toggle. Every successful mutation redirects back to the profile.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;

use crate::api::middleware::{AppState, CurrentUser, PageError};

/// Form body for post creation and edits
#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub content: String,
}

/// POST /post — create a post owned by the current user
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Form(form): Form<PostForm>,
) -> Result<impl IntoResponse, PageError> {
    state.post_service.create(claims.user_id, &form.content).await?;
    Ok(Redirect::to("/profile"))
}

/// POST /update/{post_id} — replace a post's content
pub async fn update_post(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(post_id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<impl IntoResponse, PageError> {
    state.post_service.update_content(post_id, &form.content).await?;
    Ok(Redirect::to("/profile"))
}

/// GET /like/{post_id} — toggle the current user's like on a post
///
/// Absent → added, present → removed; a pure membership flip, not a
/// counter.
pub async fn like(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, PageError> {
    state.post_service.toggle_like(post_id, claims.user_id).await?;
    Ok(Redirect::to("/profile"))
}
