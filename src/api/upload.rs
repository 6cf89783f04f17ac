//! Profile picture upload
//!
//! POST /upload — session-guarded multipart upload with a single file
//! field named `dp`. The file is stored under the upload directory with a
//! generated name and the filename is recorded on the user.

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect},
};
use tokio::fs;
use uuid::Uuid;

use crate::api::middleware::{AppState, CurrentUser, PageError};

/// POST /upload — store a profile picture for the current user
pub async fn upload_picture(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, PageError> {
    let config = &state.upload_config;

    fs::create_dir_all(&config.path)
        .await
        .map_err(|e| PageError::Internal(anyhow::anyhow!("Failed to create upload dir: {}", e)))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PageError::BadRequest(format!("Failed to read multipart body: {}", e)))?
    {
        if field.name() != Some("dp") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !config.is_type_allowed(&content_type) {
            return Err(PageError::BadRequest(format!(
                "Invalid file type: {}",
                content_type
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| PageError::BadRequest(format!("Failed to read file: {}", e)))?;

        if data.len() as u64 > config.max_file_size {
            return Err(PageError::BadRequest(format!(
                "File too large (max {} bytes)",
                config.max_file_size
            )));
        }

        let filename = format!("{}.{}", Uuid::new_v4(), config.get_extension(&content_type));
        let file_path = config.path.join(&filename);

        fs::write(&file_path, &data)
            .await
            .map_err(|e| PageError::Internal(anyhow::anyhow!("Failed to save file: {}", e)))?;

        state
            .user_repo
            .set_profile_image(claims.user_id, &filename)
            .await?;

        tracing::debug!(user_id = claims.user_id, %filename, "Profile picture stored");
        return Ok(Redirect::to("/profile"));
    }

    Err(PageError::BadRequest("No file provided".to_string()))
}
