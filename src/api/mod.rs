//! API layer — HTTP handlers and routing
//!
//! Server-rendered routes for the Ripple social app:
//! - Public: home/register, login, logout, the new-post form
//! - Session-guarded: profile, picture upload, like toggle, post edits
//! - `/uploads/*` serves stored profile pictures from disk

pub mod auth;
pub mod middleware;
pub mod pages;
pub mod posts;
pub mod upload;

#[cfg(test)]
mod tests;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use middleware::{AppState, CurrentUser, PageError};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Routes that require a valid session cookie
    let protected = Router::new()
        .route("/profile", get(pages::profile))
        .route("/profile/upload", get(pages::profile_upload_page))
        .route("/profile/image/{user_image}", get(pages::profile_image_page))
        .route("/like/{post_id}", get(posts::like))
        .route("/edit/{post_id}", get(pages::edit_page))
        .route("/upload", post(upload::upload_picture))
        .route("/post", post(posts::create_post))
        .route("/update/{post_id}", post(posts::update_post))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    let uploads_dir = state.upload_config.path.clone();

    Router::new()
        .route("/", get(pages::index))
        .route("/login", get(pages::login_page))
        .route("/createPost", get(pages::create_page))
        .merge(auth::router())
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
