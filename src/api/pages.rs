//! Page endpoints
//!
//! GET handlers that render the server-side views. Public pages take no
//! identity; the rest receive `CurrentUser` from the session middleware.

use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::api::middleware::{AppState, CurrentUser, PageError};
use crate::views::ViewContext;

fn render(state: &AppState, name: &str, context: &ViewContext) -> Result<Html<String>, PageError> {
    Ok(Html(state.views.render(name, context)?))
}

/// GET / — registration page
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    render(&state, "index.html", &ViewContext::new())
}

/// GET /login — login page
pub async fn login_page(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    render(&state, "login.html", &ViewContext::new())
}

/// GET /createPost — new post form
pub async fn create_page(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    render(&state, "create.html", &ViewContext::new())
}

/// GET /profile — the user's profile with their posts resolved
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Html<String>, PageError> {
    let user = state.auth_service.current_user(&claims).await?;
    let posts = state.post_service.posts_for_user(user.id).await?;

    let mut context = ViewContext::new();
    context.insert("user", &user);
    context.insert("posts", &posts);
    render(&state, "profile.html", &context)
}

/// GET /profile/upload — profile picture upload form
pub async fn profile_upload_page(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Html<String>, PageError> {
    render(&state, "profile_upload.html", &ViewContext::new())
}

/// GET /profile/image/{user_image} — profile picture page
pub async fn profile_image_page(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(user_image): Path<String>,
) -> Result<Html<String>, PageError> {
    let user = state.auth_service.current_user(&claims).await?;

    let mut context = ViewContext::new();
    context.insert("user", &user);
    context.insert("image", &user_image);
    render(&state, "profile_image.html", &context)
}

/// GET /edit/{post_id} — edit form for a post, with its owner resolved
pub async fn edit_page(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(post_id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let (post, author) = state.post_service.get_with_author(post_id).await?;

    let mut context = ViewContext::new();
    context.insert("post", &post);
    context.insert("author", &author);
    render(&state, "edit.html", &context)
}
