//! Authentication endpoints
//!
//! Handles the form posts for account creation and login, and logout:
//! - POST /register — create an account, set the session cookie
//! - POST /login — verify credentials, set the session cookie
//! - GET /logout — clear the session cookie
//!
//! On success every endpoint redirects; failures use the app's plain
//! status responses (400 duplicate email, 404 unknown email, 401 wrong
//! password).

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::api::middleware::{
    clear_session_headers, session_cookie_headers, AppState, PageError,
};
use crate::services::{LoginInput, RegisterInput};

/// Form body for account registration
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub name: String,
    pub email: String,
    /// Arrives as text from the form; empty means not provided
    #[serde(default)]
    pub age: Option<String>,
    pub password: String,
}

/// Form body for login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Build the auth router (all public)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

/// POST /register — create an account and start a session
async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<impl IntoResponse, PageError> {
    let age = form.age.as_deref().and_then(|s| s.trim().parse::<i64>().ok());

    let (_user, token) = state
        .auth_service
        .register(RegisterInput {
            username: form.username,
            name: form.name,
            email: form.email,
            age,
            password: form.password,
        })
        .await?;

    Ok((session_cookie_headers(&token), Redirect::to("/profile")))
}

/// POST /login — verify credentials and start a session
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, PageError> {
    let (_user, token) = state
        .auth_service
        .login(LoginInput {
            email: form.email,
            password: form.password,
        })
        .await?;

    Ok((session_cookie_headers(&token), Redirect::to("/profile")))
}

/// GET /logout — clear the session cookie
///
/// Tokens are stateless, so logout is purely client-side deletion.
async fn logout() -> impl IntoResponse {
    (clear_session_headers(), Redirect::to("/login"))
}
