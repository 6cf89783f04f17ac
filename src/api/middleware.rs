//! API middleware
//!
//! Session-cookie authentication for the server-rendered routes:
//! - `require_session` guards every route that needs identity. A missing
//!   cookie redirects to the login page; an invalid one clears the cookie
//!   and redirects. It never surfaces an error outward.
//! - `CurrentUser` is the extractor handlers use for the validated
//!   identity; it only exists for requests that passed the middleware.
//! - `PageError` maps service failures onto the app's plain HTTP responses.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::config::UploadConfig;
use crate::db::repositories::UserRepository;
use crate::services::{AuthError, AuthService, PostError, PostService, TokenClaims};
use crate::views::ViewEngine;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub post_service: Arc<PostService>,
    pub user_repo: Arc<dyn UserRepository>,
    pub views: Arc<ViewEngine>,
    pub upload_config: Arc<UploadConfig>,
}

/// Validated session identity attached to the request.
///
/// Produced only by `require_session`; a handler taking this extractor
/// cannot run on an unauthenticated request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub TokenClaims);

impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(PageError::Unauthenticated)
    }
}

/// Handler-level error, rendered as a plain HTTP response.
#[derive(Debug)]
pub enum PageError {
    /// Registration with an already-registered email
    DuplicateUser,
    /// Login with an unknown email
    UserNotFound,
    /// Login with a wrong password
    InvalidCredentials,
    /// Missing or invalid session; clears the cookie and redirects to login
    Unauthenticated,
    /// Resource does not exist
    NotFound,
    /// Unusable request input
    BadRequest(String),
    /// Store, hashing, or rendering failure
    Internal(anyhow::Error),
}

impl From<AuthError> for PageError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::DuplicateUser => PageError::DuplicateUser,
            AuthError::UserNotFound => PageError::UserNotFound,
            AuthError::InvalidCredentials => PageError::InvalidCredentials,
            AuthError::InvalidToken => PageError::Unauthenticated,
            AuthError::Validation(msg) => PageError::BadRequest(msg),
            AuthError::Internal(e) => PageError::Internal(e),
        }
    }
}

impl From<PostError> for PageError {
    fn from(e: PostError) -> Self {
        match e {
            PostError::NotFound => PageError::NotFound,
            PostError::Internal(e) => PageError::Internal(e),
        }
    }
}

impl From<anyhow::Error> for PageError {
    fn from(e: anyhow::Error) -> Self {
        PageError::Internal(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::DuplicateUser => {
                (StatusCode::BAD_REQUEST, "User already exists").into_response()
            }
            PageError::UserNotFound => {
                (StatusCode::NOT_FOUND, "User does not exist").into_response()
            }
            PageError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response()
            }
            PageError::Unauthenticated => clear_session_and_redirect(),
            PageError::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            PageError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            PageError::Internal(e) => {
                // Log the real cause; the client gets a generic message
                tracing::error!("Request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Build a Set-Cookie header carrying the session token
pub fn session_cookie_headers(token: &str) -> HeaderMap {
    let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token);
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    headers
}

/// Build a Set-Cookie header that clears the session cookie
pub fn clear_session_headers() -> HeaderMap {
    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    headers
}

/// Clear the session cookie and send the client to the login page
pub fn clear_session_and_redirect() -> Response {
    (clear_session_headers(), Redirect::to("/login")).into_response()
}

/// Extract the session token from the request's cookies
fn extract_session_token(request: &Request) -> Option<String> {
    let cookie_header = request.headers().get(header::COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some(token) = cookie.strip_prefix("token=") {
            return Some(token.to_string());
        }
    }

    None
}

/// Session middleware for routes that require identity.
///
/// No cookie: redirect to login, store logic never runs. Invalid cookie
/// (malformed, forged, or expired — all one kind): clear it and redirect.
/// Valid cookie: attach `CurrentUser` and continue.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_session_token(&request) else {
        return Redirect::to("/login").into_response();
    };

    match state.auth_service.validate_token(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(CurrentUser(claims));
            next.run(request).await
        }
        Err(_) => clear_session_and_redirect(),
    }
}
