//! End-to-end HTTP tests
//!
//! Drives the full router with axum-test: registration and login flows,
//! session-cookie handling, the like toggle, edits, and uploads.

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

use crate::api::{build_router, AppState};
use crate::config::{AuthConfig, HashCost, UploadConfig};
use crate::db::repositories::{SqlxPostRepository, SqlxUserRepository};
use crate::db::{create_test_pool, migrations};
use crate::services::{AuthService, PostService, TokenSigner};
use crate::views::ViewEngine;

const TEST_SECRET: &str = "http-test-secret";

async fn test_state(upload_dir: &TempDir) -> AppState {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let auth_config = AuthConfig {
        secret: TEST_SECRET.to_string(),
        token_ttl_hours: 24,
        hash: HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    };
    let upload_config = UploadConfig {
        path: upload_dir.path().to_path_buf(),
        ..UploadConfig::default()
    };

    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let post_repo = SqlxPostRepository::boxed(pool.clone());
    let auth_service =
        Arc::new(AuthService::new(user_repo.clone(), &auth_config).expect("Failed to create auth"));
    let post_service = Arc::new(PostService::new(post_repo, user_repo.clone()));

    AppState {
        auth_service,
        post_service,
        user_repo,
        views: Arc::new(ViewEngine::new().expect("Failed to load templates")),
        upload_config: Arc::new(upload_config),
    }
}

async fn test_server(upload_dir: &TempDir) -> TestServer {
    let state = test_state(upload_dir).await;
    let mut server = TestServer::new(build_router(state)).expect("Failed to start test server");
    server.save_cookies();
    server
}

fn register_form(email: &str) -> serde_json::Value {
    json!({
        "username": "alice",
        "name": "Alice",
        "email": email,
        "age": "30",
        "password": "hunter2",
    })
}

async fn register(server: &TestServer, email: &str) {
    let response = server.post("/register").form(&register_form(email)).await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/profile");
}

#[tokio::test]
async fn test_public_pages_render() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;

    for path in ["/", "/login", "/createPost"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK, "path: {path}");
        assert!(response.text().contains("<form"), "path: {path}");
    }
}

#[tokio::test]
async fn test_register_sets_cookie_and_profile_renders() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;

    register(&server, "alice@example.com").await;

    let response = server.get("/profile").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Alice"));
    assert!(body.contains("@alice"));
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;

    register(&server, "dup@example.com").await;

    let response = server.post("/register").form(&register_form("dup@example.com")).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "User already exists");
}

#[tokio::test]
async fn test_login_flows() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;
    register(&server, "bob@example.com").await;

    // Unknown email
    let response = server
        .post("/login")
        .form(&json!({"email": "ghost@example.com", "password": "hunter2"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "User does not exist");

    // Wrong password
    let response = server
        .post("/login")
        .form(&json!({"email": "bob@example.com", "password": "wrong"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.text(), "Invalid credentials");

    // Correct credentials
    let response = server
        .post("/login")
        .form(&json!({"email": "bob@example.com", "password": "hunter2"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/profile");
}

#[tokio::test]
async fn test_protected_routes_redirect_without_cookie() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;

    for path in ["/profile", "/profile/upload", "/like/1", "/edit/1"] {
        let response = server.get(path).await;
        assert_eq!(
            response.status_code(),
            StatusCode::SEE_OTHER,
            "path: {path}"
        );
        assert_eq!(response.header(header::LOCATION), "/login", "path: {path}");
    }
}

#[tokio::test]
async fn test_tampered_token_clears_cookie_and_redirects() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;

    let response = server
        .get("/profile")
        .add_header(header::COOKIE, HeaderValue::from_static("token=garbage"))
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/login");
    let set_cookie = response.header(header::SET_COOKIE);
    let set_cookie = set_cookie.to_str().expect("Set-Cookie is ASCII");
    assert!(set_cookie.contains("token="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_expired_token_treated_like_missing() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;

    // Signed with the server's secret but already past its expiry
    let expired = TokenSigner::new(TEST_SECRET, -1)
        .expect("Failed to create signer")
        .sign("alice@example.com", 1)
        .expect("Failed to sign");

    let cookie = format!("token={}", expired);
    let response = server
        .get("/profile")
        .add_header(
            header::COOKIE,
            HeaderValue::from_str(&cookie).expect("Cookie is ASCII"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/login");
    let set_cookie = response.header(header::SET_COOKIE);
    assert!(set_cookie.to_str().expect("ASCII").contains("Max-Age=0"));
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;
    register(&server, "out@example.com").await;

    let response = server.get("/logout").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/login");

    // Cookie jar picked up the cleared cookie; profile is unreachable now
    let response = server.get("/profile").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/login");
}

#[tokio::test]
async fn test_post_like_and_edit_flow() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;
    register(&server, "poster@example.com").await;

    // Create a post
    let response = server
        .post("/post")
        .form(&json!({"content": "my first ripple"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let body = server.get("/profile").await.text();
    assert!(body.contains("my first ripple"));
    assert!(body.contains("0 likes"));

    // Like it (fresh database, so the post id is 1)
    let response = server.get("/like/1").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let body = server.get("/profile").await.text();
    assert!(body.contains("1 like"));
    assert!(body.contains("Unlike"));

    // Like again: toggle back to the original state
    server.get("/like/1").await;
    let body = server.get("/profile").await.text();
    assert!(body.contains("0 likes"));

    // Edit page shows the current content
    let body = server.get("/edit/1").await.text();
    assert!(body.contains("my first ripple"));

    // Update replaces content
    let response = server
        .post("/update/1")
        .form(&json!({"content": "edited ripple"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let body = server.get("/profile").await.text();
    assert!(body.contains("edited ripple"));
    assert!(!body.contains("my first ripple"));
}

#[tokio::test]
async fn test_like_missing_post_is_404() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;
    register(&server, "liker@example.com").await;

    let response = server.get("/like/999").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_stores_picture() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;
    register(&server, "pic@example.com").await;

    let part = Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name("me.png")
        .mime_type("image/png");
    let response = server
        .post("/upload")
        .multipart(MultipartForm::new().add_part("dp", part))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/profile");

    // The stored file landed in the upload dir
    let stored: Vec<_> = std::fs::read_dir(dir.path())
        .expect("Failed to read upload dir")
        .collect();
    assert_eq!(stored.len(), 1);

    // And the profile now references it
    let body = server.get("/profile").await.text();
    assert!(body.contains("/uploads/"));
    assert!(body.contains(".png"));
}

#[tokio::test]
async fn test_upload_rejects_wrong_type() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;
    register(&server, "bad@example.com").await;

    let part = Part::bytes(b"%PDF-1.4".to_vec())
        .file_name("cv.pdf")
        .mime_type("application/pdf");
    let response = server
        .post("/upload")
        .multipart(MultipartForm::new().add_part("dp", part))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_image_page() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let server = test_server(&dir).await;
    register(&server, "img@example.com").await;

    let response = server.get("/profile/image/whatever.png").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("picture"));
}
