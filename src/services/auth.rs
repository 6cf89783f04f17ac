//! Auth service
//!
//! Business logic for registration, login, and session-token validation.
//! Passwords are hashed with argon2id before they reach the store; session
//! identity travels as a stateless signed token.

use std::sync::Arc;

use anyhow::Context;

use crate::config::{AuthConfig, HashCost};
use crate::db::repositories::UserRepository;
use crate::models::User;
use crate::services::password::{hash_password, verify_password};
use crate::services::token::{TokenClaims, TokenSigner};

/// Error types for auth operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration with an email that is already taken
    #[error("User already exists")]
    DuplicateUser,

    /// Login with an email no account has
    #[error("User does not exist")]
    UserNotFound,

    /// Login with the wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, forged, or expired session token
    #[error("Invalid session token")]
    InvalidToken,

    /// Invalid registration input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Store or hashing failure
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Auth service for account creation and session identity
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    signer: TokenSigner,
    hash_cost: HashCost,
}

impl AuthService {
    /// Create an auth service from configuration.
    ///
    /// Fails if the signing secret is missing.
    pub fn new(user_repo: Arc<dyn UserRepository>, config: &AuthConfig) -> anyhow::Result<Self> {
        let signer = TokenSigner::new(&config.secret, config.token_ttl_hours)?;
        Ok(Self {
            user_repo,
            signer,
            hash_cost: config.hash,
        })
    }

    fn validate_register_input(input: &RegisterInput) -> Result<(), AuthError> {
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(AuthError::Validation("A valid email is required".to_string()));
        }
        if input.password.is_empty() {
            return Err(AuthError::Validation("A password is required".to_string()));
        }
        Ok(())
    }

    /// Register a new account and issue a session token.
    ///
    /// # Errors
    ///
    /// - `DuplicateUser` if the email is already registered
    /// - `Validation` for unusable input
    /// - `Internal` for store or hashing failures
    pub async fn register(&self, input: RegisterInput) -> Result<(User, String), AuthError> {
        Self::validate_register_input(&input)?;

        if self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(AuthError::DuplicateUser);
        }

        let password_hash =
            hash_password(&input.password, &self.hash_cost).context("Failed to hash password")?;

        let user = self
            .user_repo
            .create(&User::new(
                input.username,
                input.name,
                input.email,
                input.age,
                password_hash,
            ))
            .await
            .context("Failed to create user")?;

        let token = self.signer.sign(&user.email, user.id)?;
        tracing::info!(user_id = user.id, "User registered");

        Ok((user, token))
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no account has the email
    /// - `InvalidCredentials` if the password is wrong
    pub async fn login(&self, input: LoginInput) -> Result<(User, String), AuthError> {
        let user = self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to look up user")?
            .ok_or(AuthError::UserNotFound)?;

        let valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.signer.sign(&user.email, user.id)?;
        tracing::debug!(user_id = user.id, "User logged in");

        Ok((user, token))
    }

    /// Validate a session token.
    ///
    /// Any failure — malformed, forged, expired — is `InvalidToken`.
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.signer.verify(token).map_err(|_| AuthError::InvalidToken)
    }

    /// Resolve validated claims to the stored user.
    pub async fn current_user(&self, claims: &TokenClaims) -> Result<User, AuthError> {
        self.user_repo
            .get_by_email(&claims.email)
            .await
            .context("Failed to load current user")?
            .ok_or(AuthError::UserNotFound)
    }
}
