//! Business logic services
//!
//! - `password`: argon2id hashing and verification
//! - `token`: stateless signed session tokens
//! - `auth`: registration, login, and token validation
//! - `post`: post creation, edits, and the like toggle

pub mod auth;
pub mod password;
pub mod post;
pub mod token;

pub use auth::{AuthError, AuthService, LoginInput, RegisterInput};
pub use post::{PostError, PostService};
pub use token::{InvalidToken, TokenClaims, TokenSigner};
