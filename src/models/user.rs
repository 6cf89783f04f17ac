//! User model
//!
//! Defines the User entity for the Ripple social app.
//! The password is always stored as an argon2 hash and is never serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (handle)
    pub username: String,
    /// Display name
    pub name: String,
    /// Email address (unique, used for login)
    pub email: String,
    /// Age, if provided at registration
    pub age: Option<i64>,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Stored filename of the profile picture, if uploaded
    pub profile_image: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given fields.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password()`.
    pub fn new(
        username: String,
        name: String,
        email: String,
        age: Option<i64>,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // assigned by the database
            username,
            name,
            email,
            age,
            password_hash,
            profile_image: None,
            created_at: now,
            updated_at: now,
        }
    }
}
