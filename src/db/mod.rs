//! Database layer
//!
//! SQLite persistence for the Ripple social app:
//! - `pool`: connection pool creation
//! - `migrations`: embedded, versioned schema migrations
//! - `repositories`: trait-based data access for users and posts

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DbPool};
