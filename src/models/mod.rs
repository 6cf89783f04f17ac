//! Data models
//!
//! Database entities for the Ripple social app: users and their posts.

mod post;
mod user;

pub use post::Post;
pub use user::User;
