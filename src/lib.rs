//! Ripple — a small server-rendered social app
//!
//! Users register, log in, upload a profile picture, write posts, and
//! like or edit them. Single instance, single SQLite datastore.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod views;
