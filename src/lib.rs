//! Client for the comment endpoints of the WordPress.com REST API: hierarchical comment sync,
//! replies, edits, moderation, trashing, likes and the list of users who liked a comment.
//!
//! Each operation performs a single request and resolves to exactly one [error::CommentResult].
//! The client keeps no state between calls besides its connection pool.

pub mod api;
pub mod common;
pub mod config;
pub mod error;
pub mod hierarchy;

pub use api::ApiClient;
