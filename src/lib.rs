//! Review Tracker - SQLite storage for pull requests waiting for review.
//!
//! The crate owns a single `reviews` table. [`db::initialize`] opens a pool
//! and creates the table if needed; [`db::ensure_schema`] does the same for
//! a connection the caller already holds. [`db::reviews`] has typed queries
//! over the table.

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use config::DbConfig;
pub use error::AppError;
pub use models::{NewReview, Review};
