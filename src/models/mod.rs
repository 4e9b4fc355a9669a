//! Data models stored in the local SQLite database.
//!
//! Models derive Serialize/Deserialize for callers and FromRow for SQLx queries.

pub mod review;

pub use review::{NewReview, Review};
