//! Review model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A pull request waiting for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Review {
    /// Row ID, assigned by SQLite and never reused.
    pub id: i64,

    /// Reminders sent so far. Defaults to 0; NULL only if written explicitly.
    pub count: Option<i64>,

    /// Date the pull request started waiting.
    pub waiting_from: NaiveDate,

    /// Pull request number in the hosting service.
    pub pr_id: i64,

    /// Pull request title.
    pub pr_name: String,

    /// URL to the pull request.
    pub pr_url: String,
}

impl Review {
    /// Reminder count, reading a NULL `count` as zero.
    pub fn reminders_sent(&self) -> i64 {
        self.count.unwrap_or(0)
    }
}

/// Fields supplied when a pull request starts waiting for review.
///
/// `id` and `count` are left to their column defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub waiting_from: NaiveDate,
    pub pr_id: i64,
    pub pr_name: String,
    pub pr_url: String,
}

impl NewReview {
    pub fn new(
        waiting_from: NaiveDate,
        pr_id: i64,
        pr_name: impl Into<String>,
        pr_url: impl Into<String>,
    ) -> Self {
        Self {
            waiting_from,
            pr_id,
            pr_name: pr_name.into(),
            pr_url: pr_url.into(),
        }
    }
}
