//! Database queries for pull requests waiting for review.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::{NewReview, Review};

const REVIEW_FIELDS: &str = "id, count, waiting_from, pr_id, pr_name, pr_url";

/// Record a pull request as waiting for review and return its row ID.
pub async fn insert_review(pool: &DbPool, review: &NewReview) -> Result<i64, AppError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO reviews (waiting_from, pr_id, pr_name, pr_url) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(review.waiting_from)
    .bind(review.pr_id)
    .bind(&review.pr_name)
    .bind(&review.pr_url)
    .fetch_one(pool)
    .await?;

    log::debug!("Review {} waiting for PR {}", id, review.pr_id);
    Ok(id)
}

/// Get a single review by row ID.
pub async fn get_review(pool: &DbPool, id: i64) -> Result<Review, AppError> {
    sqlx::query_as::<_, Review>(&format!("SELECT {REVIEW_FIELDS} FROM reviews WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found_with_id("Review", id.to_string()))
}

/// List every waiting review, oldest row first.
pub async fn list_reviews(pool: &DbPool) -> Result<Vec<Review>, AppError> {
    let reviews =
        sqlx::query_as::<_, Review>(&format!("SELECT {REVIEW_FIELDS} FROM reviews ORDER BY id"))
            .fetch_all(pool)
            .await?;

    Ok(reviews)
}

/// List the waiting reviews recorded for one pull request.
pub async fn list_reviews_for_pr(pool: &DbPool, pr_id: i64) -> Result<Vec<Review>, AppError> {
    let reviews = sqlx::query_as::<_, Review>(&format!(
        "SELECT {REVIEW_FIELDS} FROM reviews WHERE pr_id = ? ORDER BY id"
    ))
    .bind(pr_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

/// Add one to a review's reminder count and return the new value.
pub async fn increment_count(pool: &DbPool, id: i64) -> Result<i64, AppError> {
    let count: Option<i64> = sqlx::query_scalar(
        "UPDATE reviews SET count = COALESCE(count, 0) + 1 WHERE id = ? RETURNING count",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    count.ok_or_else(|| AppError::not_found_with_id("Review", id.to_string()))
}

/// Delete a review. Returns whether a row was removed.
pub async fn delete_review(pool: &DbPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
