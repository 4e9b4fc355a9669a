//! Database layer for the local SQLite review store.
//!
//! This module handles:
//! - Connection pool management with WAL mode
//! - Idempotent creation of the `reviews` table
//! - Typed query helpers over `reviews`

pub mod pool;
pub mod reviews;

use sqlx::{Connection, SqliteConnection};

use crate::config::DbConfig;
use crate::error::AppError;

pub use pool::DbPool;

/// Name of the table holding pull requests waiting for review.
pub const REVIEWS_TABLE: &str = "reviews";

/// Columns the `reviews` table must carry, in declaration order.
pub const REVIEW_COLUMNS: [&str; 6] = ["id", "count", "waiting_from", "pr_id", "pr_name", "pr_url"];

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Initialize the database: create the file if needed and ensure the schema.
///
/// Returns a pool whose connections all have foreign key enforcement on.
pub async fn initialize(config: &DbConfig) -> Result<DbPool, AppError> {
    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::schema_creation(format!("Failed to create database directory: {}", e))
        })?;
    }

    let pool = pool::create_pool(config).await.map_err(|e| {
        AppError::schema_creation(format!(
            "Failed to open database {}: {}",
            config.path.display(),
            e
        ))
    })?;

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| AppError::schema_creation(e.to_string()))?;
    ensure_schema(&mut conn).await?;

    Ok(pool)
}

/// Ensure the `reviews` table exists on the database behind `conn`.
///
/// Turns on foreign key enforcement for this connection, then creates the
/// table unless it is already present. An existing table is only inspected,
/// never altered; its rows are left untouched. Safe to call any number of
/// times.
///
/// Fails with [`AppError::SchemaCreation`] when another kind of object is
/// named `reviews`, when an existing `reviews` table lacks one of
/// [`REVIEW_COLUMNS`], or when the database cannot be written.
pub async fn ensure_schema(conn: &mut SqliteConnection) -> Result<(), AppError> {
    let statements = parse_sql_statements(SCHEMA_SQL);
    let (pragmas, ddl): (Vec<_>, Vec<_>) = statements
        .into_iter()
        .partition(|s| s.to_ascii_uppercase().starts_with("PRAGMA"));

    // SQLite ignores foreign_keys changes inside a transaction.
    for statement in &pragmas {
        sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .map_err(schema_error)?;
    }

    // IMMEDIATE takes the write lock up front so concurrent callers wait on
    // the busy timeout instead of failing to upgrade a read lock.
    let mut tx = conn
        .begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(schema_error)?;

    let existing: Option<(String,)> = sqlx::query_as(
        "SELECT type FROM sqlite_master WHERE name = ? COLLATE NOCASE AND type IN ('table', 'view', 'index')",
    )
    .bind(REVIEWS_TABLE)
    .fetch_optional(&mut *tx)
    .await
    .map_err(schema_error)?;

    match existing {
        Some((kind,)) if kind != "table" => {
            log::warn!("Cannot create {} table: a {} with that name exists", REVIEWS_TABLE, kind);
            return Err(AppError::schema_creation_for(
                format!("A {} named {} already exists", kind, REVIEWS_TABLE),
                REVIEWS_TABLE,
            ));
        }
        Some(_) => {
            let columns: Vec<(String,)> =
                sqlx::query_as("SELECT name FROM pragma_table_info(?)")
                    .bind(REVIEWS_TABLE)
                    .fetch_all(&mut *tx)
                    .await
                    .map_err(schema_error)?;

            let missing: Vec<&str> = REVIEW_COLUMNS
                .iter()
                .copied()
                .filter(|expected| {
                    !columns
                        .iter()
                        .any(|(name,)| name.eq_ignore_ascii_case(expected))
                })
                .collect();

            if !missing.is_empty() {
                log::warn!(
                    "Existing {} table is missing columns: {}",
                    REVIEWS_TABLE,
                    missing.join(", ")
                );
                return Err(AppError::schema_creation_for(
                    format!("Existing table is missing columns: {}", missing.join(", ")),
                    REVIEWS_TABLE,
                ));
            }

            log::debug!("{} table already present", REVIEWS_TABLE);
        }
        None => {
            for statement in &ddl {
                sqlx::query(statement)
                    .execute(&mut *tx)
                    .await
                    .map_err(schema_error)?;
            }
            log::info!("Created {} table", REVIEWS_TABLE);
        }
    }

    tx.commit().await.map_err(schema_error)?;

    Ok(())
}

fn schema_error(err: sqlx::Error) -> AppError {
    AppError::schema_creation(err.to_string())
}

/// Split a SQL script into statements.
///
/// Skips `--` comments and only treats `;` as a terminator outside
/// parentheses and string literals.
fn parse_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut paren_depth: u32 = 0;
    let mut in_string = false;

    for line in sql.lines() {
        let mut chars = line.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '\'' => {
                    in_string = !in_string;
                    current.push(ch);
                }
                '-' if !in_string && chars.peek() == Some(&'-') => break,
                '(' if !in_string => {
                    paren_depth += 1;
                    current.push(ch);
                }
                ')' if !in_string => {
                    paren_depth = paren_depth.saturating_sub(1);
                    current.push(ch);
                }
                ';' if !in_string && paren_depth == 0 => {
                    let statement = current.trim();
                    if !statement.is_empty() {
                        statements.push(statement.to_string());
                    }
                    current.clear();
                }
                _ => current.push(ch),
            }
        }

        if !current.trim().is_empty() {
            current.push(' ');
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        statements.push(last.to_string());
    }

    statements
}
