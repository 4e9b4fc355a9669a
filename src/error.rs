//! Error types for the review store.
//!
//! Errors are serializable so callers can hand them across a process
//! boundary (JSON logs, an API layer) without flattening them to strings.

use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Errors returned by schema setup and review queries.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// The `reviews` table could not be created or is unusable.
    #[error("Schema creation error: {message}")]
    SchemaCreation {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        object: Option<String>,
    },

    /// An insert or update violated a column constraint.
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        column: Option<String>,
    },

    /// Requested row not found.
    #[error("Not found: {resource}")]
    NotFound {
        resource: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Any other database failure.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
    },
}

impl AppError {
    /// Create a schema creation error.
    pub fn schema_creation(message: impl Into<String>) -> Self {
        Self::SchemaCreation {
            message: message.into(),
            object: None,
        }
    }

    /// Create a schema creation error naming the conflicting object.
    pub fn schema_creation_for(message: impl Into<String>, object: impl Into<String>) -> Self {
        Self::SchemaCreation {
            message: message.into(),
            object: Some(object.into()),
        }
    }

    /// Create a constraint violation error.
    pub fn constraint_violation(message: impl Into<String>, column: Option<String>) -> Self {
        Self::ConstraintViolation {
            message: message.into(),
            column,
        }
    }

    /// Create a not found error with ID.
    pub fn not_found_with_id(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.into()),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: None,
        }
    }

    /// Create a database error with operation context.
    pub fn database_with_op(message: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: Some(operation.into()),
        }
    }

    /// Check if this is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }

    /// Column named by a constraint violation, if SQLite reported one.
    pub fn violated_column(&self) -> Option<&str> {
        match self {
            Self::ConstraintViolation { column, .. } => column.as_deref(),
            _ => None,
        }
    }

    /// Classify a sqlx error into a constraint violation or a plain database error.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let message = db_err.message();
            let is_constraint = matches!(
                db_err.kind(),
                ErrorKind::NotNullViolation
                    | ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::CheckViolation
            ) || message.contains("constraint failed");

            if is_constraint {
                return Self::constraint_violation(message, constrained_column(message));
            }
        }

        Self::database(err.to_string())
    }
}

/// Extract `col` from SQLite messages like `NOT NULL constraint failed: reviews.col`.
fn constrained_column(message: &str) -> Option<String> {
    let (_, target) = message.rsplit_once(": ")?;
    let column = target.split(',').next()?.trim();
    let column = column.rsplit('.').next()?;
    (!column.is_empty()).then(|| column.to_string())
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::from_sqlx(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = AppError::schema_creation_for("view exists", "reviews");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"SchemaCreation\""));
        assert!(json.contains("\"object\":\"reviews\""));
    }

    #[test]
    fn test_optional_fields_not_serialized() {
        let err = AppError::database("error");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("operation"));
    }

    #[test]
    fn test_display_impl() {
        let err = AppError::not_found_with_id("Review", "7");
        assert_eq!(format!("{}", err), "Not found: Review");
    }

    #[test]
    fn test_constrained_column() {
        assert_eq!(
            constrained_column("NOT NULL constraint failed: reviews.pr_name"),
            Some("pr_name".to_string())
        );
        assert_eq!(
            constrained_column("UNIQUE constraint failed: reviews.pr_id, reviews.pr_url"),
            Some("pr_id".to_string())
        );
        assert_eq!(constrained_column("no colon here"), None);
    }

    #[test]
    fn test_non_database_error_is_database_kind() {
        let err = AppError::from_sqlx(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database { .. }));
        assert!(err.violated_column().is_none());
    }
}
