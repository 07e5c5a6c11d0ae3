//! Custom error types for the school ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum SchoolError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for inputs and data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A store-level failure, tagged with the operation that hit it
    #[error("Database error while {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Anything that does not fit the categories above
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl SchoolError {
    /// Create a "not found" error for classes
    pub fn class_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Class",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for students
    pub fn student_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Student",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for monthly fees
    pub fn monthly_fee_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Monthly fee",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for admissions
    pub fn admission_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Admission",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for payments
    pub fn payment_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Payment",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the database
    pub fn is_database(&self) -> bool {
        matches!(self, Self::Database { .. })
    }
}

impl From<std::io::Error> for SchoolError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for SchoolError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            operation: "executing statement",
            message: err.to_string(),
        }
    }
}

/// Attach the name of the failing operation to a rusqlite result
pub trait DbContext<T> {
    fn db_context(self, operation: &'static str) -> SchoolResult<T>;
}

impl<T> DbContext<T> for Result<T, rusqlite::Error> {
    fn db_context(self, operation: &'static str) -> SchoolResult<T> {
        self.map_err(|e| SchoolError::Database {
            operation,
            message: e.to_string(),
        })
    }
}

/// Result type alias for ledger operations
pub type SchoolResult<T> = Result<T, SchoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchoolError::Validation("class name cannot be empty".into());
        assert_eq!(
            err.to_string(),
            "Validation error: class name cannot be empty"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_not_found_error() {
        let err = SchoolError::student_not_found("stu-7");
        assert_eq!(err.to_string(), "Student not found: stu-7");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_db_context_names_operation() {
        let raw: Result<(), rusqlite::Error> = Err(rusqlite::Error::QueryReturnedNoRows);
        let err = raw.db_context("listing monthly fees").unwrap_err();

        assert!(err.is_database());
        assert!(err
            .to_string()
            .starts_with("Database error while listing monthly fees:"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SchoolError = io_err.into();
        assert!(matches!(err, SchoolError::Io(_)));
    }
}
