use thiserror::Error;

/// A record that cannot enter the analytics engine.
///
/// Names the offending record and field so upstream corruption can be traced
/// back to its source row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid record {record_id}: field `{field}` {reason}")]
pub struct ValidationError {
    pub record_id: String,
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(record_id: impl Into<String>, field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError {
            record_id: record_id.into(),
            field,
            reason: reason.into(),
        }
    }

    pub fn missing(record_id: impl Into<String>, field: &'static str) -> Self {
        Self::new(record_id, field, "is missing")
    }
}

/// Errors surfaced by the storage layer, the CLI and the engine
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_record_and_field() {
        let err = ValidationError::missing("m-42", "created_at");
        assert_eq!(
            err.to_string(),
            "invalid record m-42: field `created_at` is missing"
        );
    }

    #[test]
    fn test_validation_error_converts_into_crate_error() {
        let err: Error = ValidationError::new("m-1", "subject", "has unknown value 'Biology'").into();
        assert!(matches!(err, Error::Validation(ref v) if v.field == "subject"));
        assert!(err.to_string().contains("Biology"));
    }
}
