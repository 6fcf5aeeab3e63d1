//! Error types for the record store.

use thiserror::Error;

use crate::engine::EngineError;

/// Failures parsing a properties blob.
#[derive(Debug, Error)]
pub enum PropertiesError {
    /// The blob is not valid JSON at all.
    #[error("properties blob is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The blob parsed, but the top level is not an object.
    #[error("properties must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },
}

/// Caller-facing failures of record store operations.
///
/// A missing record is its own outcome, never conflated with a blob that
/// fails to parse or with an engine-reported failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record ids must be non-empty.
    #[error("record id must be a non-empty string")]
    EmptyId,

    /// No record stored under this id.
    #[error("record {id:?} not found")]
    NotFound { id: String },

    /// The properties blob could not be parsed.
    #[error(transparent)]
    Serialization(#[from] PropertiesError),

    /// The keyspace engine rejected the operation.
    #[error(transparent)]
    Backend(#[from] EngineError),
}

impl StoreError {
    pub(crate) fn not_found(id: &str) -> Self {
        StoreError::NotFound { id: id.to_string() }
    }

    /// True for the missing-record outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EntryKind;

    #[test]
    fn test_is_not_found_distinguishes_outcomes() {
        assert!(StoreError::not_found("p1").is_not_found());
        assert!(!StoreError::EmptyId.is_not_found());

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::from(PropertiesError::InvalidJson(parse_err));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_display_names_the_id() {
        let err = StoreError::not_found("p1");
        assert!(format!("{}", err).contains("\"p1\""));
    }

    #[test]
    fn test_backend_errors_convert_with_question_mark() {
        fn hit_engine() -> StoreResult<()> {
            Err(EngineError::wrong_type(
                "indices",
                EntryKind::Set,
                EntryKind::Hash,
            ))?;
            Ok(())
        }
        let err = hit_engine().unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn test_serialization_display_is_transparent() {
        let err = StoreError::from(PropertiesError::NotAnObject { kind: "an array" });
        assert_eq!(
            format!("{}", err),
            "properties must be a JSON object, got an array"
        );
    }
}
