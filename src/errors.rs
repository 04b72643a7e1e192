//! Error types for promptkeep.
//!
//! Expected conditions (unknown ids, malformed import documents) never
//! panic; they surface either as `Option::None` or as one of the enums below.

use thiserror::Error;

/// Result type alias for promptkeep operations
pub type Result<T> = std::result::Result<T, KeepError>;

/// Main error type for repository and facade operations
#[derive(Debug, Error)]
pub enum KeepError {
    /// Caller-supplied input failed a field check
    #[error("Validation error: {0}")]
    Validation(String),

    /// A rename would give two categories the same case-insensitive name
    #[error("A category named '{0}' already exists")]
    DuplicateCategoryName(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Import document rejected
    #[error(transparent)]
    Import(#[from] ImportError),
}

impl KeepError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            KeepError::Validation(_) => "validation",
            KeepError::DuplicateCategoryName(_) => "duplicate_name",
            KeepError::Serialization(_) => "serialization",
            KeepError::Import(err) => err.code(),
        }
    }
}

/// Why an import document was rejected.
///
/// A failed import never touches persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// Input is not JSON at all
    #[error("Invalid JSON format: {0}")]
    Parse(String),

    /// JSON parsed, but the envelope or one of its records has the wrong shape
    #[error("Invalid data structure: {}", describe_violation(.collection, .index, .field, .reason))]
    Structure {
        collection: &'static str,
        index: Option<usize>,
        field: Option<String>,
        reason: String,
    },

    /// Anything else that went wrong after validation passed
    #[error("An unexpected error occurred during import: {0}")]
    Unexpected(String),
}

impl ImportError {
    pub(crate) fn structure(collection: &'static str, reason: impl Into<String>) -> Self {
        ImportError::Structure {
            collection,
            index: None,
            field: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn field(
        collection: &'static str,
        index: usize,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ImportError::Structure {
            collection,
            index: Some(index),
            field: Some(field.into()),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code, suitable for a UI to branch on.
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::Parse(_) => "parse_error",
            ImportError::Structure { .. } => "structure_error",
            ImportError::Unexpected(_) => "unexpected_error",
        }
    }
}

fn describe_violation(
    collection: &str,
    index: &Option<usize>,
    field: &Option<String>,
    reason: &str,
) -> String {
    match (index, field.as_deref()) {
        (Some(i), Some(f)) => format!("{}[{}].{} {}", collection, i, f, reason),
        (Some(i), None) => format!("{}[{}] {}", collection, i, reason),
        (None, Some(f)) => format!("{}.{} {}", collection, f, reason),
        (None, None) => format!("{} {}", collection, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_codes() {
        assert_eq!(ImportError::Parse("eof".into()).code(), "parse_error");
        assert_eq!(
            ImportError::structure("prompts", "must be an array").code(),
            "structure_error"
        );
        assert_eq!(ImportError::Unexpected("boom".into()).code(), "unexpected_error");
    }

    #[test]
    fn test_structure_error_display_names_the_field() {
        let err = ImportError::field("categories", 4, "name", "must be a string");
        assert_eq!(
            err.to_string(),
            "Invalid data structure: categories[4].name must be a string"
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(KeepError::Validation("x".into()).category(), "validation");
        let err: KeepError = ImportError::Parse("x".into()).into();
        assert_eq!(err.category(), "parse_error");
    }
}
