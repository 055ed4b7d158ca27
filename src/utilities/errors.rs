//! Error types for response validation.

use thiserror::Error;

/// Why a repaired generation output was rejected.
///
/// Every variant renders a human-readable reason; callers surface it as a
/// client error. The offending text carried by [`ValidationError::InvalidJson`]
/// is kept for diagnostics and never rendered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The repaired text is still not valid JSON.
    #[error("{detail}")]
    InvalidJson { detail: String, text: String },

    /// One or more required keys are absent.
    #[error("Missing required fields in response. Found fields: {}", found.join(", "))]
    MissingFields { found: Vec<String> },

    /// A field holds a value of the wrong JSON type.
    #[error("Field '{field}' must be {expected}")]
    InvalidFieldType {
        field: String,
        expected: &'static str,
    },

    /// Blog tags are not a list or have too few entries.
    #[error("Tags must be a list with at least {min} items, got {found}")]
    InvalidTags { found: String, min: usize },

    /// Blog content is below the word minimum.
    #[error("Content must be at least {min} words, got {words}")]
    ContentTooShort { words: usize, min: usize },
}

impl ValidationError {
    pub fn invalid_json(error: &serde_json::Error, text: impl Into<String>) -> Self {
        Self::InvalidJson {
            detail: error.to_string(),
            text: text.into(),
        }
    }

    pub fn invalid_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidFieldType {
            field: field.into(),
            expected,
        }
    }

    /// Short machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidJson { .. } => "invalid_json",
            Self::MissingFields { .. } => "missing_fields",
            Self::InvalidFieldType { .. } => "invalid_field_type",
            Self::InvalidTags { .. } => "invalid_tags",
            Self::ContentTooShort { .. } => "content_too_short",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_found_keys() {
        let err = ValidationError::MissingFields {
            found: vec!["title".to_string(), "description".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields in response. Found fields: title, description"
        );
        assert_eq!(err.kind(), "missing_fields");
    }

    #[test]
    fn test_invalid_json_hides_text() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ValidationError::invalid_json(&parse_err, "{oops");
        assert!(!err.to_string().contains("{oops"));
        assert!(err.to_string().contains("line 1"));
    }
}
