//! Typed errors for world validation and generation.

use ai_client::AiError;
use thiserror::Error;

/// A candidate world that does not satisfy the world schema.
///
/// Validation stops at the first offending field, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaValidationError {
    /// The candidate is not a JSON object at all
    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    /// Field absent or null
    #[error("missing required field `{field}`")]
    Missing { field: &'static str },

    /// Field present with the wrong JSON type
    #[error("field `{field}` has the wrong type: expected {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// Blank text or a list that must have entries
    #[error("field `{field}` must not be empty")]
    Empty { field: &'static str },

    /// Right type, unacceptable value
    #[error("field `{field}` is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SchemaValidationError {
    /// The schema field this error is about, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NotAnObject { .. } => None,
            Self::Missing { field }
            | Self::WrongType { field, .. }
            | Self::Empty { field }
            | Self::Invalid { field, .. } => Some(field),
        }
    }
}

/// Failure of a single generate or ask call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backend call itself failed
    #[error("generation backend error: {0}")]
    Backend(#[from] AiError),

    /// The backend answered with nothing usable
    #[error("generation backend returned no content")]
    EmptyResponse,

    /// Structured output that is not JSON
    #[error("generation backend returned malformed JSON: {0}")]
    MalformedJson(String),

    /// Structured output that is JSON but not a valid world
    #[error("generated world failed validation: {0}")]
    Schema(#[from] SchemaValidationError),
}

impl GenerationError {
    /// The offending schema field when the failure was a schema violation.
    pub fn schema_field(&self) -> Option<&'static str> {
        match self {
            Self::Schema(err) => err.field(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::MalformedJson(err.to_string())
    }
}

/// Result type alias for generation operations.
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_reported_for_field_errors() {
        let err = SchemaValidationError::Missing { field: "cities" };
        assert_eq!(err.field(), Some("cities"));
        assert_eq!(err.to_string(), "missing required field `cities`");

        let err = SchemaValidationError::NotAnObject { found: "array" };
        assert_eq!(err.field(), None);
    }

    #[test]
    fn schema_field_passes_through_generation_error() {
        let err: GenerationError = SchemaValidationError::Empty { field: "languages" }.into();
        assert_eq!(err.schema_field(), Some("languages"));
        assert!(err.to_string().contains("languages"));

        let err: GenerationError = AiError::EmptyResponse.into();
        assert_eq!(err.schema_field(), None);
    }
}
