//! Contract validation errors.

use thiserror::Error;

/// A generator reply that does not satisfy its contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The reply carried no content.
    #[error("Reply was empty")]
    Empty,

    /// The reply is not well-formed JSON of the expected shape.
    #[error("Reply could not be parsed: {0}")]
    Malformed(String),

    /// A field holds a value outside its allowed range.
    #[error("Field '{field}': {message}")]
    Field {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl ValidationError {
    /// Creates a field-level error.
    #[must_use]
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if the reply had no usable content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
