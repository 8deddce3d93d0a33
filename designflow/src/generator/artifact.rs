//! Generator outputs.

use super::GeneratorError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Encodes raw bytes as a `data:` URI.
#[must_use]
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// What a generator call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedArtifact {
    /// A text reply (plain or JSON).
    Text(String),
    /// Raw image bytes.
    Image {
        /// MIME type, e.g. "image/jpeg".
        mime_type: String,
        /// Encoded image.
        bytes: Vec<u8>,
    },
    /// A hosted asset.
    Uri(String),
}

impl GeneratedArtifact {
    fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image { .. } => "image",
            Self::Uri(_) => "uri",
        }
    }

    /// Returns the reply text.
    pub fn into_text(self) -> Result<String, GeneratorError> {
        match self {
            Self::Text(text) if text.trim().is_empty() => Err(GeneratorError::EmptyResponse),
            Self::Text(text) => Ok(text),
            other => Err(GeneratorError::UnexpectedArtifact {
                expected: "text",
                actual: other.kind(),
            }),
        }
    }

    /// Returns a URI for an image result, encoding raw bytes as a data URI.
    pub fn into_uri(self) -> Result<String, GeneratorError> {
        match self {
            Self::Image { bytes, .. } if bytes.is_empty() => Err(GeneratorError::EmptyResponse),
            Self::Image { mime_type, bytes } => Ok(data_uri(&mime_type, &bytes)),
            Self::Uri(uri) if uri.trim().is_empty() => Err(GeneratorError::EmptyResponse),
            Self::Uri(uri) => Ok(uri),
            other @ Self::Text(_) => Err(GeneratorError::UnexpectedArtifact {
                expected: "image",
                actual: other.kind(),
            }),
        }
    }
}
