//! The external generator seam.
//!
//! Every call to a generative backend goes through [`Generator`]. The core
//! treats it as an opaque asynchronous unit of work: one request in, one
//! artifact or one error out.

mod artifact;
mod request;

pub use artifact::{data_uri, GeneratedArtifact};
pub use request::{AspectRatio, GenerationRequest, GenerationTask, ResponseFormat};

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single generator call.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The backend reported an error.
    #[error("Generator backend failed: {0}")]
    Backend(#[from] anyhow::Error),

    /// The backend answered with no content.
    #[error("Generator returned no content")]
    EmptyResponse,

    /// The backend answered with the wrong kind of artifact.
    #[error("Expected {expected} artifact, got {actual}")]
    UnexpectedArtifact {
        /// What the request asked for.
        expected: &'static str,
        /// What came back.
        actual: &'static str,
    },
}

/// Produces one artifact from one request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    /// Runs one generation call.
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedArtifact, GeneratorError>;
}

/// Runs a text request and returns the reply text.
pub async fn generate_text(
    generator: &dyn Generator,
    request: GenerationRequest,
) -> Result<String, GeneratorError> {
    generator.generate(request).await?.into_text()
}

/// Runs an image request and returns a URI for the result.
pub async fn generate_image_uri(
    generator: &dyn Generator,
    request: GenerationRequest,
) -> Result<String, GeneratorError> {
    generator.generate(request).await?.into_uri()
}
