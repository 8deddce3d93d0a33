//! Error types for the designflow pipeline.
//!
//! Only [`FatalStageError`], [`ConfigurationError`] and the brief precondition
//! [`BriefError`] ever cross the pipeline boundary as failures (plus
//! integration and cancellation, which are terminal by construction). Per-item
//! problems are [`ItemError`]s and are absorbed into degraded data.

use crate::core::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The umbrella error returned by a failed pipeline run.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// The one stage whose failure is fatal could not produce usable output.
    #[error("{0}")]
    FatalStage(#[from] FatalStageError),

    /// The pipeline was set up with invalid configuration.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// The brief is structurally incomplete.
    #[error("{0}")]
    Brief(#[from] BriefError),

    /// The final assembly step hit an inconsistency it cannot repair.
    #[error("{0}")]
    Integration(#[from] IntegrationError),

    /// The caller cancelled the run between stages.
    #[error("Pipeline cancelled: {0}")]
    Cancelled(String),
}

impl PipelineError {
    /// Returns a short machine-readable code for the error class.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::FatalStage(_) => "FATAL_STAGE",
            Self::Configuration(_) => "CONFIGURATION",
            Self::Brief(_) => "BRIEF_PRECONDITION",
            Self::Integration(_) => "INTEGRATION",
            Self::Cancelled(_) => "CANCELLED",
        }
    }
}

/// Why a fatal stage gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatalReason {
    /// The generator returned nothing usable.
    EmptyOutput,
    /// The structured reply could not be parsed.
    Unparseable,
    /// The generator call exceeded its timeout.
    TimedOut,
    /// The generator call failed outright.
    GeneratorFailed,
    /// The stage received no input items when at least one was required.
    NoInput,
}

impl fmt::Display for FatalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyOutput => write!(f, "empty output"),
            Self::Unparseable => write!(f, "unparseable output"),
            Self::TimedOut => write!(f, "timed out"),
            Self::GeneratorFailed => write!(f, "generator failure"),
            Self::NoInput => write!(f, "no input"),
        }
    }
}

/// A stage failure that cannot be papered over with a placeholder.
#[derive(Debug, Clone, Error)]
#[error("The {agent} failed ({reason}): {message}")]
pub struct FatalStageError {
    /// The agent whose stage failed.
    pub agent: AgentId,
    /// The failure class.
    pub reason: FatalReason,
    /// Human-readable detail.
    pub message: String,
}

impl FatalStageError {
    /// Creates a new fatal stage error.
    #[must_use]
    pub fn new(agent: AgentId, reason: FatalReason, message: impl Into<String>) -> Self {
        Self {
            agent,
            reason,
            message: message.into(),
        }
    }
}

/// Invalid pipeline setup, reported before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid configuration for '{field}': {message}")]
pub struct ConfigurationError {
    /// The offending setting.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ConfigurationError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// How a single unit of work failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemErrorKind {
    /// The processor returned an error.
    Failed,
    /// The processor exceeded the per-item timeout.
    TimedOut,
    /// The item was never started because the run was cancelled.
    Cancelled,
}

/// The error marker recorded in a worker pool slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Item {index} {kind:?}: {message}")]
pub struct ItemError {
    /// Input index of the failed item.
    pub index: usize,
    /// Failure class.
    pub kind: ItemErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl ItemError {
    /// Creates an error for a processor failure.
    #[must_use]
    pub fn failed(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            kind: ItemErrorKind::Failed,
            message: message.into(),
        }
    }

    /// Creates an error for a timed-out item.
    #[must_use]
    pub fn timed_out(index: usize, after_ms: u128) -> Self {
        Self {
            index,
            kind: ItemErrorKind::TimedOut,
            message: format!("no result after {after_ms}ms"),
        }
    }

    /// Creates an error for an item skipped by cancellation.
    #[must_use]
    pub fn cancelled(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            kind: ItemErrorKind::Cancelled,
            message: reason.into(),
        }
    }

    /// Returns true if the item never ran.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kind == ItemErrorKind::Cancelled
    }
}

/// A structurally incomplete brief.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BriefError {
    /// No sub-spaces were selected.
    #[error("Brief precondition violated: at least one sub-space must be selected")]
    NoSubSpaces,

    /// A spatial dimension is zero, negative or not a number.
    #[error("Brief precondition violated: dimension '{0}' must be a positive number")]
    NonPositiveDimension(&'static str),
}

/// An inconsistency found while assembling the final designs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrationError {
    /// An artifact points at a design that does not exist.
    #[error("Artifact references design {index} but only {count} designs exist")]
    DesignIndexOutOfRange {
        /// The referenced index.
        index: usize,
        /// Number of designs in the run.
        count: usize,
    },

    /// Per-design analysis results do not line up with the designs.
    #[error("Expected {expected} {analysis} results, got {actual}")]
    AnalysisCountMismatch {
        /// The analysis family.
        analysis: &'static str,
        /// Number of designs.
        expected: usize,
        /// Number of results received.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_stage_error_message() {
        let err = FatalStageError::new(
            AgentId::ConceptArchitect,
            FatalReason::EmptyOutput,
            "no skeletons",
        );
        let text = err.to_string();
        assert!(text.contains("Concept Architect"));
        assert!(text.contains("empty output"));
        assert!(text.contains("no skeletons"));
    }

    #[test]
    fn test_pipeline_error_codes() {
        let fatal: PipelineError =
            FatalStageError::new(AgentId::ConceptArchitect, FatalReason::TimedOut, "slow").into();
        assert_eq!(fatal.code(), "FATAL_STAGE");

        let config: PipelineError = ConfigurationError::new("visual_concurrency", "zero").into();
        assert_eq!(config.code(), "CONFIGURATION");

        let brief: PipelineError = BriefError::NoSubSpaces.into();
        assert_eq!(brief.code(), "BRIEF_PRECONDITION");
    }

    #[test]
    fn test_item_error_constructors() {
        let failed = ItemError::failed(3, "boom");
        assert_eq!(failed.index, 3);
        assert_eq!(failed.kind, ItemErrorKind::Failed);
        assert!(!failed.is_cancelled());

        let timed_out = ItemError::timed_out(1, 250);
        assert_eq!(timed_out.kind, ItemErrorKind::TimedOut);
        assert!(timed_out.message.contains("250ms"));

        assert!(ItemError::cancelled(0, "stop").is_cancelled());
    }

    #[test]
    fn test_configuration_error_display() {
        let err = ConfigurationError::new("visual_concurrency", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for 'visual_concurrency': must be at least 1"
        );
    }
}
