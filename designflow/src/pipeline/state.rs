//! Pipeline lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Where a pipeline run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Not started, or rejected before starting.
    Idle,
    /// Waiting on the concept call.
    ConceptInProgress,
    /// Skeletons available.
    ConceptDone,
    /// Visual requests in flight.
    VisualsInProgress,
    /// Every visual request settled.
    VisualsDone,
    /// Analysis calls in flight.
    AnalysisInProgress,
    /// Every analysis call settled.
    AnalysisDone,
    /// Assembling the result.
    IntegrationInProgress,
    /// Designs delivered.
    Completed,
    /// The run ended with an error.
    Failed,
}

/// Why a run moves to [`PipelineState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// A fatal stage error or an integration error.
    Fatal,
    /// The caller cancelled the run.
    Cancelled,
}

impl PipelineState {
    /// Returns true for `Completed` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// The state that follows on the success path.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::ConceptInProgress),
            Self::ConceptInProgress => Some(Self::ConceptDone),
            Self::ConceptDone => Some(Self::VisualsInProgress),
            Self::VisualsInProgress => Some(Self::VisualsDone),
            Self::VisualsDone => Some(Self::AnalysisInProgress),
            Self::AnalysisInProgress => Some(Self::AnalysisDone),
            Self::AnalysisDone => Some(Self::IntegrationInProgress),
            Self::IntegrationInProgress => Some(Self::Completed),
            Self::Completed | Self::Failed => None,
        }
    }

    /// Returns true if the run may fail from this state for `cause`.
    ///
    /// Fatal errors can only arise while the concept call or the integration
    /// step is running. Cancellation is possible from any non-terminal state.
    #[must_use]
    pub fn can_fail(self, cause: FailureCause) -> bool {
        match cause {
            FailureCause::Fatal => {
                matches!(self, Self::ConceptInProgress | Self::IntegrationInProgress)
            }
            FailureCause::Cancelled => !self.is_terminal(),
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ConceptInProgress => "concept_in_progress",
            Self::ConceptDone => "concept_done",
            Self::VisualsInProgress => "visuals_in_progress",
            Self::VisualsDone => "visuals_done",
            Self::AnalysisInProgress => "analysis_in_progress",
            Self::AnalysisDone => "analysis_done",
            Self::IntegrationInProgress => "integration_in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Records the states one run visits and refuses illegal moves.
#[derive(Debug, Clone)]
pub struct StateTracker {
    history: Vec<PipelineState>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTracker {
    /// Starts in `Idle`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: vec![PipelineState::Idle],
        }
    }

    /// The current state.
    #[must_use]
    pub fn current(&self) -> PipelineState {
        self.history
            .last()
            .copied()
            .unwrap_or(PipelineState::Idle)
    }

    /// Moves one step along the success path and returns the new state.
    pub fn advance(&mut self) -> Option<PipelineState> {
        let next = self.current().next()?;
        info!(from = %self.current(), to = %next, "Pipeline state transition");
        self.history.push(next);
        Some(next)
    }

    /// Moves to `Failed` if the current state allows it for `cause`.
    ///
    /// Returns false, logs, and stays put otherwise.
    pub fn fail(&mut self, cause: FailureCause) -> bool {
        let current = self.current();
        if current.can_fail(cause) {
            info!(from = %current, ?cause, "Pipeline failed");
            self.history.push(PipelineState::Failed);
            true
        } else {
            warn!(from = %current, ?cause, "Refusing transition to failed");
            false
        }
    }

    /// Every state visited, in order.
    #[must_use]
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Consumes the tracker, returning the visited states.
    #[must_use]
    pub fn into_history(self) -> Vec<PipelineState> {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_success_path() {
        let mut tracker = StateTracker::new();
        while tracker.advance().is_some() {}
        assert_eq!(
            tracker.history(),
            &[
                PipelineState::Idle,
                PipelineState::ConceptInProgress,
                PipelineState::ConceptDone,
                PipelineState::VisualsInProgress,
                PipelineState::VisualsDone,
                PipelineState::AnalysisInProgress,
                PipelineState::AnalysisDone,
                PipelineState::IntegrationInProgress,
                PipelineState::Completed,
            ]
        );
        assert!(tracker.current().is_terminal());
    }

    #[test]
    fn test_fatal_failure_only_from_concept_or_integration() {
        let mut tracker = StateTracker::new();
        assert!(!tracker.fail(FailureCause::Fatal));
        tracker.advance();
        assert!(tracker.fail(FailureCause::Fatal));
        assert_eq!(tracker.current(), PipelineState::Failed);
        assert_eq!(tracker.advance(), None);

        assert!(!PipelineState::VisualsInProgress.can_fail(FailureCause::Fatal));
        assert!(!PipelineState::AnalysisInProgress.can_fail(FailureCause::Fatal));
        assert!(PipelineState::IntegrationInProgress.can_fail(FailureCause::Fatal));
    }

    #[test]
    fn test_cancellation_from_any_live_state() {
        assert!(PipelineState::VisualsDone.can_fail(FailureCause::Cancelled));
        assert!(PipelineState::Idle.can_fail(FailureCause::Cancelled));
        assert!(!PipelineState::Completed.can_fail(FailureCause::Cancelled));
        assert!(!PipelineState::Failed.can_fail(FailureCause::Cancelled));
    }

    #[test]
    fn test_display() {
        assert_eq!(PipelineState::AnalysisInProgress.to_string(), "analysis_in_progress");
    }
}
