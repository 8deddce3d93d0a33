//! Agent lifecycle states.

use super::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of one agent during a pipeline run.
///
/// States only move forward: `Pending -> Working -> (Complete | Error)`,
/// with any number of intermediate `Working` updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// The agent has not started yet.
    #[default]
    Pending,
    /// The agent is running.
    Working,
    /// The agent finished successfully.
    Complete,
    /// The agent gave up.
    Error,
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Working => write!(f, "working"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl AgentState {
    /// Returns true if the state is final for this run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// Returns true if `next` is a legal successor of this state.
    ///
    /// `Working -> Working` is allowed so stages can report progress.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Working)
                | (Self::Working, Self::Working | Self::Complete | Self::Error)
        )
    }
}

/// The current status of one agent. Overwritten in place on every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    /// The agent.
    pub agent: AgentId,
    /// Current state.
    pub state: AgentState,
    /// Latest message.
    pub message: String,
}

impl AgentStatus {
    /// Creates the initial pending status for an agent.
    #[must_use]
    pub fn pending(agent: AgentId) -> Self {
        Self {
            agent,
            state: AgentState::Pending,
            message: String::new(),
        }
    }

    /// Returns the agent's role description.
    #[must_use]
    pub fn role(&self) -> &'static str {
        self.agent.role()
    }
}
