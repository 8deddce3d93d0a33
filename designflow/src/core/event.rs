//! Status events published by stages.

use super::{AgentId, AgentState, AgentStatus};
use serde::{Deserialize, Serialize};

/// A transient status transition for one agent.
///
/// Events are emitted by the [`StatusBus`](crate::events::StatusBus) and
/// consumed by the subscriber; the core does not retain them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// The agent reporting.
    pub agent: AgentId,
    /// The new state.
    pub state: AgentState,
    /// Human-readable message.
    pub message: String,
    /// Bus-wide sequence number, starting at 1.
    pub sequence: u64,
    /// When the event was published (ISO 8601).
    pub timestamp: String,
}

impl StatusEvent {
    /// Creates a new status event.
    #[must_use]
    pub fn new(agent: AgentId, state: AgentState, message: impl Into<String>, sequence: u64) -> Self {
        Self {
            agent,
            state,
            message: message.into(),
            sequence,
            timestamp: crate::utils::iso_timestamp(),
        }
    }

    /// Converts the event into the agent's status record.
    #[must_use]
    pub fn to_status(&self) -> AgentStatus {
        AgentStatus {
            agent: self.agent,
            state: self.state,
            message: self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_to_status() {
        let event = StatusEvent::new(AgentId::DataIntegrator, AgentState::Working, "assembling", 7);
        let status = event.to_status();
        assert_eq!(status.agent, AgentId::DataIntegrator);
        assert_eq!(status.state, AgentState::Working);
        assert_eq!(status.message, "assembling");
        assert_eq!(event.sequence, 7);
        assert!(event.timestamp.contains('T'));
    }

    #[test]
    fn test_event_serialization() {
        let event = StatusEvent::new(AgentId::ProjectLead, AgentState::Complete, "done", 1);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["agent"], "project_lead");
        assert_eq!(json["state"], "complete");
    }
}
