//! Per-run status bus.

use super::StatusSink;
use crate::core::{AgentId, AgentState, AgentStatus, StatusEvent};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// A status update that would move an agent backwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Illegal status transition for {agent}: {from} -> {to}")]
pub struct StatusTransitionError {
    /// The agent.
    pub agent: AgentId,
    /// Its current state.
    pub from: AgentState,
    /// The rejected state.
    pub to: AgentState,
}

#[derive(Debug)]
struct BusState {
    statuses: BTreeMap<AgentId, AgentStatus>,
    sequence: u64,
}

/// Owns the per-agent status map for one pipeline run.
///
/// Every agent starts `pending`. Stages publish transitions; the bus checks
/// that each one moves forward, overwrites the agent's status in place, and
/// forwards the event to the caller's sink. Validation, update and delivery
/// happen under one lock, so the sink observes each agent's events in
/// publication order.
pub struct StatusBus {
    sink: Arc<dyn StatusSink>,
    state: Mutex<BusState>,
}

impl StatusBus {
    /// Creates a bus with every known agent pending.
    #[must_use]
    pub fn new(sink: Arc<dyn StatusSink>) -> Self {
        let statuses = AgentId::ALL
            .iter()
            .map(|agent| (*agent, AgentStatus::pending(*agent)))
            .collect();

        Self {
            sink,
            state: Mutex::new(BusState {
                statuses,
                sequence: 0,
            }),
        }
    }

    /// Publishes a transition for an agent.
    ///
    /// Illegal transitions are rejected, logged, and not forwarded.
    pub fn publish(
        &self,
        agent: AgentId,
        next: AgentState,
        message: impl Into<String>,
    ) -> Result<StatusEvent, StatusTransitionError> {
        let mut state = self.state.lock();
        let current = state
            .statuses
            .get(&agent)
            .map_or(AgentState::Pending, |s| s.state);

        if !current.can_transition_to(next) {
            let err = StatusTransitionError {
                agent,
                from: current,
                to: next,
            };
            warn!("{}", err);
            return Err(err);
        }

        state.sequence += 1;
        let event = StatusEvent::new(agent, next, message, state.sequence);
        state.statuses.insert(agent, event.to_status());
        self.sink.try_emit(event.clone());
        Ok(event)
    }

    /// Publishes a `working` update.
    pub fn working(
        &self,
        agent: AgentId,
        message: impl Into<String>,
    ) -> Result<StatusEvent, StatusTransitionError> {
        self.publish(agent, AgentState::Working, message)
    }

    /// Publishes the terminal `complete` state.
    pub fn complete(
        &self,
        agent: AgentId,
        message: impl Into<String>,
    ) -> Result<StatusEvent, StatusTransitionError> {
        self.publish(agent, AgentState::Complete, message)
    }

    /// Publishes the terminal `error` state.
    pub fn error(
        &self,
        agent: AgentId,
        message: impl Into<String>,
    ) -> Result<StatusEvent, StatusTransitionError> {
        self.publish(agent, AgentState::Error, message)
    }

    /// Returns the current status of one agent.
    #[must_use]
    pub fn status(&self, agent: AgentId) -> AgentStatus {
        self.state
            .lock()
            .statuses
            .get(&agent)
            .cloned()
            .unwrap_or_else(|| AgentStatus::pending(agent))
    }

    /// Returns the latest status of every agent, in roster order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<AgentStatus> {
        self.state.lock().statuses.values().cloned().collect()
    }

    /// Returns the number of events published so far.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.state.lock().sequence
    }
}

impl std::fmt::Debug for StatusBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBus")
            .field("published", &self.published())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingStatusSink;

    fn bus_with_sink() -> (StatusBus, Arc<CollectingStatusSink>) {
        let sink = Arc::new(CollectingStatusSink::new());
        (StatusBus::new(sink.clone()), sink)
    }

    #[test]
    fn test_all_agents_start_pending() {
        let (bus, sink) = bus_with_sink();
        let snapshot = bus.snapshot();
        assert_eq!(snapshot.len(), AgentId::ALL.len());
        assert!(snapshot.iter().all(|s| s.state == AgentState::Pending));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_forward_progression_is_forwarded() {
        let (bus, sink) = bus_with_sink();
        bus.working(AgentId::ConceptArchitect, "thinking").unwrap();
        bus.working(AgentId::ConceptArchitect, "still thinking").unwrap();
        bus.complete(AgentId::ConceptArchitect, "done").unwrap();

        let status = bus.status(AgentId::ConceptArchitect);
        assert_eq!(status.state, AgentState::Complete);
        assert_eq!(status.message, "done");

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events.iter().map(|e| e.sequence).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let (bus, sink) = bus_with_sink();
        bus.working(AgentId::Compliance, "checking").unwrap();
        bus.error(AgentId::Compliance, "offline").unwrap();

        let err = bus.complete(AgentId::Compliance, "late").unwrap_err();
        assert_eq!(err.from, AgentState::Error);
        assert_eq!(err.to, AgentState::Complete);
        assert!(bus.working(AgentId::Compliance, "again").is_err());

        assert_eq!(bus.status(AgentId::Compliance).state, AgentState::Error);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_complete_requires_working_first() {
        let (bus, sink) = bus_with_sink();
        assert!(bus.complete(AgentId::DataIntegrator, "skipped ahead").is_err());
        assert!(bus.error(AgentId::DataIntegrator, "skipped ahead").is_err());
        assert_eq!(bus.status(AgentId::DataIntegrator).state, AgentState::Pending);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_concurrent_publishers_keep_sequence_dense() {
        let (bus, sink) = bus_with_sink();
        let bus = Arc::new(bus);

        std::thread::scope(|scope| {
            for agent in AgentId::ANALYSTS {
                let bus = bus.clone();
                scope.spawn(move || {
                    bus.working(agent, "start").unwrap();
                    for i in 0..10 {
                        bus.working(agent, format!("step {i}")).unwrap();
                    }
                    bus.complete(agent, "done").unwrap();
                });
            }
        });

        let events = sink.events();
        assert_eq!(events.len(), 4 * 12);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.sequence, i as u64 + 1);
        }
        for agent in AgentId::ANALYSTS {
            let per_agent = sink.events_for(agent);
            assert_eq!(per_agent.last().unwrap().state, AgentState::Complete);
        }
    }
}
