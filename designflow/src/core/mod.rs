//! Core status model for designflow.
//!
//! This module contains the fundamental types shared by every stage:
//! - Agent identities and their roster
//! - Agent lifecycle states and the per-agent status record
//! - Status events published on the bus

mod agent;
mod event;
mod status;

pub use agent::AgentId;
pub use event::StatusEvent;
pub use status::{AgentState, AgentStatus};
