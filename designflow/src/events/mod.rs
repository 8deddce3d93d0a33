//! Status publication for pipeline agents.
//!
//! This module provides:
//! - The [`StatusSink`] trait and its implementations (no-op, logging,
//!   collecting, channel-backed, callback-backed)
//! - The [`StatusBus`], which owns the per-agent status map for one run and
//!   enforces forward-only transitions

mod bus;
mod sink;

pub use bus::{StatusBus, StatusTransitionError};
pub use sink::{
    ChannelStatusSink, CollectingStatusSink, FnStatusSink, LoggingStatusSink, NoOpStatusSink,
    StatusSink, StatusStream,
};
