//! Status sink trait and implementations.

use crate::core::{AgentId, StatusEvent};
use futures::channel::mpsc;
use futures::Stream;
use parking_lot::RwLock;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, info, Level};

/// Trait for subscribers that receive status events.
///
/// The bus calls [`try_emit`](StatusSink::try_emit) synchronously at every
/// transition, so implementations must return quickly and never block.
pub trait StatusSink: Send + Sync {
    /// Delivers an event without blocking.
    ///
    /// Delivery failures are logged and suppressed.
    fn try_emit(&self, event: StatusEvent);
}

/// A sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStatusSink;

impl StatusSink for NoOpStatusSink {
    fn try_emit(&self, _event: StatusEvent) {}
}

/// A sink that logs events through `tracing`.
#[derive(Debug, Clone)]
pub struct LoggingStatusSink {
    level: Level,
}

impl Default for LoggingStatusSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingStatusSink {
    /// Creates a logging sink with the given level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event: &StatusEvent) {
        if self.level == Level::DEBUG {
            debug!(
                agent = %event.agent,
                state = %event.state,
                sequence = event.sequence,
                "{}", event.message
            );
        } else {
            info!(
                agent = %event.agent,
                state = %event.state,
                sequence = event.sequence,
                "{}", event.message
            );
        }
    }
}

impl StatusSink for LoggingStatusSink {
    fn try_emit(&self, event: StatusEvent) {
        self.log_event(&event);
    }
}

/// A sink that records every event, for tests and replay.
#[derive(Debug, Default)]
pub struct CollectingStatusSink {
    events: RwLock<Vec<StatusEvent>>,
}

impl CollectingStatusSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events in publication order.
    #[must_use]
    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.read().clone()
    }

    /// Returns the events of one agent in publication order.
    #[must_use]
    pub fn events_for(&self, agent: AgentId) -> Vec<StatusEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.agent == agent)
            .cloned()
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl StatusSink for CollectingStatusSink {
    fn try_emit(&self, event: StatusEvent) {
        self.events.write().push(event);
    }
}

/// A sink that forwards events into an unbounded channel.
///
/// Pair it with the [`StatusStream`] returned by [`ChannelStatusSink::new`].
/// The stream ends once every sender clone has been dropped.
#[derive(Debug, Clone)]
pub struct ChannelStatusSink {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl ChannelStatusSink {
    /// Creates a sink and the stream that receives its events.
    #[must_use]
    pub fn new() -> (Self, StatusStream) {
        let (tx, rx) = mpsc::unbounded();
        (Self { tx }, StatusStream { rx })
    }

    fn send(&self, event: StatusEvent) {
        if let Err(e) = self.tx.unbounded_send(event) {
            debug!("Status subscriber is gone, dropping event: {}", e.into_inner().message);
        }
    }
}

impl StatusSink for ChannelStatusSink {
    fn try_emit(&self, event: StatusEvent) {
        self.send(event);
    }
}

/// Stream of status events fed by a [`ChannelStatusSink`].
#[derive(Debug)]
pub struct StatusStream {
    rx: mpsc::UnboundedReceiver<StatusEvent>,
}

impl Stream for StatusStream {
    type Item = StatusEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().rx).poll_next(cx)
    }
}

/// A sink that hands every event to a caller-supplied callback.
pub struct FnStatusSink<F>
where
    F: Fn(&StatusEvent) + Send + Sync,
{
    callback: F,
}

impl<F> FnStatusSink<F>
where
    F: Fn(&StatusEvent) + Send + Sync,
{
    /// Wraps a callback as a sink.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> std::fmt::Debug for FnStatusSink<F>
where
    F: Fn(&StatusEvent) + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStatusSink").finish_non_exhaustive()
    }
}

impl<F> StatusSink for FnStatusSink<F>
where
    F: Fn(&StatusEvent) + Send + Sync,
{
    fn try_emit(&self, event: StatusEvent) {
        (self.callback)(&event);
    }
}
