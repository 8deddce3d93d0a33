//! Bounded worker pool with per-slot result ordering.

use crate::cancellation::CancellationToken;
use crate::errors::{ConfigurationError, ItemError, ItemErrorKind};
use futures::future::join_all;
use parking_lot::Mutex;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// The settled result of one item: its value or an error marker.
pub type ItemOutcome<R> = Result<R, ItemError>;

/// Counts of settled outcomes by class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Items that produced a value.
    pub succeeded: usize,
    /// Items whose processor returned an error.
    pub failed: usize,
    /// Items that exceeded the per-item timeout.
    pub timed_out: usize,
    /// Items never started because of cancellation.
    pub cancelled: usize,
}

impl PoolStats {
    /// Tallies a slice of outcomes.
    #[must_use]
    pub fn from_outcomes<R>(outcomes: &[ItemOutcome<R>]) -> Self {
        outcomes.iter().fold(Self::default(), |mut stats, outcome| {
            match outcome {
                Ok(_) => stats.succeeded += 1,
                Err(e) => match e.kind {
                    ItemErrorKind::Failed => stats.failed += 1,
                    ItemErrorKind::TimedOut => stats.timed_out += 1,
                    ItemErrorKind::Cancelled => stats.cancelled += 1,
                },
            }
            stats
        })
    }

    /// Total number of settled items.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.timed_out + self.cancelled
    }

    /// Number of items that did not produce a value.
    #[must_use]
    pub fn degraded(&self) -> usize {
        self.total() - self.succeeded
    }
}

/// Runs a list of items through an async processor with bounded concurrency.
///
/// Workers pull the next item from a shared cursor, so a slow item never
/// holds up an idle worker. Every input index gets exactly one output slot,
/// in input order, regardless of completion order. A failing item records an
/// [`ItemError`] in its slot and never affects any other item.
///
/// All workers are polled on the caller's task; the pool adds no threads.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    concurrency: usize,
    item_timeout: Option<Duration>,
    cancel_token: Option<Arc<CancellationToken>>,
    label: String,
}

impl WorkerPool {
    /// Creates a pool running at most `concurrency` items at once.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if `concurrency` is zero.
    pub fn new(concurrency: usize) -> Result<Self, ConfigurationError> {
        if concurrency == 0 {
            return Err(ConfigurationError::new(
                "concurrency",
                "worker pool needs at least one worker",
            ));
        }

        Ok(Self {
            concurrency,
            item_timeout: None,
            cancel_token: None,
            label: "pool".to_string(),
        })
    }

    /// Bounds each item's processing time. A timeout settles the item as
    /// [`ItemErrorKind::TimedOut`].
    #[must_use]
    pub fn with_item_timeout(mut self, item_timeout: Duration) -> Self {
        self.item_timeout = Some(item_timeout);
        self
    }

    /// Sets a token checked before each new item starts.
    #[must_use]
    pub fn with_cancellation(mut self, token: Arc<CancellationToken>) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Sets the label used in log lines.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns the configured concurrency bound.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs every item through `process` and returns one outcome per input.
    pub async fn run<T, R, E, F, Fut>(&self, items: Vec<T>, process: F) -> Vec<ItemOutcome<R>>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        self.run_with_progress(items, process, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_progress(done, total)` after every
    /// item settles.
    ///
    /// `done` increases by exactly one per call and ends at `total`. The
    /// callback is never invoked for an empty input.
    pub async fn run_with_progress<T, R, E, F, Fut, P>(
        &self,
        items: Vec<T>,
        process: F,
        on_progress: P,
    ) -> Vec<ItemOutcome<R>>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
        P: Fn(usize, usize),
    {
        self.run_with_item_progress(items, process, |_, done, total| on_progress(done, total))
            .await
    }

    /// Like [`run_with_progress`](Self::run_with_progress), also passing the
    /// input index of the item that just settled.
    pub async fn run_with_item_progress<T, R, E, F, Fut, P>(
        &self,
        items: Vec<T>,
        process: F,
        on_settled: P,
    ) -> Vec<ItemOutcome<R>>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
        P: Fn(usize, usize, usize),
    {
        let total = items.len();
        if total == 0 {
            return Vec::new();
        }

        let workers = self.concurrency.min(total);
        debug!(pool = %self.label, total, workers, "Starting worker pool");

        let cursor = Mutex::new(items.into_iter().enumerate());
        let slots: Mutex<Vec<Option<ItemOutcome<R>>>> =
            Mutex::new((0..total).map(|_| None).collect());
        let done = Mutex::new(0usize);

        let worker = |worker_id: usize| {
            let cursor = &cursor;
            let slots = &slots;
            let done = &done;
            let process = &process;
            let on_settled = &on_settled;

            async move {
                loop {
                    let next = cursor.lock().next();
                    let Some((index, item)) = next else {
                        break;
                    };

                    let outcome = self.process_one(index, item, process).await;
                    if let Err(ref e) = outcome {
                        warn!(
                            pool = %self.label,
                            worker = worker_id,
                            index,
                            kind = ?e.kind,
                            "Item failed: {}", e.message
                        );
                    }
                    slots.lock()[index] = Some(outcome);

                    let mut done = done.lock();
                    *done += 1;
                    on_settled(index, *done, total);
                }
            }
        };

        join_all((0..workers).map(worker)).await;

        slots
            .into_inner()
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| Err(ItemError::failed(index, "item never settled")))
            })
            .collect()
    }

    async fn process_one<T, R, E, F, Fut>(&self, index: usize, item: T, process: &F) -> ItemOutcome<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        if let Some(ref token) = self.cancel_token {
            if let Err(reason) = token.check() {
                return Err(ItemError::cancelled(index, reason));
            }
        }

        let result = match self.item_timeout {
            Some(limit) => match timeout(limit, process(item)).await {
                Ok(result) => result,
                Err(_) => return Err(ItemError::timed_out(index, limit.as_millis())),
            },
            None => process(item).await,
        };

        result.map_err(|e| ItemError::failed(index, e.to_string()))
    }
}
