//! Bounded-concurrency execution of independent units of work.

mod worker_pool;

pub use worker_pool::{ItemOutcome, PoolStats, WorkerPool};
