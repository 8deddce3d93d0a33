//! Cooperative cancellation for pipeline runs.
//!
//! Cancellation never interrupts a unit of work that is already in flight;
//! it only stops new items from starting and stops the pipeline between
//! stages.

mod token;

pub use token::CancellationToken;
