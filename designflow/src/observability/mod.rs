//! Observability utilities.

mod subscriber;
mod timer;

pub use subscriber::init_tracing;
pub use timer::StageTimer;
