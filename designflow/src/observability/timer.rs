//! Wall-clock timing for stage spans.

use std::time::Instant;

/// Measures how long an agent stage ran.
#[derive(Debug)]
pub struct StageTimer {
    start: Instant,
    name: &'static str,
}

impl StageTimer {
    /// Starts timing.
    #[must_use]
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// The stage name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        crate::utils::elapsed_ms(self.start)
    }
}
