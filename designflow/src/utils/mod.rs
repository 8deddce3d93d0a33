//! Utility functions for run identifiers and timestamps.

mod timestamps;

pub use timestamps::{elapsed_ms, iso_timestamp};

use uuid::Uuid;

/// Generates a time-ordered identifier for a pipeline run.
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_v7_and_distinct() {
        let a = generate_run_id();
        let b = generate_run_id();
        assert_eq!(a.get_version_num(), 7);
        assert_ne!(a, b);
    }
}
