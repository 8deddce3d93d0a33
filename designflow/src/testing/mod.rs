//! Testing utilities for designflow pipelines.
//!
//! This module provides:
//! - [`ScriptedGenerator`], a deterministic stand-in for the external generator
//! - Fixtures: a sample brief, sample skeletons and concept replies

mod fixtures;
mod scripted;

pub use fixtures::{concept_reply, sample_brief, sample_skeleton};
pub use scripted::ScriptedGenerator;
