//! Pipeline configuration, lifecycle and orchestration.
//!
//! This module provides:
//! - [`PipelineConfig`] with JSON, file and environment loading
//! - The [`PipelineState`] lifecycle and its transition rules
//! - [`DesignPipeline`], which drives a brief through every agent stage

mod config;
mod runner;
mod state;

pub use config::{PipelineConfig, ENV_PREFIX};
pub use runner::{DesignPipeline, PipelineReport};
pub use state::{FailureCause, PipelineState, StateTracker};
