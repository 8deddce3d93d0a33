//! # Designflow
//!
//! Orchestration core for a multi-agent generative design pipeline.
//!
//! A validated [`Brief`](design::Brief) flows through a fixed sequence of
//! agent stages:
//!
//! - **Project Lead**: structural checks on the brief
//! - **Concept Architect**: produces design skeletons (fatal on failure)
//! - **Visual Synthesis AI**: fans out every visual request over a bounded
//!   worker pool
//! - **Materials / Compliance / Cost / Eco-Analyst**: four analysis stages run
//!   concurrently for every design
//! - **Data Integrator**: assembles the final [`Design`](design::Design) list
//!
//! Every call to the outside world goes through the opaque
//! [`Generator`](generator::Generator) seam. Progress is published per agent
//! on a [`StatusBus`](events::StatusBus).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use designflow::prelude::*;
//!
//! let session = DesignSession::new(generator, PipelineConfig::default())?;
//! let (mut statuses, handle) = session.submit_brief(brief);
//!
//! while let Some(event) = statuses.next().await {
//!     println!("{}: {}", event.agent, event.message);
//! }
//! let designs = handle.await??;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod assembler;
pub mod cancellation;
pub mod contracts;
pub mod core;
pub mod design;
pub mod errors;
pub mod events;
pub mod generator;
pub mod observability;
pub mod pipeline;
pub mod pool;
pub mod session;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assembler::ResultAssembler;
    pub use crate::cancellation::CancellationToken;
    pub use crate::core::{AgentId, AgentState, AgentStatus, StatusEvent};
    pub use crate::design::{
        AnalysisResults, AssetRef, Brief, ComplianceNote, CostAnalysis, Design,
        DesignSkeleton, Dimensions, FinishesSchedule, FlatConfiguration,
        SustainabilityReport, VisualArtifact, VisualKind, VisualRequest,
    };
    pub use crate::errors::{
        BriefError, ConfigurationError, FatalStageError, ItemError, PipelineError,
    };
    pub use crate::events::{
        ChannelStatusSink, LoggingStatusSink, NoOpStatusSink, StatusBus, StatusSink,
        StatusStream,
    };
    pub use crate::generator::{GeneratedArtifact, GenerationRequest, Generator};
    pub use crate::pipeline::{DesignPipeline, PipelineConfig, PipelineReport, PipelineState};
    pub use crate::pool::WorkerPool;
    pub use crate::session::DesignSession;
    pub use futures::StreamExt;
}
