//! Agent stages.
//!
//! Each stage belongs to one agent, consumes the previous stage's output and
//! produces its own. [`run_stage`] wraps every execution with the agent's
//! `working` → `complete`/`error` status updates.

mod analysis;
mod concept;
mod integration;
mod lead;
pub mod prompts;
mod visuals;

pub use analysis::AnalystStage;
pub use concept::ConceptStage;
pub use integration::{IntegrationInput, IntegrationStage};
pub use lead::ProjectLeadStage;
pub use visuals::VisualSynthesisStage;

use crate::cancellation::CancellationToken;
use crate::core::AgentId;
use crate::design::Brief;
use crate::errors::PipelineError;
use crate::events::StatusBus;
use crate::generator::Generator;
use crate::observability::StageTimer;
use crate::pipeline::PipelineConfig;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Everything a stage needs besides its input.
#[derive(Clone)]
pub struct StageContext {
    /// The run's status bus.
    pub bus: Arc<StatusBus>,
    /// The generator seam.
    pub generator: Arc<dyn Generator>,
    /// Pipeline settings.
    pub config: PipelineConfig,
    /// Token checked by pools and between stages.
    pub cancel: Arc<CancellationToken>,
    /// The brief being processed.
    pub brief: Arc<Brief>,
    /// Identifier of the run.
    pub run_id: Uuid,
}

impl StageContext {
    /// Publishes a `working` update for an agent.
    ///
    /// Returns false if the bus rejected the update, which happens once the
    /// agent has settled.
    pub fn progress(&self, agent: AgentId, message: impl Into<String>) -> bool {
        match self.bus.working(agent, message) {
            Ok(_) => true,
            Err(e) => {
                debug!(run_id = %self.run_id, %agent, "Progress update dropped: {}", e);
                false
            }
        }
    }
}

impl Debug for StageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageContext")
            .field("run_id", &self.run_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// One agent's unit of work in the pipeline.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// What the stage consumes.
    type Input: Send;
    /// What the stage produces.
    type Output: Send;

    /// The agent this stage reports as.
    fn agent(&self) -> AgentId;

    /// Message for the initial `working` update.
    fn start_message(&self, input: &Self::Input) -> String;

    /// Message for the terminal `complete` update.
    fn summary(&self, output: &Self::Output) -> String;

    /// Runs the stage.
    async fn execute(&self, input: Self::Input, ctx: &StageContext) -> Result<Self::Output, PipelineError>;
}

/// Runs a stage between its `working` and terminal status updates.
pub async fn run_stage<S: Stage>(
    stage: &S,
    input: S::Input,
    ctx: &StageContext,
) -> Result<S::Output, PipelineError> {
    let agent = stage.agent();
    let timer = StageTimer::start(agent.name());
    ctx.progress(agent, stage.start_message(&input));

    match stage.execute(input, ctx).await {
        Ok(output) => {
            let summary = stage.summary(&output);
            info!(
                run_id = %ctx.run_id,
                agent = %agent,
                duration_ms = timer.elapsed_ms(),
                "{}", summary
            );
            let _ = ctx.bus.complete(agent, summary);
            Ok(output)
        }
        Err(err) => {
            warn!(
                run_id = %ctx.run_id,
                agent = %agent,
                duration_ms = timer.elapsed_ms(),
                code = err.code(),
                "Stage failed: {}", err
            );
            let _ = ctx.bus.error(agent, err.to_string());
            Err(err)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::events::CollectingStatusSink;
    use crate::testing::{sample_brief, ScriptedGenerator};

    /// A context over a scripted generator with a collecting sink.
    pub fn context(
        generator: ScriptedGenerator,
        config: PipelineConfig,
    ) -> (StageContext, Arc<CollectingStatusSink>) {
        let sink = Arc::new(CollectingStatusSink::new());
        let ctx = StageContext {
            bus: Arc::new(StatusBus::new(sink.clone())),
            generator: Arc::new(generator),
            config,
            cancel: Arc::new(CancellationToken::new()),
            brief: Arc::new(sample_brief()),
            run_id: crate::utils::generate_run_id(),
        };
        (ctx, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::context;
    use super::*;
    use crate::core::AgentState;
    use crate::errors::BriefError;
    use crate::testing::ScriptedGenerator;

    #[derive(Debug)]
    struct EchoStage {
        fail: bool,
    }

    #[async_trait]
    impl Stage for EchoStage {
        type Input = u32;
        type Output = u32;

        fn agent(&self) -> AgentId {
            AgentId::DataIntegrator
        }

        fn start_message(&self, input: &u32) -> String {
            format!("echoing {input}")
        }

        fn summary(&self, output: &u32) -> String {
            format!("echoed {output}")
        }

        async fn execute(&self, input: u32, _ctx: &StageContext) -> Result<u32, PipelineError> {
            if self.fail {
                Err(BriefError::NoSubSpaces.into())
            } else {
                Ok(input)
            }
        }
    }

    #[tokio::test]
    async fn test_run_stage_reports_working_then_complete() {
        let (ctx, sink) = context(ScriptedGenerator::new(), PipelineConfig::default());
        let out = run_stage(&EchoStage { fail: false }, 7, &ctx).await.unwrap();
        assert_eq!(out, 7);

        let events = sink.events_for(AgentId::DataIntegrator);
        let states: Vec<_> = events.iter().map(|e| e.state).collect();
        assert_eq!(states, vec![AgentState::Working, AgentState::Complete]);
        assert_eq!(events[1].message, "echoed 7");
    }

    #[tokio::test]
    async fn test_run_stage_reports_error() {
        let (ctx, sink) = context(ScriptedGenerator::new(), PipelineConfig::default());
        let err = run_stage(&EchoStage { fail: true }, 7, &ctx).await.unwrap_err();
        assert_eq!(err.code(), "BRIEF_PRECONDITION");

        let last = sink.events_for(AgentId::DataIntegrator).pop().unwrap();
        assert_eq!(last.state, AgentState::Error);
    }

    #[tokio::test]
    async fn test_progress_after_settling_is_dropped() {
        let (ctx, sink) = context(ScriptedGenerator::new(), PipelineConfig::default());
        assert!(ctx.progress(AgentId::DataIntegrator, "halfway"));
        run_stage(&EchoStage { fail: false }, 1, &ctx).await.unwrap();

        assert!(!ctx.progress(AgentId::DataIntegrator, "late"));
        let last = sink.events_for(AgentId::DataIntegrator).pop().unwrap();
        assert_eq!(last.state, AgentState::Complete);
    }
}
