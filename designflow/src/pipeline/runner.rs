//! Pipeline orchestration.

use super::state::{FailureCause, StateTracker};
use super::{PipelineConfig, PipelineState};
use crate::assembler::AnalysisColumns;
use crate::cancellation::CancellationToken;
use crate::design::{
    Brief, ComplianceNote, CostAnalysis, Design, FinishesSchedule, SustainabilityReport,
};
use crate::errors::{ConfigurationError, PipelineError};
use crate::events::{ChannelStatusSink, StatusBus, StatusSink, StatusStream};
use crate::generator::Generator;
use crate::stages::{
    run_stage, AnalystStage, ConceptStage, IntegrationInput, IntegrationStage, ProjectLeadStage,
    StageContext, VisualSynthesisStage,
};
use crate::utils::{elapsed_ms, generate_run_id};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

/// The outcome of one run, with its trace.
#[derive(Debug)]
pub struct PipelineReport {
    /// Identifier of the run.
    pub run_id: Uuid,
    /// Every lifecycle state visited, in order.
    pub states: Vec<PipelineState>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: f64,
    /// The designs, or the single error that ended the run.
    pub result: Result<Vec<Design>, PipelineError>,
}

impl PipelineReport {
    /// The state the run ended in.
    #[must_use]
    pub fn final_state(&self) -> PipelineState {
        self.states.last().copied().unwrap_or(PipelineState::Idle)
    }

    /// Returns true if the run completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs briefs through the agent stages.
///
/// The pipeline itself holds no per-run state; every call to
/// [`execute`](Self::execute) gets its own status bus, state trace and
/// cancellation token, so runs on one pipeline never interfere.
#[derive(Clone)]
pub struct DesignPipeline {
    generator: Arc<dyn Generator>,
    config: PipelineConfig,
}

impl DesignPipeline {
    /// Creates a pipeline after validating its configuration.
    pub fn new(
        generator: Arc<dyn Generator>,
        config: PipelineConfig,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { generator, config })
    }

    /// The pipeline's configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs a brief and returns only the result.
    pub async fn run(
        &self,
        brief: Brief,
        sink: Arc<dyn StatusSink>,
    ) -> Result<Vec<Design>, PipelineError> {
        self.execute(brief, sink).await.result
    }

    /// Runs a brief and returns the full report.
    pub async fn execute(&self, brief: Brief, sink: Arc<dyn StatusSink>) -> PipelineReport {
        self.execute_with_cancellation(brief, sink, Arc::new(CancellationToken::new()))
            .await
    }

    /// Runs a brief that the caller may cancel through `cancel`.
    pub async fn execute_with_cancellation(
        &self,
        brief: Brief,
        sink: Arc<dyn StatusSink>,
        cancel: Arc<CancellationToken>,
    ) -> PipelineReport {
        let start = Instant::now();
        let run_id = generate_run_id();
        info!(%run_id, project = %brief.project_name, "Pipeline run started");

        let ctx = StageContext {
            bus: Arc::new(StatusBus::new(sink)),
            generator: self.generator.clone(),
            config: self.config.clone(),
            cancel,
            brief: Arc::new(brief),
            run_id,
        };

        let mut states = StateTracker::new();
        let result = drive(&ctx, &mut states).await;

        match &result {
            Ok(designs) => info!(%run_id, designs = designs.len(), "Pipeline run completed"),
            Err(PipelineError::Brief(err)) => {
                warn!(%run_id, "Brief rejected: {}", err);
            }
            Err(PipelineError::Cancelled(reason)) => {
                states.fail(FailureCause::Cancelled);
                warn!(%run_id, "Pipeline run cancelled: {}", reason);
            }
            Err(err) => {
                states.fail(FailureCause::Fatal);
                warn!(%run_id, code = err.code(), "Pipeline run failed: {}", err);
            }
        }

        PipelineReport {
            run_id,
            states: states.into_history(),
            duration_ms: elapsed_ms(start),
            result,
        }
    }

    /// Spawns a run on the tokio runtime.
    ///
    /// Returns the status stream and a handle resolving to the result. The
    /// stream ends once the run finishes.
    pub fn submit(
        &self,
        brief: Brief,
    ) -> (StatusStream, JoinHandle<Result<Vec<Design>, PipelineError>>) {
        self.submit_with_cancellation(brief, Arc::new(CancellationToken::new()))
    }

    /// Like [`submit`](Self::submit), with a caller-held cancellation token.
    pub fn submit_with_cancellation(
        &self,
        brief: Brief,
        cancel: Arc<CancellationToken>,
    ) -> (StatusStream, JoinHandle<Result<Vec<Design>, PipelineError>>) {
        let (sink, stream) = ChannelStatusSink::new();
        let pipeline = self.clone();
        let handle = tokio::spawn(async move {
            pipeline
                .execute_with_cancellation(brief, Arc::new(sink), cancel)
                .await
                .result
        });
        (stream, handle)
    }
}

impl std::fmt::Debug for DesignPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn checkpoint(ctx: &StageContext) -> Result<(), PipelineError> {
    ctx.cancel.check().map_err(PipelineError::Cancelled)
}

async fn drive(ctx: &StageContext, states: &mut StateTracker) -> Result<Vec<Design>, PipelineError> {
    run_stage(&ProjectLeadStage, (), ctx).await?;
    checkpoint(ctx)?;

    states.advance();
    let skeletons = Arc::new(run_stage(&ConceptStage, (), ctx).await?);
    states.advance();
    checkpoint(ctx)?;

    states.advance();
    let artifacts = run_stage(&VisualSynthesisStage, skeletons.clone(), ctx).await?;
    states.advance();
    checkpoint(ctx)?;

    states.advance();
    let materials_stage = AnalystStage::<FinishesSchedule>::new();
    let compliance_stage = AnalystStage::<ComplianceNote>::new();
    let cost_stage = AnalystStage::<CostAnalysis>::new();
    let eco_stage = AnalystStage::<SustainabilityReport>::new();
    let (finishes, compliance, cost, sustainability) = tokio::join!(
        run_stage(&materials_stage, skeletons.clone(), ctx),
        run_stage(&compliance_stage, skeletons.clone(), ctx),
        run_stage(&cost_stage, skeletons.clone(), ctx),
        run_stage(&eco_stage, skeletons.clone(), ctx),
    );
    let analyses = AnalysisColumns {
        finishes: finishes?,
        compliance: compliance?,
        cost: cost?,
        sustainability: sustainability?,
    };
    states.advance();
    checkpoint(ctx)?;

    states.advance();
    let designs = run_stage(
        &IntegrationStage,
        IntegrationInput {
            skeletons,
            artifacts,
            analyses,
        },
        ctx,
    )
    .await?;
    states.advance();

    Ok(designs)
}
