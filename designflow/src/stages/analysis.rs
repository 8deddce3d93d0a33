//! The four analyst agents.
//!
//! Every analyst runs over all designs at once, and the pipeline runs the
//! four analysts concurrently, so all per-design analysis calls are in
//! flight together. A failed call leaves that design's field absent.

use super::{prompts, Stage, StageContext};
use crate::contracts::ReplyContract;
use crate::core::AgentId;
use crate::design::{
    Brief, ComplianceNote, CostAnalysis, DesignSkeleton, FinishesSchedule, SustainabilityReport,
};
use crate::errors::PipelineError;
use crate::generator::{generate_text, GenerationRequest};
use crate::pool::{PoolStats, WorkerPool};
use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// An analysis result type and the agent that produces it.
pub trait Analysis: ReplyContract + fmt::Debug + Send + Sync + 'static {
    /// The producing agent.
    const AGENT: AgentId;
    /// Initial `working` message.
    const START: &'static str;
    /// Terminal `complete` message.
    const DONE: &'static str;

    /// Builds the generator call for one design.
    fn request(design: &DesignSkeleton, brief: &Brief) -> GenerationRequest;
}

impl Analysis for FinishesSchedule {
    const AGENT: AgentId = AgentId::MaterialsSpecialist;
    const START: &'static str = "Initiating materials and finishes analysis...";
    const DONE: &'static str = "All finishes schedules are complete.";

    fn request(design: &DesignSkeleton, _brief: &Brief) -> GenerationRequest {
        prompts::finishes_request(design)
    }
}

impl Analysis for ComplianceNote {
    const AGENT: AgentId = AgentId::Compliance;
    const START: &'static str = "Initiating regulatory compliance review...";
    const DONE: &'static str = "Regulatory compliance audit complete.";

    fn request(design: &DesignSkeleton, brief: &Brief) -> GenerationRequest {
        prompts::compliance_request(design, brief)
    }
}

impl Analysis for CostAnalysis {
    const AGENT: AgentId = AgentId::CostEstimator;
    const START: &'static str = "Calculating preliminary cost estimates...";
    const DONE: &'static str = "All project costs estimated.";

    fn request(design: &DesignSkeleton, brief: &Brief) -> GenerationRequest {
        prompts::cost_request(design, brief)
    }
}

impl Analysis for SustainabilityReport {
    const AGENT: AgentId = AgentId::EcoAnalyst;
    const START: &'static str = "Assessing environmental impact...";
    const DONE: &'static str = "Sustainability analysis complete.";

    fn request(design: &DesignSkeleton, brief: &Brief) -> GenerationRequest {
        prompts::sustainability_request(design, brief)
    }
}

/// Runs one analysis for every design.
///
/// The output has one slot per design, in design order.
pub struct AnalystStage<A> {
    _analysis: PhantomData<fn() -> A>,
}

impl<A: Analysis> AnalystStage<A> {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _analysis: PhantomData,
        }
    }
}

impl<A: Analysis> Default for AnalystStage<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Analysis> fmt::Debug for AnalystStage<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalystStage")
            .field("agent", &A::AGENT)
            .finish()
    }
}

#[async_trait]
impl<A: Analysis> Stage for AnalystStage<A> {
    type Input = Arc<Vec<DesignSkeleton>>;
    type Output = Vec<Option<A>>;

    fn agent(&self) -> AgentId {
        A::AGENT
    }

    fn start_message(&self, _input: &Arc<Vec<DesignSkeleton>>) -> String {
        A::START.to_string()
    }

    fn summary(&self, output: &Vec<Option<A>>) -> String {
        let available = output.iter().filter(|r| r.is_some()).count();
        if available == output.len() {
            A::DONE.to_string()
        } else {
            format!("{} ({available} of {} available)", A::DONE, output.len())
        }
    }

    async fn execute(
        &self,
        designs: Arc<Vec<DesignSkeleton>>,
        ctx: &StageContext,
    ) -> Result<Vec<Option<A>>, PipelineError> {
        if designs.is_empty() {
            return Ok(Vec::new());
        }

        let mut pool = WorkerPool::new(designs.len())?
            .with_label(A::NAME)
            .with_cancellation(ctx.cancel.clone());
        if let Some(limit) = ctx.config.item_timeout() {
            pool = pool.with_item_timeout(limit);
        }

        let generator = ctx.generator.as_ref();
        let brief = ctx.brief.as_ref();
        let outcomes = pool
            .run_with_item_progress(
                designs.iter().collect::<Vec<_>>(),
                |design| async move {
                    let text = generate_text(generator, A::request(design, brief)).await?;
                    anyhow::Ok(A::parse_reply(&text)?)
                },
                |index, done, total| {
                    ctx.progress(
                        A::AGENT,
                        format!(
                            "{} finished for '{}' ({done} of {total} designs).",
                            A::NAME,
                            designs[index].title
                        ),
                    );
                },
            )
            .await;

        let stats = PoolStats::from_outcomes(&outcomes);
        debug!(
            run_id = %ctx.run_id,
            analysis = A::NAME,
            succeeded = stats.succeeded,
            degraded = stats.degraded(),
            "Analysis settled"
        );

        Ok(outcomes.into_iter().map(Result::ok).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AgentState;
    use crate::generator::GenerationTask;
    use crate::pipeline::PipelineConfig;
    use crate::stages::run_stage;
    use crate::stages::test_support::context;
    use crate::testing::{sample_skeleton, ScriptedGenerator};

    fn designs(n: usize) -> Arc<Vec<DesignSkeleton>> {
        Arc::new((0..n).map(|i| sample_skeleton(i, 2)).collect())
    }

    #[tokio::test]
    async fn test_one_working_update_per_design_then_complete() {
        let (ctx, sink) = context(ScriptedGenerator::new(), PipelineConfig::default());
        let out = run_stage(&AnalystStage::<CostAnalysis>::new(), designs(3), &ctx)
            .await
            .unwrap();

        assert_eq!(out.len(), 3);
        assert!(out.iter().all(Option::is_some));

        let events = sink.events_for(AgentId::CostEstimator);
        let states: Vec<_> = events.iter().map(|e| e.state).collect();
        assert_eq!(
            states,
            vec![
                AgentState::Working,
                AgentState::Working,
                AgentState::Working,
                AgentState::Working,
                AgentState::Complete,
            ]
        );
        assert_eq!(events.last().unwrap().message, CostAnalysis::DONE);

        let mut progress: Vec<_> = events[1..4].iter().map(|e| e.message.clone()).collect();
        progress.sort();
        for (i, message) in progress.iter().enumerate() {
            assert!(message.contains(&format!("'Design {i}'")), "{message}");
        }
    }

    #[tokio::test]
    async fn test_invalid_reply_leaves_field_absent() {
        let generator = ScriptedGenerator::new()
            .with_text(GenerationTask::Sustainability, r#"{"overallScore": 400}"#);
        let (ctx, _sink) = context(generator, PipelineConfig::default());

        let out = run_stage(&AnalystStage::<SustainabilityReport>::new(), designs(2), &ctx)
            .await
            .unwrap();
        assert_eq!(out, vec![None, None]);
        assert_eq!(ctx.bus.status(AgentId::EcoAnalyst).state, AgentState::Complete);
    }

    #[tokio::test]
    async fn test_single_design_failure_is_isolated() {
        let generator = ScriptedGenerator::new().failing_prompt("Design 1");
        let (ctx, _sink) = context(generator, PipelineConfig::default());

        let out = run_stage(&AnalystStage::<ComplianceNote>::new(), designs(3), &ctx)
            .await
            .unwrap();
        assert!(out[0].is_some());
        assert!(out[1].is_none());
        assert!(out[2].is_some());
    }

    #[tokio::test]
    async fn test_finishes_schedule_parsed() {
        let (ctx, _sink) = context(ScriptedGenerator::new(), PipelineConfig::default());
        let out = run_stage(&AnalystStage::<FinishesSchedule>::new(), designs(1), &ctx)
            .await
            .unwrap();
        assert!(out[0].as_ref().is_some_and(|s| !s.is_empty()));
    }
}
