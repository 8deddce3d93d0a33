//! Visual Synthesis AI: fans every visual request out over the worker pool.

use super::{prompts, Stage, StageContext};
use crate::core::AgentId;
use crate::design::{DesignSkeleton, VisualArtifact, VisualRequest};
use crate::errors::{FatalReason, FatalStageError, PipelineError};
use crate::generator::generate_image_uri;
use crate::pool::{PoolStats, WorkerPool};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Synthesizes every visual request of every design.
///
/// Requests are flattened across designs and run with at most
/// `visual_concurrency` in flight. A failed, timed-out or cancelled request
/// settles as its kind's placeholder; the output has one artifact per
/// request, in request order.
#[derive(Debug, Default, Clone, Copy)]
pub struct VisualSynthesisStage;

fn flatten(designs: &[DesignSkeleton]) -> Vec<(&VisualRequest, &DesignSkeleton)> {
    designs
        .iter()
        .flat_map(|design| design.visual_requests.iter().map(move |r| (r, design)))
        .collect()
}

#[async_trait]
impl Stage for VisualSynthesisStage {
    type Input = Arc<Vec<DesignSkeleton>>;
    type Output = Vec<VisualArtifact>;

    fn agent(&self) -> AgentId {
        AgentId::VisualSynthesis
    }

    fn start_message(&self, input: &Arc<Vec<DesignSkeleton>>) -> String {
        let total: usize = input.iter().map(|d| d.visual_requests.len()).sum();
        format!("Initiating synthesis for {total} assets...")
    }

    fn summary(&self, output: &Vec<VisualArtifact>) -> String {
        if output.is_empty() {
            return "No assets requested.".to_string();
        }
        let degraded = output.iter().filter(|a| a.asset.is_placeholder()).count();
        if degraded == 0 {
            format!("All {} visual assets synthesized.", output.len())
        } else {
            format!(
                "{} of {} visual assets synthesized; {degraded} replaced with placeholders.",
                output.len() - degraded,
                output.len()
            )
        }
    }

    async fn execute(
        &self,
        designs: Arc<Vec<DesignSkeleton>>,
        ctx: &StageContext,
    ) -> Result<Vec<VisualArtifact>, PipelineError> {
        if designs.is_empty() {
            return Err(FatalStageError::new(
                AgentId::VisualSynthesis,
                FatalReason::NoInput,
                "no designs to visualize",
            )
            .into());
        }

        let items = flatten(&designs);
        let mut pool = WorkerPool::new(ctx.config.visual_concurrency)?
            .with_label("visual synthesis")
            .with_cancellation(ctx.cancel.clone());
        if let Some(limit) = ctx.config.item_timeout() {
            pool = pool.with_item_timeout(limit);
        }

        let generator = ctx.generator.as_ref();
        let outcomes = pool
            .run_with_progress(
                items.clone(),
                |(request, design)| async move {
                    generate_image_uri(generator, prompts::visual_request(request, design)).await
                },
                |done, total| {
                    ctx.progress(
                        AgentId::VisualSynthesis,
                        format!("Synthesizing asset {done} of {total}..."),
                    );
                },
            )
            .await;

        let stats = PoolStats::from_outcomes(&outcomes);
        info!(
            run_id = %ctx.run_id,
            succeeded = stats.succeeded,
            failed = stats.failed,
            timed_out = stats.timed_out,
            cancelled = stats.cancelled,
            "Visual synthesis settled"
        );

        Ok(items
            .into_iter()
            .zip(outcomes)
            .map(|((request, _), outcome)| match outcome {
                Ok(uri) => VisualArtifact::resolved(request, uri),
                Err(_) => VisualArtifact::placeholder(request),
            })
            .collect())
    }
}
