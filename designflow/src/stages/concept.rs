//! Concept Architect: the one stage whose failure ends the run.

use super::{prompts, Stage, StageContext};
use crate::contracts::{parse_concept_reply, ValidationError};
use crate::core::AgentId;
use crate::design::DesignSkeleton;
use crate::errors::{FatalReason, FatalStageError, PipelineError};
use crate::generator::{generate_text, GeneratorError};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::debug;

/// Produces the design skeletons.
///
/// Any failure here (no reply, unparseable reply, zero skeletons, timeout)
/// is a [`FatalStageError`]: every later stage depends on the skeletons.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConceptStage;

impl ConceptStage {
    fn fatal(reason: FatalReason, message: impl Into<String>) -> PipelineError {
        FatalStageError::new(AgentId::ConceptArchitect, reason, message).into()
    }
}

#[async_trait]
impl Stage for ConceptStage {
    type Input = ();
    type Output = Vec<DesignSkeleton>;

    fn agent(&self) -> AgentId {
        AgentId::ConceptArchitect
    }

    fn start_message(&self, _input: &()) -> String {
        "Drafting design concepts from the brief...".to_string()
    }

    fn summary(&self, output: &Vec<DesignSkeleton>) -> String {
        format!(
            "Conceptual framework complete: {} design(s). Transmitting blueprints to visualization.",
            output.len()
        )
    }

    async fn execute(&self, _input: (), ctx: &StageContext) -> Result<Vec<DesignSkeleton>, PipelineError> {
        let request = prompts::concept_request(&ctx.brief);
        let call = generate_text(ctx.generator.as_ref(), request);

        let reply = match ctx.config.concept_timeout() {
            Some(limit) => timeout(limit, call).await.map_err(|_| {
                Self::fatal(
                    FatalReason::TimedOut,
                    format!("no reply after {}ms", limit.as_millis()),
                )
            })?,
            None => call.await,
        };

        let text = reply.map_err(|err| match err {
            GeneratorError::EmptyResponse => Self::fatal(FatalReason::EmptyOutput, err.to_string()),
            other => Self::fatal(FatalReason::GeneratorFailed, other.to_string()),
        })?;

        let skeletons = parse_concept_reply(&text, &ctx.brief).map_err(|err| match err {
            ValidationError::Empty => {
                Self::fatal(FatalReason::EmptyOutput, "the reply contained no design skeletons")
            }
            other => Self::fatal(FatalReason::Unparseable, other.to_string()),
        })?;

        debug!(
            run_id = %ctx.run_id,
            designs = skeletons.len(),
            requests = skeletons.iter().map(|s| s.visual_requests.len()).sum::<usize>(),
            "Parsed concept skeletons"
        );
        Ok(skeletons)
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
    use crate::testing::{concept_reply, ScriptedGenerator};
    use std::time::Duration;

    fn reason_of(err: PipelineError) -> FatalReason {
        match err {
            PipelineError::FatalStage(fatal) => fatal.reason,
            other => panic!("expected fatal stage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_skeletons_parsed_and_enriched() {
        let generator = ScriptedGenerator::new().with_text(GenerationTask::Concept, concept_reply(2, 3));
        let (ctx, _sink) = context(generator, PipelineConfig::default());

        let skeletons = run_stage(&ConceptStage, (), &ctx).await.unwrap();
        assert_eq!(skeletons.len(), 2);
        assert_eq!(skeletons[1].visual_requests.len(), 3);
        assert_eq!(skeletons[0].dimensions, Some(ctx.brief.dimensions));
        assert_eq!(ctx.bus.status(AgentId::ConceptArchitect).state, AgentState::Complete);
    }

    #[tokio::test]
    async fn test_empty_list_is_fatal() {
        let generator = ScriptedGenerator::new().with_text(GenerationTask::Concept, "[]");
        let (ctx, _sink) = context(generator, PipelineConfig::default());

        let err = run_stage(&ConceptStage, (), &ctx).await.unwrap_err();
        assert_eq!(reason_of(err), FatalReason::EmptyOutput);
        assert_eq!(ctx.bus.status(AgentId::ConceptArchitect).state, AgentState::Error);
    }

    #[tokio::test]
    async fn test_garbage_is_unparseable() {
        let generator = ScriptedGenerator::new().with_text(GenerationTask::Concept, "sorry, no");
        let (ctx, _sink) = context(generator, PipelineConfig::default());
        let err = run_stage(&ConceptStage, (), &ctx).await.unwrap_err();
        assert_eq!(reason_of(err), FatalReason::Unparseable);
    }

    #[tokio::test]
    async fn test_generator_failure_is_fatal() {
        let generator = ScriptedGenerator::new().failing(GenerationTask::Concept);
        let (ctx, _sink) = context(generator, PipelineConfig::default());
        let err = run_stage(&ConceptStage, (), &ctx).await.unwrap_err();
        assert_eq!(reason_of(err), FatalReason::GeneratorFailed);
    }

    #[tokio::test]
    async fn test_timeout_is_fatal() {
        let generator = ScriptedGenerator::new()
            .with_text(GenerationTask::Concept, concept_reply(1, 1))
            .with_latency(Duration::from_millis(200));
        let config = PipelineConfig::default().with_concept_timeout(Duration::from_millis(20));
        let (ctx, _sink) = context(generator, config);

        let err = run_stage(&ConceptStage, (), &ctx).await.unwrap_err();
        assert_eq!(reason_of(err), FatalReason::TimedOut);
    }

    #[tokio::test]
    async fn test_item_timeout_applies_without_concept_timeout() {
        let generator = ScriptedGenerator::new()
            .with_text(GenerationTask::Concept, concept_reply(1, 1))
            .with_latency(Duration::from_millis(200));
        let config = PipelineConfig::default().with_item_timeout(Duration::from_millis(20));
        let (ctx, _sink) = context(generator, config);

        let err = run_stage(&ConceptStage, (), &ctx).await.unwrap_err();
        assert_eq!(reason_of(err), FatalReason::TimedOut);
    }
}
