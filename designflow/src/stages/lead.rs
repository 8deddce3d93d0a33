//! Project Lead: structural checks on the brief.

use super::{Stage, StageContext};
use crate::core::AgentId;
use crate::errors::PipelineError;
use async_trait::async_trait;

/// Checks that the brief is complete enough to design from.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectLeadStage;

#[async_trait]
impl Stage for ProjectLeadStage {
    type Input = ();
    type Output = ();

    fn agent(&self) -> AgentId {
        AgentId::ProjectLead
    }

    fn start_message(&self, _input: &()) -> String {
        "Reviewing the project brief...".to_string()
    }

    fn summary(&self, _output: &()) -> String {
        "Brief accepted. Handing over to the Concept Architect.".to_string()
    }

    async fn execute(&self, _input: (), ctx: &StageContext) -> Result<(), PipelineError> {
        ctx.brief.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AgentState;
    use crate::pipeline::PipelineConfig;
    use crate::stages::run_stage;
    use crate::stages::test_support::context;
    use crate::testing::ScriptedGenerator;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_valid_brief_completes() {
        let (ctx, sink) = context(ScriptedGenerator::new(), PipelineConfig::default());
        run_stage(&ProjectLeadStage, (), &ctx).await.unwrap();
        assert_eq!(ctx.bus.status(AgentId::ProjectLead).state, AgentState::Complete);
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn test_incomplete_brief_is_precondition_error() {
        let (mut ctx, _sink) = context(ScriptedGenerator::new(), PipelineConfig::default());
        let mut brief = (*ctx.brief).clone();
        brief.sub_spaces.clear();
        ctx.brief = Arc::new(brief);

        let err = run_stage(&ProjectLeadStage, (), &ctx).await.unwrap_err();
        assert!(matches!(err, PipelineError::Brief(_)));
        assert_eq!(ctx.bus.status(AgentId::ProjectLead).state, AgentState::Error);
    }
}
