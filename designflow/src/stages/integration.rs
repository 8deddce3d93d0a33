//! Data Integrator: assembles the final designs.

use super::{Stage, StageContext};
use crate::assembler::{AnalysisColumns, ResultAssembler};
use crate::core::AgentId;
use crate::design::{Design, DesignSkeleton, VisualArtifact};
use crate::errors::PipelineError;
use async_trait::async_trait;
use std::sync::Arc;

/// Everything the integrator folds together.
#[derive(Debug, Clone)]
pub struct IntegrationInput {
    /// Concept skeletons.
    pub skeletons: Arc<Vec<DesignSkeleton>>,
    /// Settled visual artifacts, in request order.
    pub artifacts: Vec<VisualArtifact>,
    /// Analysis results per design.
    pub analyses: AnalysisColumns,
}

/// Runs the [`ResultAssembler`].
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegrationStage;

#[async_trait]
impl Stage for IntegrationStage {
    type Input = IntegrationInput;
    type Output = Vec<Design>;

    fn agent(&self) -> AgentId {
        AgentId::DataIntegrator
    }

    fn start_message(&self, _input: &IntegrationInput) -> String {
        "Consolidating architectural, visual and material data...".to_string()
    }

    fn summary(&self, output: &Vec<Design>) -> String {
        format!("{} project package(s) integrated and ready for review.", output.len())
    }

    async fn execute(&self, input: IntegrationInput, _ctx: &StageContext) -> Result<Vec<Design>, PipelineError> {
        Ok(ResultAssembler::assemble(
            &input.skeletons,
            input.artifacts,
            input.analyses,
        )?)
    }
}
