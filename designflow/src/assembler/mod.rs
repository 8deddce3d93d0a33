//! Folds skeletons, visual artifacts and analysis results into [`Design`]s.

use crate::design::{
    placeholders, AnalysisResults, AssetRef, ComplianceNote, CostAnalysis, Design,
    DesignSkeleton, DesignVisuals, ExteriorView, FinishesSchedule, FloorPlan, InteriorView,
    SustainabilityReport, VisualArtifact, VisualKind,
};
use crate::errors::IntegrationError;
use tracing::debug;

/// Per-design analysis results, one column per analyst, one row per design.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisColumns {
    /// Materials Specialist results.
    pub finishes: Vec<Option<FinishesSchedule>>,
    /// Compliance AI results.
    pub compliance: Vec<Option<ComplianceNote>>,
    /// Cost Estimator AI results.
    pub cost: Vec<Option<CostAnalysis>>,
    /// Eco-Analyst AI results.
    pub sustainability: Vec<Option<SustainabilityReport>>,
}

impl AnalysisColumns {
    /// Columns with every result absent.
    #[must_use]
    pub fn absent(designs: usize) -> Self {
        Self {
            finishes: vec![None; designs],
            compliance: vec![None; designs],
            cost: vec![None; designs],
            sustainability: vec![None; designs],
        }
    }
}

fn check_len<T>(analysis: &'static str, column: &[T], expected: usize) -> Result<(), IntegrationError> {
    if column.len() == expected {
        Ok(())
    } else {
        Err(IntegrationError::AnalysisCountMismatch {
            analysis,
            expected,
            actual: column.len(),
        })
    }
}

/// Builds the final designs.
///
/// Starts from the skeletons and only ever appends visual and analysis
/// fields; title, description and materials pass through untouched. The
/// assembler is a pure fold, so the same inputs always give equal output.
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    designs: Vec<Design>,
}

impl ResultAssembler {
    /// Starts one design per skeleton with empty visuals and no analyses.
    #[must_use]
    pub fn new(skeletons: &[DesignSkeleton]) -> Self {
        Self {
            designs: skeletons
                .iter()
                .cloned()
                .map(|skeleton| Design {
                    skeleton,
                    visuals: DesignVisuals::default(),
                    analysis: AnalysisResults::default(),
                })
                .collect(),
        }
    }

    /// Appends artifacts to their designs, grouped by kind, keeping order.
    pub fn add_artifacts(
        &mut self,
        artifacts: impl IntoIterator<Item = VisualArtifact>,
    ) -> Result<(), IntegrationError> {
        let count = self.designs.len();
        for artifact in artifacts {
            let design = self.designs.get_mut(artifact.design_index).ok_or(
                IntegrationError::DesignIndexOutOfRange {
                    index: artifact.design_index,
                    count,
                },
            )?;
            let visuals = &mut design.visuals;
            match artifact.kind {
                VisualKind::Day | VisualKind::Night => visuals.exterior.push(ExteriorView {
                    view: artifact.kind.label().to_string(),
                    asset: artifact.asset,
                }),
                VisualKind::Interior => visuals.interior.push(InteriorView {
                    room: artifact.room.unwrap_or_else(|| "Interior View".to_string()),
                    asset: artifact.asset,
                }),
                VisualKind::Plan => visuals.plans.push(FloorPlan {
                    level: artifact.level.unwrap_or_else(|| "Floor Plan".to_string()),
                    asset: artifact.asset,
                }),
            }
        }
        Ok(())
    }

    /// Attaches the analysis rows to their designs.
    pub fn add_analyses(&mut self, columns: AnalysisColumns) -> Result<(), IntegrationError> {
        let n = self.designs.len();
        check_len("finishes schedule", &columns.finishes, n)?;
        check_len("compliance", &columns.compliance, n)?;
        check_len("cost", &columns.cost, n)?;
        check_len("sustainability", &columns.sustainability, n)?;

        let rows = columns
            .finishes
            .into_iter()
            .zip(columns.compliance)
            .zip(columns.cost)
            .zip(columns.sustainability);
        for (design, (((finishes, compliance), cost), sustainability)) in
            self.designs.iter_mut().zip(rows)
        {
            design.analysis = AnalysisResults {
                finishes_schedule: finishes,
                compliance_notes: compliance,
                cost_analysis: cost,
                sustainability_report: sustainability,
            };
        }
        Ok(())
    }

    /// Fills empty exterior and plan groups with placeholders and returns
    /// the designs.
    #[must_use]
    pub fn finish(mut self) -> Vec<Design> {
        for design in &mut self.designs {
            let visuals = &mut design.visuals;
            if visuals.exterior.is_empty() {
                debug!(design = design.skeleton.index, "No exterior views; adding placeholder");
                visuals.exterior.push(ExteriorView {
                    view: "Image".to_string(),
                    asset: AssetRef::Placeholder(placeholders::EXTERIOR_MISSING.to_string()),
                });
            }
            if visuals.plans.is_empty() {
                debug!(design = design.skeleton.index, "No floor plans; adding placeholder");
                visuals.plans.push(FloorPlan {
                    level: "Floor Plan".to_string(),
                    asset: AssetRef::Placeholder(placeholders::PLAN_MISSING.to_string()),
                });
            }
        }
        self.designs
    }

    /// Runs the whole fold in one call.
    pub fn assemble(
        skeletons: &[DesignSkeleton],
        artifacts: impl IntoIterator<Item = VisualArtifact>,
        columns: AnalysisColumns,
    ) -> Result<Vec<Design>, IntegrationError> {
        let mut assembler = Self::new(skeletons);
        assembler.add_artifacts(artifacts)?;
        assembler.add_analyses(columns)?;
        Ok(assembler.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::VisualRequest;
    use crate::testing::sample_skeleton;
    use pretty_assertions::assert_eq;

    fn artifact(design: usize, kind: VisualKind) -> VisualArtifact {
        VisualArtifact::resolved(&VisualRequest::new(design, kind, "x"), format!("uri-{design}-{kind}"))
    }

    #[test]
    fn test_groups_by_kind_in_order() {
        let skeletons = vec![sample_skeleton(0, 0)];
        let artifacts = vec![
            artifact(0, VisualKind::Night),
            artifact(0, VisualKind::Interior),
            artifact(0, VisualKind::Day),
            VisualArtifact::resolved(
                &VisualRequest::new(0, VisualKind::Plan, "p").with_level("Upper Floor"),
                "plan-uri",
            ),
        ];

        let designs =
            ResultAssembler::assemble(&skeletons, artifacts, AnalysisColumns::absent(1)).unwrap();
        let visuals = &designs[0].visuals;
        let views: Vec<_> = visuals.exterior.iter().map(|v| v.view.as_str()).collect();
        assert_eq!(views, vec!["Night", "Day"]);
        assert_eq!(visuals.interior[0].room, "Interior View");
        assert_eq!(visuals.plans[0].level, "Upper Floor");
        assert_eq!(visuals.placeholder_count(), 0);
    }

    #[test]
    fn test_empty_required_groups_get_placeholders() {
        let skeletons = vec![sample_skeleton(0, 0)];
        let designs = ResultAssembler::assemble(
            &skeletons,
            vec![artifact(0, VisualKind::Interior)],
            AnalysisColumns::absent(1),
        )
        .unwrap();

        let visuals = &designs[0].visuals;
        assert_eq!(visuals.exterior.len(), 1);
        assert_eq!(visuals.exterior[0].view, "Image");
        assert_eq!(visuals.exterior[0].asset.uri(), placeholders::EXTERIOR_MISSING);
        assert_eq!(visuals.plans[0].asset.uri(), placeholders::PLAN_MISSING);
        assert_eq!(visuals.interior.len(), 1);
    }

    #[test]
    fn test_never_overwrites_narrative_fields() {
        let skeletons = vec![sample_skeleton(0, 2), sample_skeleton(1, 1)];
        let designs = ResultAssembler::assemble(
            &skeletons,
            vec![artifact(1, VisualKind::Day), artifact(0, VisualKind::Plan)],
            AnalysisColumns::absent(2),
        )
        .unwrap();

        for (design, skeleton) in designs.iter().zip(&skeletons) {
            assert_eq!(&design.skeleton, skeleton);
        }
    }

    #[test]
    fn test_out_of_range_index_is_integration_error() {
        let mut assembler = ResultAssembler::new(&[sample_skeleton(0, 0)]);
        let err = assembler.add_artifacts(vec![artifact(3, VisualKind::Day)]).unwrap_err();
        assert_eq!(err, IntegrationError::DesignIndexOutOfRange { index: 3, count: 1 });
    }

    #[test]
    fn test_analysis_count_mismatch() {
        let mut assembler = ResultAssembler::new(&[sample_skeleton(0, 0), sample_skeleton(1, 0)]);
        let mut columns = AnalysisColumns::absent(2);
        columns.cost.pop();
        let err = assembler.add_analyses(columns).unwrap_err();
        assert!(matches!(
            err,
            IntegrationError::AnalysisCountMismatch { analysis: "cost", expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_analyses_attached_per_design() {
        let skeletons = vec![sample_skeleton(0, 0), sample_skeleton(1, 0)];
        let mut columns = AnalysisColumns::absent(2);
        columns.compliance[1] = Some(ComplianceNote("OK".to_string()));

        let designs = ResultAssembler::assemble(&skeletons, vec![], columns).unwrap();
        assert_eq!(designs[0].analysis.compliance_notes, None);
        assert_eq!(designs[1].analysis.compliance_notes, Some(ComplianceNote("OK".to_string())));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let skeletons = vec![sample_skeleton(0, 3)];
        let artifacts = vec![artifact(0, VisualKind::Day), artifact(0, VisualKind::Plan)];
        let first =
            ResultAssembler::assemble(&skeletons, artifacts.clone(), AnalysisColumns::absent(1)).unwrap();
        let second =
            ResultAssembler::assemble(&skeletons, artifacts, AnalysisColumns::absent(1)).unwrap();
        assert_eq!(first, second);
    }
}
