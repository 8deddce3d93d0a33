//! The assembled design aggregate.

use super::{AnalysisResults, AssetRef, DesignSkeleton};
use serde::{Deserialize, Serialize};

/// Label rendered for an absent analysis.
pub(crate) const NOT_AVAILABLE: &str = "not available";

/// An exterior render with its view label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExteriorView {
    /// "Day", "Night" or "Image" for a fallback.
    pub view: String,
    /// The asset.
    pub asset: AssetRef,
}

/// An interior render with its room label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteriorView {
    /// Room name, or "Interior View".
    pub room: String,
    /// The asset.
    pub asset: AssetRef,
}

/// A floor plan with its level label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPlan {
    /// Level name, or "Floor Plan".
    pub level: String,
    /// The asset.
    pub asset: AssetRef,
}

/// Visual artifacts grouped by kind, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignVisuals {
    /// Day and night renders.
    pub exterior: Vec<ExteriorView>,
    /// Interior renders.
    pub interior: Vec<InteriorView>,
    /// Floor plans.
    pub plans: Vec<FloorPlan>,
}

impl DesignVisuals {
    /// Total number of visual entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exterior.len() + self.interior.len() + self.plans.len()
    }

    /// Returns true when no group has entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries that are fallbacks.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.exterior
            .iter()
            .map(|v| &v.asset)
            .chain(self.interior.iter().map(|v| &v.asset))
            .chain(self.plans.iter().map(|v| &v.asset))
            .filter(|asset| asset.is_placeholder())
            .count()
    }
}

/// A finished design: skeleton, grouped visuals and analyses.
///
/// Only the assembler builds these. Consumers treat them as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    /// Narrative and material core from the concept stage.
    #[serde(flatten)]
    pub skeleton: DesignSkeleton,
    /// Grouped visual artifacts.
    pub visuals: DesignVisuals,
    /// The four optional analyses.
    #[serde(flatten)]
    pub analysis: AnalysisResults,
}

impl Design {
    /// Index of the design within its run.
    #[must_use]
    pub fn index(&self) -> usize {
        self.skeleton.index
    }

    /// Concept title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.skeleton.title
    }

    /// One summary line per analysis, with absent ones marked "not available".
    #[must_use]
    pub fn analysis_lines(&self) -> Vec<(&'static str, String)> {
        let a = &self.analysis;
        vec![
            (
                "Finishes Schedule",
                a.finishes_schedule.as_ref().map_or_else(
                    || NOT_AVAILABLE.to_string(),
                    |s| format!("{} items in {} categories", s.item_count(), s.0.len()),
                ),
            ),
            (
                "Compliance Notes",
                a.compliance_notes
                    .as_ref()
                    .map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string),
            ),
            (
                "Cost Analysis",
                a.cost_analysis.as_ref().map_or_else(
                    || NOT_AVAILABLE.to_string(),
                    |c| format!("{} {:.0}", c.currency, c.estimated_total_cost),
                ),
            ),
            (
                "Sustainability Report",
                a.sustainability_report.as_ref().map_or_else(
                    || NOT_AVAILABLE.to_string(),
                    |r| format!("{:.0}/100", r.overall_score),
                ),
            ),
        ]
    }
}
