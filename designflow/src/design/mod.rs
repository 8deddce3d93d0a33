//! Domain records flowing through the pipeline.
//!
//! - [`Brief`]: the immutable input
//! - [`DesignSkeleton`] and [`VisualRequest`]: concept stage output
//! - [`VisualArtifact`]: one settled visual request
//! - [`AnalysisResults`]: the four optional analysis reports
//! - [`Design`]: the assembled aggregate

mod analysis;
mod artifact;
mod brief;
mod design;
mod skeleton;

pub use analysis::{
    AnalysisResults, BillOfQuantitiesItem, ComplianceNote, CostAnalysis, CostBreakdownItem,
    FinishesSchedule, MaterialScheduleItem, SustainabilityReport,
};
pub use artifact::{placeholders, AssetRef, VisualArtifact};
pub use brief::{Brief, DimensionUnit, Dimensions, FlatConfiguration};
pub use design::{Design, DesignVisuals, ExteriorView, FloorPlan, InteriorView};
pub use skeleton::{DesignSkeleton, VisualKind, VisualRequest};
