//! Typed analysis results, validated once when the reply is parsed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One row of a finishes schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialScheduleItem {
    /// Where the finish applies, e.g. "Kitchen Floor".
    pub location: String,
    /// Material name.
    pub material: String,
    /// Finish name.
    pub finish: String,
    /// Optional remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Finishes grouped by category ("Flooring", "Walls", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinishesSchedule(pub BTreeMap<String, Vec<MaterialScheduleItem>>);

impl FinishesSchedule {
    /// Number of schedule rows across all categories.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Returns true when no category has any rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

/// Free-text compliance notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplianceNote(pub String);

impl fmt::Display for ComplianceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One cost category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdownItem {
    /// Category name.
    pub category: String,
    /// Cost in the report currency.
    pub cost: f64,
}

/// One bill-of-quantities line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillOfQuantitiesItem {
    /// Item description.
    pub item: String,
    /// Quantity.
    pub quantity: f64,
    /// Unit of measure.
    pub unit: String,
}

/// Preliminary cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAnalysis {
    /// ISO currency code or symbol.
    pub currency: String,
    /// Total estimate.
    pub estimated_total_cost: f64,
    /// Per-category costs.
    #[serde(default)]
    pub cost_breakdown: Vec<CostBreakdownItem>,
    /// Bill of quantities.
    #[serde(default)]
    pub bill_of_quantities: Vec<BillOfQuantitiesItem>,
    /// Short narrative.
    #[serde(default)]
    pub summary: String,
}

/// Sustainability assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityReport {
    /// Score out of 100.
    pub overall_score: f64,
    /// Short narrative.
    #[serde(default)]
    pub summary: String,
    /// What the design does well.
    #[serde(default)]
    pub positive_aspects: Vec<String>,
    /// What could be improved.
    #[serde(default)]
    pub improvement_suggestions: Vec<String>,
}

impl SustainabilityReport {
    /// Upper bound of the score scale.
    pub const MAX_SCORE: f64 = 100.0;

    /// Returns true if the score lies on the 0..=100 scale.
    #[must_use]
    pub fn score_in_range(&self) -> bool {
        (0.0..=Self::MAX_SCORE).contains(&self.overall_score)
    }
}

/// The four per-design analyses. Each is independently optional; `None`
/// means the analysis failed or was never produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    /// Materials Specialist output.
    pub finishes_schedule: Option<FinishesSchedule>,
    /// Compliance AI output.
    pub compliance_notes: Option<ComplianceNote>,
    /// Cost Estimator AI output.
    pub cost_analysis: Option<CostAnalysis>,
    /// Eco-Analyst AI output.
    pub sustainability_report: Option<SustainabilityReport>,
}

impl AnalysisResults {
    /// Number of analyses that produced a value.
    #[must_use]
    pub fn available(&self) -> usize {
        [
            self.finishes_schedule.is_some(),
            self.compliance_notes.is_some(),
            self.cost_analysis.is_some(),
            self.sustainability_report.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cost_analysis_from_camel_case() {
        let json = r#"{
            "currency": "USD",
            "estimatedTotalCost": 125000,
            "costBreakdown": [{"category": "Structure", "cost": 60000}],
            "billOfQuantities": [{"item": "Concrete", "quantity": 40, "unit": "m3"}],
            "summary": "Mid-range build."
        }"#;
        let cost: CostAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(cost.currency, "USD");
        assert_eq!(cost.cost_breakdown.len(), 1);
        assert_eq!(cost.bill_of_quantities[0].unit, "m3");
    }

    #[test]
    fn test_finishes_schedule_counts() {
        let json = r#"{
            "Flooring": [{"location": "Kitchen Floor", "material": "Oak", "finish": "Matte"}],
            "Walls": [
                {"location": "Living Room Walls", "material": "Plaster", "finish": "Eggshell", "notes": "Low VOC"},
                {"location": "Bedroom Walls", "material": "Plaster", "finish": "Matte"}
            ]
        }"#;
        let schedule: FinishesSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.item_count(), 3);
        assert!(!schedule.is_empty());
        assert!(FinishesSchedule::default().is_empty());
    }

    #[test]
    fn test_sustainability_score_range() {
        let mut report = SustainabilityReport {
            overall_score: 78.0,
            summary: String::new(),
            positive_aspects: vec![],
            improvement_suggestions: vec![],
        };
        assert!(report.score_in_range());
        report.overall_score = 140.0;
        assert!(!report.score_in_range());
    }

    #[test]
    fn test_available_count() {
        let mut results = AnalysisResults::default();
        assert_eq!(results.available(), 0);
        results.compliance_notes = Some(ComplianceNote("Setbacks satisfied.".to_string()));
        assert_eq!(results.available(), 1);
    }
}
