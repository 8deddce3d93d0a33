//! The fixed roster of pipeline agents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one agent in the design team.
///
/// Each pipeline stage is bound to exactly one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    /// Analyzes the brief and coordinates the team.
    ProjectLead,
    /// Generates the core design concepts.
    ConceptArchitect,
    /// Generates all renders and plans.
    VisualSynthesis,
    /// Details finishes and materials.
    MaterialsSpecialist,
    /// Estimates project costs and bill of quantities.
    CostEstimator,
    /// Analyzes sustainability factors.
    EcoAnalyst,
    /// Performs regulatory checks.
    Compliance,
    /// Assembles the final project data.
    DataIntegrator,
}

impl AgentId {
    /// Every agent, in pipeline order.
    pub const ALL: [Self; 8] = [
        Self::ProjectLead,
        Self::ConceptArchitect,
        Self::VisualSynthesis,
        Self::MaterialsSpecialist,
        Self::CostEstimator,
        Self::EcoAnalyst,
        Self::Compliance,
        Self::DataIntegrator,
    ];

    /// The four agents of the parallel analysis block.
    pub const ANALYSTS: [Self; 4] = [
        Self::MaterialsSpecialist,
        Self::Compliance,
        Self::CostEstimator,
        Self::EcoAnalyst,
    ];

    /// Display name of the agent.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ProjectLead => "Project Lead",
            Self::ConceptArchitect => "Concept Architect",
            Self::VisualSynthesis => "Visual Synthesis AI",
            Self::MaterialsSpecialist => "Materials Specialist",
            Self::CostEstimator => "Cost Estimator AI",
            Self::EcoAnalyst => "Eco-Analyst AI",
            Self::Compliance => "Compliance AI",
            Self::DataIntegrator => "Data Integrator",
        }
    }

    /// One-line description of what the agent does.
    #[must_use]
    pub fn role(self) -> &'static str {
        match self {
            Self::ProjectLead => "Analyzes brief & coordinates team",
            Self::ConceptArchitect => "Generates core design concepts",
            Self::VisualSynthesis => "Generates all renders & plans",
            Self::MaterialsSpecialist => "Details finishes and materials",
            Self::CostEstimator => "Estimates project costs & BOQ",
            Self::EcoAnalyst => "Analyzes sustainability factors",
            Self::Compliance => "Performs regulatory checks",
            Self::DataIntegrator => "Assembles final project data",
        }
    }

    /// Returns true for the analysis-block agents.
    #[must_use]
    pub fn is_analyst(self) -> bool {
        Self::ANALYSTS.contains(&self)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_roster_is_unique() {
        let names: HashSet<_> = AgentId::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names.len(), AgentId::ALL.len());
    }

    #[test]
    fn test_analysts_are_part_of_roster() {
        for analyst in AgentId::ANALYSTS {
            assert!(AgentId::ALL.contains(&analyst));
            assert!(analyst.is_analyst());
        }
        assert!(!AgentId::ConceptArchitect.is_analyst());
    }

    #[test]
    fn test_agent_display_and_serialize() {
        assert_eq!(AgentId::EcoAnalyst.to_string(), "Eco-Analyst AI");
        let json = serde_json::to_string(&AgentId::VisualSynthesis).unwrap();
        assert_eq!(json, r#""visual_synthesis""#);
    }
}
