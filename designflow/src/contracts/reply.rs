//! Parsing helpers and the per-analysis reply contracts.

use super::ValidationError;
use crate::design::{ComplianceNote, CostAnalysis, FinishesSchedule, SustainabilityReport};
use serde::de::DeserializeOwned;

/// Removes a surrounding ```` ``` ```` or ```` ```json ```` fence, if present.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses a possibly fenced JSON reply into `T`.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ValidationError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(serde_json::from_str(body)?)
}

/// A typed record that can be built from one generator text reply.
pub trait ReplyContract: Sized {
    /// Short name used in logs and errors.
    const NAME: &'static str;

    /// Parses and validates a reply.
    fn parse_reply(text: &str) -> Result<Self, ValidationError>;
}

impl ReplyContract for FinishesSchedule {
    const NAME: &'static str = "finishes schedule";

    fn parse_reply(text: &str) -> Result<Self, ValidationError> {
        let schedule: Self = parse_json(text)?;
        if schedule.is_empty() {
            return Err(ValidationError::Empty);
        }
        Ok(schedule)
    }
}

impl ReplyContract for ComplianceNote {
    const NAME: &'static str = "compliance notes";

    fn parse_reply(text: &str) -> Result<Self, ValidationError> {
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Err(ValidationError::Empty);
        }
        Ok(Self(body.to_string()))
    }
}

impl ReplyContract for CostAnalysis {
    const NAME: &'static str = "cost analysis";

    fn parse_reply(text: &str) -> Result<Self, ValidationError> {
        let cost: Self = parse_json(text)?;
        if cost.currency.trim().is_empty() {
            return Err(ValidationError::for_field("currency", "must not be empty"));
        }
        if !(cost.estimated_total_cost.is_finite() && cost.estimated_total_cost >= 0.0) {
            return Err(ValidationError::for_field(
                "estimatedTotalCost",
                "must be a non-negative number",
            ));
        }
        Ok(cost)
    }
}

impl ReplyContract for SustainabilityReport {
    const NAME: &'static str = "sustainability report";

    fn parse_reply(text: &str) -> Result<Self, ValidationError> {
        let report: Self = parse_json(text)?;
        if !report.score_in_range() {
            return Err(ValidationError::for_field(
                "overallScore",
                format!("{} is outside 0..=100", report.overall_score),
            ));
        }
        Ok(report)
    }
}
