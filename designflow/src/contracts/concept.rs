//! Concept stage reply contract.

use super::{strip_code_fence, ValidationError};
use crate::design::{Brief, DesignSkeleton, VisualKind, VisualRequest};
use serde::Deserialize;
use tracing::warn;

/// One visual prompt as the generator writes it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVisualPrompt {
    /// Kind tag ("day", "night", "interior", "plan").
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Scene description.
    #[serde(default)]
    pub prompt: String,
    /// Room, for interiors.
    #[serde(default)]
    pub room: Option<String>,
    /// Level, for plans.
    #[serde(default)]
    pub level: Option<String>,
}

/// One design concept as the generator writes it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConcept {
    /// Concept title.
    #[serde(default)]
    pub title: String,
    /// Narrative description.
    #[serde(default)]
    pub description: String,
    /// Architectural style.
    #[serde(default)]
    pub architectural_style: Option<String>,
    /// Key materials.
    #[serde(default)]
    pub materials: Vec<String>,
    /// Hex color palette.
    #[serde(default)]
    pub color_palette: Vec<String>,
    /// Visual prompts for the synthesis stage.
    #[serde(default)]
    pub internal_image_prompts: Vec<RawVisualPrompt>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConceptReply {
    Many(Vec<RawConcept>),
    One(Box<RawConcept>),
}

impl RawConcept {
    fn into_skeleton(self, index: usize, brief: &Brief) -> Result<DesignSkeleton, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::for_field(
                format!("[{index}].title"),
                "must not be empty",
            ));
        }

        let visual_requests = self
            .internal_image_prompts
            .into_iter()
            .filter_map(|raw| raw.into_request(index))
            .collect();

        Ok(DesignSkeleton {
            index,
            title: self.title,
            description: self.description,
            architectural_style: self.architectural_style.filter(|s| !s.trim().is_empty()),
            materials: self.materials,
            color_palette: self.color_palette,
            visual_requests,
            dimensions: Some(brief.dimensions),
            flat_configuration: brief.flat_configuration,
        })
    }
}

impl RawVisualPrompt {
    fn into_request(self, design_index: usize) -> Option<VisualRequest> {
        if self.prompt.trim().is_empty() {
            return None;
        }
        let Some(kind) = VisualKind::parse(&self.kind) else {
            warn!(
                design_index,
                kind = %self.kind,
                "Dropping visual prompt with unknown kind"
            );
            return None;
        };

        let mut request = VisualRequest::new(design_index, kind, self.prompt);
        request.room = self.room.filter(|r| !r.trim().is_empty());
        request.level = self.level.filter(|l| !l.trim().is_empty());
        Some(request)
    }
}

/// Parses the concept reply into skeletons enriched with brief details.
///
/// Accepts a JSON array of concepts or a single concept object. Visual
/// prompts with no text or an unknown kind are dropped. At least one
/// skeleton is required.
pub fn parse_concept_reply(text: &str, brief: &Brief) -> Result<Vec<DesignSkeleton>, ValidationError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(ValidationError::Empty);
    }

    let raw = match serde_json::from_str::<ConceptReply>(body) {
        Ok(ConceptReply::Many(concepts)) => concepts,
        Ok(ConceptReply::One(concept)) => vec![*concept],
        Err(err) => return Err(ValidationError::Malformed(err.to_string())),
    };
    if raw.is_empty() {
        return Err(ValidationError::Empty);
    }

    raw.into_iter()
        .enumerate()
        .map(|(index, concept)| concept.into_skeleton(index, brief))
        .collect()
}
