//! Concept stage output: design skeletons and their visual requests.

use super::{Dimensions, FlatConfiguration};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// The kind of visual a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualKind {
    /// Exterior render in daylight.
    Day,
    /// Exterior render at night.
    Night,
    /// Interior render of one room.
    Interior,
    /// Floor plan of one level.
    Plan,
}

impl VisualKind {
    /// Parses a kind tag, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "day" => Some(Self::Day),
            "night" => Some(Self::Night),
            "interior" => Some(Self::Interior),
            "plan" => Some(Self::Plan),
            _ => None,
        }
    }

    /// Returns true for the two exterior kinds.
    #[must_use]
    pub fn is_exterior(self) -> bool {
        matches!(self, Self::Day | Self::Night)
    }

    /// Capitalized view label ("Day", "Night", ...).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Night => "Night",
            Self::Interior => "Interior",
            Self::Plan => "Plan",
        }
    }
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Night => write!(f, "night"),
            Self::Interior => write!(f, "interior"),
            Self::Plan => write!(f, "plan"),
        }
    }
}

/// One unit of work for the visual synthesis stage.
///
/// Carries the index of its owning design so the result can be reassembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualRequest {
    /// Index of the owning design.
    pub design_index: usize,
    /// What to draw.
    pub kind: VisualKind,
    /// Free-text description of the scene.
    pub prompt: String,
    /// Room tag, for interior requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Level tag, for plan requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl VisualRequest {
    /// Creates a request without room or level tags.
    #[must_use]
    pub fn new(design_index: usize, kind: VisualKind, prompt: impl Into<String>) -> Self {
        Self {
            design_index,
            kind,
            prompt: prompt.into(),
            room: None,
            level: None,
        }
    }

    /// Sets the room tag.
    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Sets the level tag.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }
}

/// The narrative and material core of one design, before visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSkeleton {
    /// Unique index of the design within the run.
    pub index: usize,
    /// Concept title.
    pub title: String,
    /// Narrative description.
    pub description: String,
    /// Dominant architectural style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architectural_style: Option<String>,
    /// Key materials.
    #[serde(default)]
    pub materials: Vec<String>,
    /// Color palette (hex codes).
    #[serde(default)]
    pub color_palette: Vec<String>,
    /// Visuals to synthesize for this design.
    #[serde(default)]
    pub visual_requests: Vec<VisualRequest>,
    /// Dimensions copied from the brief.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Flat configuration copied from the brief.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_configuration: Option<FlatConfiguration>,
}

fn signature_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)signature element:\s*(.*?)\.").ok())
        .as_ref()
}

impl DesignSkeleton {
    /// The "signature element" named in the description, if any.
    #[must_use]
    pub fn signature_element(&self) -> Option<&str> {
        signature_pattern()?
            .captures(&self.description)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    }

    /// Materials as a comma-separated list.
    #[must_use]
    pub fn materials_text(&self) -> String {
        self.materials.join(", ")
    }
}
