//! Generator requests.

use crate::design::VisualKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which agent task a request serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationTask {
    /// Concept skeletons.
    Concept,
    /// One visual of the given kind.
    Visual(VisualKind),
    /// Finishes schedule for one design.
    FinishesSchedule,
    /// Compliance notes for one design.
    Compliance,
    /// Cost analysis for one design.
    Cost,
    /// Sustainability report for one design.
    Sustainability,
    /// An agent avatar portrait.
    Avatar,
    /// One assistant chat turn.
    Assistant,
}

/// Output aspect ratio for image requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1
    #[serde(rename = "1:1")]
    Square,
    /// 3:4
    #[serde(rename = "3:4")]
    Portrait,
    /// 4:3
    #[serde(rename = "4:3")]
    Landscape,
    /// 16:9
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    /// The ratio as "w:h".
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "3:4",
            Self::Landscape => "4:3",
            Self::Wide => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected reply shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text.
    Text,
    /// A JSON document.
    Json,
    /// An image.
    Image {
        /// Requested aspect ratio.
        aspect_ratio: AspectRatio,
    },
}

/// One generator call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The agent task.
    pub task: GenerationTask,
    /// Prompt text.
    pub prompt: String,
    /// Optional system instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    /// Expected reply shape.
    pub format: ResponseFormat,
    /// Optional sampling temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Creates a free-text request.
    #[must_use]
    pub fn text(task: GenerationTask, prompt: impl Into<String>) -> Self {
        Self::new(task, prompt, ResponseFormat::Text)
    }

    /// Creates a JSON request.
    #[must_use]
    pub fn json(task: GenerationTask, prompt: impl Into<String>) -> Self {
        Self::new(task, prompt, ResponseFormat::Json)
    }

    /// Creates an image request.
    #[must_use]
    pub fn image(task: GenerationTask, prompt: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self::new(task, prompt, ResponseFormat::Image { aspect_ratio })
    }

    fn new(task: GenerationTask, prompt: impl Into<String>, format: ResponseFormat) -> Self {
        Self {
            task,
            prompt: prompt.into(),
            system_instruction: None,
            format,
            temperature: None,
        }
    }

    /// Sets the system instruction.
    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// The requested aspect ratio, for image requests.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        match self.format {
            ResponseFormat::Image { aspect_ratio } => Some(aspect_ratio),
            _ => None,
        }
    }
}
