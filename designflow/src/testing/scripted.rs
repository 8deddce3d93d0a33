//! A deterministic generator for tests.

use crate::generator::{GeneratedArtifact, GenerationRequest, GenerationTask, Generator, GeneratorError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::concept_reply;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn default_text(task: GenerationTask) -> Option<String> {
    let text = match task {
        GenerationTask::Concept => concept_reply(1, 5),
        GenerationTask::FinishesSchedule => r#"{
            "Flooring": [{"location": "Living Room Floor", "material": "Oak", "finish": "Oiled"}],
            "Walls": [{"location": "Kitchen Walls", "material": "Lime Plaster", "finish": "Matte", "notes": "Breathable"}]
        }"#
        .to_string(),
        GenerationTask::Compliance => {
            "Setbacks and height appear consistent with typical residential zoning.".to_string()
        }
        GenerationTask::Cost => r#"{
            "currency": "EUR",
            "estimatedTotalCost": 420000,
            "costBreakdown": [{"category": "Structure", "cost": 180000}],
            "billOfQuantities": [{"item": "Limestone cladding", "quantity": 220, "unit": "m2"}],
            "summary": "Mid-to-high range residential build."
        }"#
        .to_string(),
        GenerationTask::Sustainability => r#"{
            "overallScore": 74,
            "summary": "Good passive performance.",
            "positiveAspects": ["Cross ventilation"],
            "improvementSuggestions": ["Add rainwater harvesting"]
        }"#
        .to_string(),
        GenerationTask::Assistant => "Happy to help with your project.".to_string(),
        GenerationTask::Visual(_) | GenerationTask::Avatar => return None,
    };
    Some(text)
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, high_water: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        high_water.fetch_max(now, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A [`Generator`] with canned replies per task.
///
/// Text tasks answer with a valid reply by default; visual and avatar tasks
/// answer with a small PNG. Replies can be overridden per task, failures
/// injected per task or per prompt substring, and a fixed latency added.
/// Every request is recorded.
#[derive(Default)]
pub struct ScriptedGenerator {
    texts: HashMap<GenerationTask, String>,
    failing_tasks: HashSet<GenerationTask>,
    failing_prompts: Vec<String>,
    latency: Option<Duration>,
    requests: Mutex<Vec<GenerationRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    visual_in_flight: AtomicUsize,
    max_visual_in_flight: AtomicUsize,
}

impl ScriptedGenerator {
    /// Creates a generator with default replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the text reply for a task.
    #[must_use]
    pub fn with_text(mut self, task: GenerationTask, text: impl Into<String>) -> Self {
        self.texts.insert(task, text.into());
        self
    }

    /// Makes every call for a task fail.
    #[must_use]
    pub fn failing(mut self, task: GenerationTask) -> Self {
        self.failing_tasks.insert(task);
        self
    }

    /// Makes every call whose prompt contains `needle` fail.
    #[must_use]
    pub fn failing_prompt(mut self, needle: impl Into<String>) -> Self {
        self.failing_prompts.push(needle.into());
        self
    }

    /// Delays every reply.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Total number of calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of calls received for a task.
    #[must_use]
    pub fn calls_for(&self, task: GenerationTask) -> usize {
        self.requests.lock().iter().filter(|r| r.task == task).count()
    }

    /// Every request received, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    /// Highest number of calls that were in progress at once.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of visual calls that were in progress at once.
    #[must_use]
    pub fn max_visual_in_flight(&self) -> usize {
        self.max_visual_in_flight.load(Ordering::SeqCst)
    }

    fn should_fail(&self, request: &GenerationRequest) -> bool {
        self.failing_tasks.contains(&request.task)
            || self
                .failing_prompts
                .iter()
                .any(|needle| request.prompt.contains(needle.as_str()))
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedArtifact, GeneratorError> {
        self.requests.lock().push(request.clone());

        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        let _visual_guard = matches!(request.task, GenerationTask::Visual(_))
            .then(|| InFlight::enter(&self.visual_in_flight, &self.max_visual_in_flight));

        match self.latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }

        if self.should_fail(&request) {
            return Err(anyhow::anyhow!("scripted failure for {:?}", request.task).into());
        }

        if let Some(text) = self.texts.get(&request.task) {
            return Ok(GeneratedArtifact::Text(text.clone()));
        }
        Ok(match default_text(request.task) {
            Some(text) => GeneratedArtifact::Text(text),
            None => GeneratedArtifact::Image {
                mime_type: "image/png".to_string(),
                bytes: PNG_MAGIC.to_vec(),
            },
        })
    }
}

impl std::fmt::Debug for ScriptedGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedGenerator")
            .field("calls", &self.call_count())
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::VisualKind;
    use crate::generator::AspectRatio;

    #[tokio::test]
    async fn test_defaults_and_accounting() {
        let generator = ScriptedGenerator::new();
        let text = generator
            .generate(GenerationRequest::text(GenerationTask::Compliance, "check"))
            .await
            .unwrap();
        assert!(matches!(text, GeneratedArtifact::Text(_)));

        let image = generator
            .generate(GenerationRequest::image(
                GenerationTask::Visual(VisualKind::Day),
                "facade",
                AspectRatio::Wide,
            ))
            .await
            .unwrap();
        assert!(matches!(image, GeneratedArtifact::Image { .. }));

        assert_eq!(generator.call_count(), 2);
        assert_eq!(generator.calls_for(GenerationTask::Compliance), 1);
        assert_eq!(generator.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let generator = ScriptedGenerator::new()
            .failing(GenerationTask::Cost)
            .failing_prompt("forbidden");

        assert!(generator
            .generate(GenerationRequest::json(GenerationTask::Cost, "estimate"))
            .await
            .is_err());
        assert!(generator
            .generate(GenerationRequest::text(GenerationTask::Compliance, "a forbidden check"))
            .await
            .is_err());
        assert!(generator
            .generate(GenerationRequest::text(GenerationTask::Compliance, "fine"))
            .await
            .is_ok());
    }
}
