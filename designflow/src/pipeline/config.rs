//! Pipeline configuration.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix of the environment variables read by [`PipelineConfig::with_env_overrides`].
pub const ENV_PREFIX: &str = "DESIGNFLOW_";

/// Settings for one pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of visual requests in flight at once.
    #[serde(default = "default_visual_concurrency")]
    pub visual_concurrency: usize,
    /// Timeout for each visual and analysis call, in milliseconds.
    #[serde(default)]
    pub item_timeout_ms: Option<u64>,
    /// Timeout for the concept call, in milliseconds. Expiry is fatal.
    #[serde(default)]
    pub concept_timeout_ms: Option<u64>,
}

fn default_visual_concurrency() -> usize {
    4
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            visual_concurrency: default_visual_concurrency(),
            item_timeout_ms: None,
            concept_timeout_ms: None,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigurationError::new("<document>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::new("<file>", format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Applies `DESIGNFLOW_VISUAL_CONCURRENCY`, `DESIGNFLOW_ITEM_TIMEOUT_MS`
    /// and `DESIGNFLOW_CONCEPT_TIMEOUT_MS` when set.
    pub fn with_env_overrides(self) -> Result<Self, ConfigurationError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let parse = |field: &str| -> Result<Option<u64>, ConfigurationError> {
            let key = format!("{ENV_PREFIX}{}", field.to_ascii_uppercase());
            lookup(&key)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|e| ConfigurationError::new(field, format!("{key}={raw}: {e}")))
                })
                .transpose()
        };

        if let Some(n) = parse("visual_concurrency")? {
            self.visual_concurrency = usize::try_from(n)
                .map_err(|e| ConfigurationError::new("visual_concurrency", e.to_string()))?;
        }
        if let Some(ms) = parse("item_timeout_ms")? {
            self.item_timeout_ms = Some(ms);
        }
        if let Some(ms) = parse("concept_timeout_ms")? {
            self.concept_timeout_ms = Some(ms);
        }
        self.validate()?;
        Ok(self)
    }

    /// Sets the visual concurrency limit.
    #[must_use]
    pub fn with_visual_concurrency(mut self, limit: usize) -> Self {
        self.visual_concurrency = limit;
        self
    }

    /// Sets the per-item timeout.
    #[must_use]
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout_ms = Some(duration_ms(timeout));
        self
    }

    /// Sets the concept call timeout.
    #[must_use]
    pub fn with_concept_timeout(mut self, timeout: Duration) -> Self {
        self.concept_timeout_ms = Some(duration_ms(timeout));
        self
    }

    /// The per-item timeout, if any.
    #[must_use]
    pub fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout_ms.map(Duration::from_millis)
    }

    /// The concept call timeout, falling back to the per-item timeout.
    #[must_use]
    pub fn concept_timeout(&self) -> Option<Duration> {
        self.concept_timeout_ms
            .or(self.item_timeout_ms)
            .map(Duration::from_millis)
    }

    /// Rejects settings no run could honor.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.visual_concurrency == 0 {
            return Err(ConfigurationError::new(
                "visual_concurrency",
                "must be at least 1",
            ));
        }
        if self.item_timeout_ms == Some(0) {
            return Err(ConfigurationError::new("item_timeout_ms", "must be positive"));
        }
        if self.concept_timeout_ms == Some(0) {
            return Err(ConfigurationError::new(
                "concept_timeout_ms",
                "must be positive",
            ));
        }
        Ok(())
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
