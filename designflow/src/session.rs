//! Explicit per-user session state.

use crate::core::AgentId;
use crate::design::{Brief, Design};
use crate::errors::{ConfigurationError, PipelineError};
use crate::events::StatusStream;
use crate::generator::{generate_image_uri, generate_text, Generator, GeneratorError};
use crate::pipeline::{DesignPipeline, PipelineConfig};
use crate::stages::prompts;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// One user's conversation, avatar cache and pipeline handle.
///
/// Sessions share nothing with each other. Dropping a session drops its
/// cache and transcript.
pub struct DesignSession {
    id: Uuid,
    generator: Arc<dyn Generator>,
    pipeline: DesignPipeline,
    avatars: DashMap<AgentId, String>,
    transcript: Mutex<Vec<(String, String)>>,
}

impl DesignSession {
    /// Creates a session over a generator.
    pub fn new(
        generator: Arc<dyn Generator>,
        config: PipelineConfig,
    ) -> Result<Self, ConfigurationError> {
        let pipeline = DesignPipeline::new(generator.clone(), config)?;
        Ok(Self {
            id: Uuid::new_v4(),
            generator,
            pipeline,
            avatars: DashMap::new(),
            transcript: Mutex::new(Vec::new()),
        })
    }

    /// The session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The session's pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &DesignPipeline {
        &self.pipeline
    }

    /// Returns the agent's avatar URI, generating it on first use.
    pub async fn avatar(&self, agent: AgentId) -> Result<String, GeneratorError> {
        if let Some(uri) = self.avatars.get(&agent) {
            return Ok(uri.clone());
        }

        debug!(session = %self.id, %agent, "Generating avatar");
        let uri = generate_image_uri(self.generator.as_ref(), prompts::avatar_request(agent)).await?;
        // A concurrent request may have filled the slot first; keep that one.
        Ok(self.avatars.entry(agent).or_insert(uri).clone())
    }

    /// Number of cached avatars.
    #[must_use]
    pub fn cached_avatars(&self) -> usize {
        self.avatars.len()
    }

    /// Sends one message to the assistant and records the exchange.
    ///
    /// A failed turn is not recorded.
    pub async fn ask_assistant(&self, message: &str) -> Result<String, GeneratorError> {
        let history = self.transcript.lock().clone();
        let request = prompts::assistant_request(&history, message);
        let reply = generate_text(self.generator.as_ref(), request).await?;
        self.transcript
            .lock()
            .push((message.to_string(), reply.clone()));
        Ok(reply)
    }

    /// The conversation so far as (user, assistant) pairs.
    #[must_use]
    pub fn transcript(&self) -> Vec<(String, String)> {
        self.transcript.lock().clone()
    }

    /// Forgets the conversation.
    pub fn reset_conversation(&self) {
        self.transcript.lock().clear();
    }

    /// Starts a pipeline run in the background.
    pub fn submit_brief(
        &self,
        brief: Brief,
    ) -> (StatusStream, JoinHandle<Result<Vec<Design>, PipelineError>>) {
        debug!(session = %self.id, project = %brief.project_name, "Submitting brief");
        self.pipeline.submit(brief)
    }
}

impl std::fmt::Debug for DesignSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignSession")
            .field("id", &self.id)
            .field("cached_avatars", &self.avatars.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationTask;
    use crate::testing::{sample_brief, ScriptedGenerator};
    use futures::StreamExt;

    fn session(generator: Arc<ScriptedGenerator>) -> DesignSession {
        DesignSession::new(generator, PipelineConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_avatar_is_cached_per_agent() {
        let generator = Arc::new(ScriptedGenerator::new());
        let session = session(generator.clone());

        let first = session.avatar(AgentId::EcoAnalyst).await.unwrap();
        let again = session.avatar(AgentId::EcoAnalyst).await.unwrap();
        session.avatar(AgentId::Compliance).await.unwrap();

        assert_eq!(first, again);
        assert!(first.starts_with("data:image/png;base64,"));
        assert_eq!(generator.calls_for(GenerationTask::Avatar), 2);
        assert_eq!(session.cached_avatars(), 2);
    }

    #[tokio::test]
    async fn test_failed_avatar_is_not_cached() {
        let generator = Arc::new(ScriptedGenerator::new().failing(GenerationTask::Avatar));
        let session = session(generator);
        assert!(session.avatar(AgentId::ProjectLead).await.is_err());
        assert_eq!(session.cached_avatars(), 0);
    }

    #[tokio::test]
    async fn test_assistant_keeps_transcript() {
        let generator = Arc::new(ScriptedGenerator::new());
        let session = session(generator.clone());

        session.ask_assistant("Hello").await.unwrap();
        session.ask_assistant("Tell me about cantilevers").await.unwrap();

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].0, "Tell me about cantilevers");

        let last_prompt = generator.requests().last().unwrap().prompt.clone();
        assert!(last_prompt.contains("User: Hello"));

        session.reset_conversation();
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let generator = Arc::new(ScriptedGenerator::new());
        let a = session(generator.clone());
        let b = session(generator);

        a.ask_assistant("only in a").await.unwrap();
        a.avatar(AgentId::DataIntegrator).await.unwrap();

        assert_ne!(a.id(), b.id());
        assert!(b.transcript().is_empty());
        assert_eq!(b.cached_avatars(), 0);
    }

    #[tokio::test]
    async fn test_submit_brief() {
        let session = session(Arc::new(ScriptedGenerator::new()));
        let (statuses, handle) = session.submit_brief(sample_brief());

        let count = statuses.count().await;
        let designs = handle.await.unwrap().unwrap();
        assert!(count > 0);
        assert_eq!(designs.len(), 1);
    }
}
