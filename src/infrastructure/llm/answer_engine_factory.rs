use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{AnswerEngine, EngineProvider, EngineProviderError};
use crate::application::services::{HostedCompletionEngine, LocalRetrievalEngine};
use crate::domain::Backend;
use crate::infrastructure::persistence::InMemoryVectorStore;
use crate::presentation::config::{HostedLlmSettings, RetrievalSettings};

use super::{LocalModels, OpenAiClient};

/// Builds the answer engine for the selected backend from configuration.
pub struct AnswerEngineFactory {
    http: Client,
    hosted: HostedLlmSettings,
    retrieval: RetrievalSettings,
    local_models: Arc<LocalModels>,
}

impl AnswerEngineFactory {
    pub fn new(
        hosted: HostedLlmSettings,
        retrieval: RetrievalSettings,
        local_models: Arc<LocalModels>,
    ) -> Self {
        Self {
            http: Client::new(),
            hosted,
            retrieval,
            local_models,
        }
    }
}

#[async_trait]
impl EngineProvider for AnswerEngineFactory {
    #[tracing::instrument(skip(self, api_key))]
    async fn engine(
        &self,
        backend: Backend,
        api_key: Option<&str>,
    ) -> Result<Arc<dyn AnswerEngine>, EngineProviderError> {
        match backend {
            Backend::HostedApi => {
                let api_key = api_key
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .ok_or(EngineProviderError::MissingCredential(backend))?;

                let client = OpenAiClient::new(
                    self.http.clone(),
                    &self.hosted.base_url,
                    api_key.to_string(),
                    self.hosted.model.clone(),
                );

                Ok(Arc::new(HostedCompletionEngine::new(
                    Arc::new(client),
                    self.hosted.system_prompt.clone(),
                )))
            }
            Backend::LocalRetrieval => {
                let generator = self
                    .local_models
                    .generator()
                    .await
                    .map_err(|e| EngineProviderError::InitializationFailed(e.to_string()))?;
                let embedder = self
                    .local_models
                    .embedder()
                    .await
                    .map_err(|e| EngineProviderError::InitializationFailed(e.to_string()))?;

                Ok(Arc::new(LocalRetrievalEngine::<InMemoryVectorStore>::new(
                    embedder,
                    generator,
                    self.retrieval.top_k,
                    self.retrieval.max_chunks,
                )))
            }
        }
    }
}
