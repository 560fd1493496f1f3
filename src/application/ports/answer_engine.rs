use std::sync::Arc;

use async_trait::async_trait;

use super::{EmbedderError, LlmClientError, TextGeneratorError, VectorStoreError};
use crate::domain::{Backend, IngestedDocument};

/// One way of turning a document and a question into an answer.
#[async_trait]
pub trait AnswerEngine: Send + Sync {
    async fn answer(
        &self,
        document: &IngestedDocument,
        question: &str,
    ) -> Result<String, AnswerEngineError>;
}

/// Builds the engine for a backend selection.
#[async_trait]
pub trait EngineProvider: Send + Sync {
    /// `api_key` has already been checked for presence when the backend needs one.
    async fn engine(
        &self,
        backend: Backend,
        api_key: Option<&str>,
    ) -> Result<Arc<dyn AnswerEngine>, EngineProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnswerEngineError {
    #[error("completion: {0}")]
    Completion(#[from] LlmClientError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("generation: {0}")]
    Generation(#[from] TextGeneratorError),
    #[error("index: {0}")]
    Index(#[from] VectorStoreError),
    #[error("document has {chunks} chunks, limit is {limit}")]
    DocumentTooLarge { chunks: usize, limit: usize },
    #[error("document produced no chunks")]
    EmptyDocument,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineProviderError {
    #[error("missing API key for {0}")]
    MissingCredential(Backend),
    #[error("engine initialization failed: {0}")]
    InitializationFailed(String),
}
