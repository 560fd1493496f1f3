use std::sync::Arc;

use serde::Serialize;

use super::ingestion_service::{IngestionError, IngestionService};
use crate::application::ports::{AnswerEngineError, EngineProvider, EngineProviderError};
use crate::domain::{Backend, Query, UploadedArtifact};

/// Everything the user supplied for one interaction.
#[derive(Debug, Clone)]
pub struct AskRequest {
    pub backend: Backend,
    pub api_key: Option<String>,
    pub artifact: Option<UploadedArtifact>,
    pub question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub backend: Backend,
    pub text: String,
}

/// Precondition failures shown to the user instead of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AwaitingInput,
    MissingCredential,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::AwaitingInput => "Upload an article and ask something about it.",
            Notice::MissingCredential => "Please provide your OpenAI API key to proceed.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Answered(Answer),
    Notice(Notice),
}

#[derive(Debug, thiserror::Error)]
pub enum QaError {
    #[error("ingestion: {0}")]
    Ingestion(#[from] IngestionError),
    #[error("engine selection: {0}")]
    EngineSelection(#[from] EngineProviderError),
    #[error("answering: {0}")]
    Engine(#[from] AnswerEngineError),
}

pub struct QaService {
    ingestion_service: Arc<IngestionService>,
    engines: Arc<dyn EngineProvider>,
}

impl QaService {
    pub fn new(ingestion_service: Arc<IngestionService>, engines: Arc<dyn EngineProvider>) -> Self {
        Self {
            ingestion_service,
            engines,
        }
    }

    #[tracing::instrument(skip(self, request), fields(backend = %request.backend))]
    pub async fn ask(&self, request: AskRequest) -> Result<Outcome, QaError> {
        let AskRequest {
            backend,
            api_key,
            artifact,
            question,
        } = request;

        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let missing_credential = backend.requires_credential() && api_key.is_none();

        let query = match (artifact, question.filter(|q| !q.trim().is_empty())) {
            (Some(artifact), Some(question)) => Query { question, artifact },
            _ if missing_credential => {
                tracing::info!("Hosted backend selected without an API key");
                return Ok(Outcome::Notice(Notice::MissingCredential));
            }
            _ => {
                tracing::debug!("Waiting for both a document and a question");
                return Ok(Outcome::Notice(Notice::AwaitingInput));
            }
        };

        // A complete request still reports an unreadable upload before the key.
        let document = self.ingestion_service.ingest(&query.artifact).await?;

        if missing_credential {
            tracing::info!("Hosted backend selected without an API key");
            return Ok(Outcome::Notice(Notice::MissingCredential));
        }

        let engine = self.engines.engine(backend, api_key.as_deref()).await?;
        let text = engine.answer(&document, &query.question).await?;

        tracing::info!(answer_chars = text.chars().count(), "Answer produced");

        Ok(Outcome::Answered(Answer { backend, text }))
    }
}
