use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{AnswerEngine, AnswerEngineError, LlmClient};
use crate::domain::{IngestedDocument, Message};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Sends the whole document and the question to a hosted chat model in one request.
pub struct HostedCompletionEngine {
    client: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl HostedCompletionEngine {
    pub fn new(client: Arc<dyn LlmClient>, system_prompt: String) -> Self {
        Self {
            client,
            system_prompt,
        }
    }

    pub fn build_messages(&self, article: &str, question: &str) -> Vec<Message> {
        vec![
            Message::system(self.system_prompt.clone()),
            Message::user(article_prompt(article, question)),
        ]
    }
}

pub fn article_prompt(article: &str, question: &str) -> String {
    format!("Here's an article: {article}.\n\n\n{question}")
}

#[async_trait]
impl AnswerEngine for HostedCompletionEngine {
    #[tracing::instrument(
        skip(self, document, question),
        fields(document_id = %document.document.id.as_uuid())
    )]
    async fn answer(
        &self,
        document: &IngestedDocument,
        question: &str,
    ) -> Result<String, AnswerEngineError> {
        let article = document.full_text();
        let messages = self.build_messages(&article, question);

        tracing::debug!(article_chars = article.chars().count(), "Sending hosted completion");

        let answer = self.client.complete(&messages).await?;
        Ok(answer)
    }
}
