use async_trait::async_trait;

use crate::domain::Message;

/// A hosted chat-completion endpoint.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends the conversation and returns the first choice's content.
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
