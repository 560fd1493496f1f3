use async_trait::async_trait;

/// A local causal language model used as a plain text-generation pipeline.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns only the newly generated continuation, not the prompt.
    async fn generate(&self, prompt: &str) -> Result<String, TextGeneratorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextGeneratorError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}
