use async_trait::async_trait;

use crate::domain::{Document, DocumentSegment};

#[async_trait]
pub trait FileLoader: Send + Sync {
    /// Parses raw bytes into ordered text segments.
    async fn load(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Vec<DocumentSegment>, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("no text found in {0}")]
    NoTextFound(String),
}
