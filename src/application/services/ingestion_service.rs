use std::sync::Arc;

use crate::application::ports::{FileLoader, FileLoaderError, TextSplitter, TextSplitterError};
use crate::domain::{Document, DocumentFormat, FileFormat, IngestedDocument, UploadedArtifact};

/// Turns an uploaded file into ordered segments and chunks.
pub struct IngestionService {
    file_loader: Arc<dyn FileLoader>,
    text_splitter: Arc<dyn TextSplitter>,
}

impl IngestionService {
    pub fn new(file_loader: Arc<dyn FileLoader>, text_splitter: Arc<dyn TextSplitter>) -> Self {
        Self {
            file_loader,
            text_splitter,
        }
    }

    #[tracing::instrument(
        skip(self, artifact),
        fields(filename = %artifact.filename, size_bytes = artifact.size_bytes())
    )]
    pub async fn ingest(
        &self,
        artifact: &UploadedArtifact,
    ) -> Result<IngestedDocument, IngestionError> {
        let format = match artifact.file_format() {
            FileFormat::Pdf => DocumentFormat::Pdf,
            FileFormat::Text => DocumentFormat::Text,
            FileFormat::Markdown => DocumentFormat::Markdown,
            FileFormat::Unsupported(extension) => {
                tracing::warn!(extension = %extension, "Unsupported file type");
                return Err(IngestionError::UnsupportedFormat(extension));
            }
        };

        let document = Document::new(artifact.filename.clone(), format, artifact.size_bytes());

        let segments = self
            .file_loader
            .load(&artifact.data, &document)
            .await
            .map_err(IngestionError::FileLoading)?;

        let mut chunks = Vec::new();
        for segment in &segments {
            let segment_chunks = self
                .text_splitter
                .split(segment, document.id)
                .await
                .map_err(IngestionError::Splitting)?;
            chunks.extend(segment_chunks);
        }

        tracing::info!(
            document_id = %document.id.as_uuid(),
            format = %format,
            segment_count = segments.len(),
            chunk_count = chunks.len(),
            "Document ingested"
        );

        let source_text = match format {
            DocumentFormat::Pdf => None,
            DocumentFormat::Text | DocumentFormat::Markdown => Some(decoded_source(&artifact.data)),
        };

        Ok(IngestedDocument {
            document,
            segments,
            chunks,
            source_text,
        })
    }
}

/// The loader has already rejected invalid UTF-8 for these formats.
fn decoded_source(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("unsupported file type: {0:?}")]
    UnsupportedFormat(String),
    #[error("file loading: {0}")]
    FileLoading(#[from] FileLoaderError),
    #[error("text splitting: {0}")]
    Splitting(#[from] TextSplitterError),
}
