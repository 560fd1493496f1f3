use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{Document, DocumentFormat, DocumentSegment};

use super::text_sanitizer::sanitize_extracted_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Loads a PDF as one segment per page that carries text.
pub struct PdfAdapter {
    timeout: Duration,
}

impl Default for PdfAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfAdapter {
    pub fn new() -> Self {
        Self {
            timeout: EXTRACTION_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn extract_pages(data: &[u8]) -> Result<Vec<String>, FileLoaderError> {
        pdf_extract::extract_text_from_mem_by_pages(data)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))
    }
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(
        skip(self, data),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn load(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Vec<DocumentSegment>, FileLoaderError> {
        if document.format != DocumentFormat::Pdf {
            return Err(FileLoaderError::UnsupportedContentType(
                document.format.as_mime().to_string(),
            ));
        }

        let bytes = data.to_vec();
        let pages = tokio::time::timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || Self::extract_pages(&bytes)),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| {
            if e.is_panic() {
                FileLoaderError::ExtractionFailed("PDF parser panicked".to_string())
            } else {
                FileLoaderError::ExtractionFailed(format!("task join error: {e}"))
            }
        })??;

        let page_count = pages.len();

        let segments: Vec<DocumentSegment> = pages
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                let text = sanitize_extracted_text(raw);
                (!text.is_empty()).then(|| DocumentSegment::new(text, Some(index as u32 + 1)))
            })
            .collect();

        tracing::info!(
            page_count,
            pages_with_text = segments.len(),
            "PDF text extraction complete"
        );

        if segments.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }

        Ok(segments)
    }
}
