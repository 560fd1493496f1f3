use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{Document, DocumentFormat, DocumentSegment};

use super::{MarkdownAdapter, PdfAdapter, PlainTextAdapter};

/// Dispatches to the loader registered for the document's format.
pub struct CompositeFileLoader {
    adapters: HashMap<DocumentFormat, Arc<dyn FileLoader>>,
}

impl CompositeFileLoader {
    pub fn new(adapters: Vec<(DocumentFormat, Arc<dyn FileLoader>)>) -> Self {
        Self {
            adapters: adapters.into_iter().collect(),
        }
    }

    /// PDF, plain text and Markdown.
    pub fn with_default_adapters() -> Self {
        Self::new(vec![
            (DocumentFormat::Pdf, Arc::new(PdfAdapter::new())),
            (DocumentFormat::Text, Arc::new(PlainTextAdapter)),
            (DocumentFormat::Markdown, Arc::new(MarkdownAdapter)),
        ])
    }
}

#[async_trait]
impl FileLoader for CompositeFileLoader {
    async fn load(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Vec<DocumentSegment>, FileLoaderError> {
        let adapter = self.adapters.get(&document.format).ok_or_else(|| {
            FileLoaderError::UnsupportedContentType(document.format.as_mime().to_string())
        })?;

        adapter.load(data, document).await
    }
}
