use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{Document, DocumentFormat, DocumentSegment};

/// Loads a `.txt` file verbatim as a single segment.
pub struct PlainTextAdapter;

#[async_trait]
impl FileLoader for PlainTextAdapter {
    async fn load(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Vec<DocumentSegment>, FileLoaderError> {
        if document.format != DocumentFormat::Text {
            return Err(FileLoaderError::UnsupportedContentType(
                document.format.as_mime().to_string(),
            ));
        }

        let text = decode_utf8(data)?;
        Ok(vec![DocumentSegment::whole(text)])
    }
}

pub(super) fn decode_utf8(data: &[u8]) -> Result<String, FileLoaderError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| FileLoaderError::ExtractionFailed(e.to_string()))?;

    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}
