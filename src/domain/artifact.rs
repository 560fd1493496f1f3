use super::{Document, FileFormat};

/// A file exactly as the user uploaded it.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedArtifact {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedArtifact {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }

    pub fn file_format(&self) -> FileFormat {
        FileFormat::from_filename(&self.filename)
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One raw text document produced by a loader: a PDF page or a whole text file.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSegment {
    pub text: String,
    pub page: Option<u32>,
}

impl DocumentSegment {
    pub fn new(text: String, page: Option<u32>) -> Self {
        Self { text, page }
    }

    pub fn whole(text: String) -> Self {
        Self { text, page: None }
    }
}

/// Output of the ingestor, consumed once by an answer engine.
#[derive(Debug, Clone)]
pub struct IngestedDocument {
    pub document: Document,
    pub segments: Vec<DocumentSegment>,
    pub chunks: Vec<super::Chunk>,
    /// The decoded upload, kept for text and Markdown files. `None` for PDF.
    pub source_text: Option<String>,
}

impl IngestedDocument {
    /// The uploaded text as-is when available, otherwise the extracted
    /// pages separated by a blank line.
    pub fn full_text(&self) -> String {
        match &self.source_text {
            Some(source) => source.clone(),
            None => self
                .segments
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Query {
    pub question: String,
    pub artifact: UploadedArtifact,
}
