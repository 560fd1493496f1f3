use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::{Chunk, DocumentId, DocumentSegment};

/// Fixed-size character windows with a constant overlap between neighbours.
#[derive(Debug, Clone, Copy)]
pub struct CharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl CharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, TextSplitterError> {
        if chunk_size == 0 {
            return Err(TextSplitterError::InvalidConfiguration(
                "chunk_size must be positive".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(TextSplitterError::InvalidConfiguration(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn step(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

#[async_trait]
impl TextSplitter for CharacterSplitter {
    async fn split(
        &self,
        segment: &DocumentSegment,
        document_id: DocumentId,
    ) -> Result<Vec<Chunk>, TextSplitterError> {
        let chars: Vec<char> = segment.text.chars().collect();
        let total_len = chars.len();
        let mut chunks = Vec::with_capacity(total_len.div_ceil(self.step()));

        let mut offset = 0;
        while offset < total_len {
            let end = (offset + self.chunk_size).min(total_len);
            let chunk_text: String = chars[offset..end].iter().collect();

            chunks.push(Chunk::new(chunk_text, document_id, segment.page, offset));

            if end == total_len {
                break;
            }
            offset += self.step();
        }

        Ok(chunks)
    }
}
