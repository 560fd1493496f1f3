use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{SearchResult, VectorStore, VectorStoreError};
use crate::domain::{Chunk, Embedding};

/// Brute-force cosine index held in process memory for one interaction.
#[derive(Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<(Chunk, Embedding)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        if chunks.len() != embeddings.len() {
            return Err(VectorStoreError::LengthMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }

        let mut entries = self.entries.write().await;

        let expected = entries
            .first()
            .map(|(_, e)| e.dimensions())
            .or_else(|| embeddings.first().map(Embedding::dimensions));
        if let Some(expected) = expected {
            if let Some(bad) = embeddings.iter().find(|e| e.dimensions() != expected) {
                return Err(VectorStoreError::DimensionMismatch {
                    expected,
                    actual: bad.dimensions(),
                });
            }
        }

        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            match entries.iter_mut().find(|(c, _)| c.id == chunk.id) {
                Some(entry) => *entry = (chunk.clone(), embedding.clone()),
                None => entries.push((chunk.clone(), embedding.clone())),
            }
        }

        Ok(())
    }

    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        let entries = self.entries.read().await;

        if let Some((_, first)) = entries.first() {
            if first.dimensions() != embedding.dimensions() {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: first.dimensions(),
                    actual: embedding.dimensions(),
                });
            }
        }

        let mut results: Vec<SearchResult> = entries
            .iter()
            .map(|(chunk, stored)| SearchResult {
                chunk: chunk.clone(),
                score: embedding.cosine_similarity(stored),
            })
            .collect();

        // Stable: equal scores keep insertion order.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);

        Ok(results)
    }

    async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}
