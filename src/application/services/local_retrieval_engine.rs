use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use super::conversational_retrieval_chain::{ChainInput, ConversationalRetrievalChain};
use crate::application::ports::{
    AnswerEngine, AnswerEngineError, Embedder, TextGenerator, VectorStore,
};
use crate::domain::IngestedDocument;

/// Embeds the chunks into a fresh index and asks a local model through a retrieval chain.
///
/// The index type is created per interaction and dropped afterwards.
pub struct LocalRetrievalEngine<V> {
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn TextGenerator>,
    top_k: usize,
    max_chunks: usize,
    _index: PhantomData<fn() -> V>,
}

impl<V> LocalRetrievalEngine<V>
where
    V: VectorStore + Default + 'static,
{
    pub fn new(
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn TextGenerator>,
        top_k: usize,
        max_chunks: usize,
    ) -> Self {
        Self {
            embedder,
            generator,
            top_k,
            max_chunks,
            _index: PhantomData,
        }
    }

    async fn build_index(&self, document: &IngestedDocument) -> Result<Arc<V>, AnswerEngineError> {
        let chunk_count = document.chunks.len();

        if chunk_count == 0 {
            return Err(AnswerEngineError::EmptyDocument);
        }
        if chunk_count > self.max_chunks {
            return Err(AnswerEngineError::DocumentTooLarge {
                chunks: chunk_count,
                limit: self.max_chunks,
            });
        }

        let texts: Vec<&str> = document.chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let index = Arc::new(V::default());
        index.upsert(&document.chunks, &embeddings).await?;

        let indexed = index.count().await;
        tracing::info!(
            chunk_count,
            indexed,
            "Built in-memory vector index"
        );

        Ok(index)
    }
}

#[async_trait]
impl<V> AnswerEngine for LocalRetrievalEngine<V>
where
    V: VectorStore + Default + 'static,
{
    #[tracing::instrument(
        skip(self, document, question),
        fields(document_id = %document.document.id.as_uuid(), chunk_count = document.chunks.len())
    )]
    async fn answer(
        &self,
        document: &IngestedDocument,
        question: &str,
    ) -> Result<String, AnswerEngineError> {
        let index = self.build_index(document).await?;

        let chain = ConversationalRetrievalChain::new(
            Arc::clone(&self.embedder),
            Arc::clone(&self.generator),
            index,
            self.top_k,
        );

        let output = chain
            .invoke(ChainInput {
                question,
                chat_history: &[],
            })
            .await?;

        Ok(output.answer)
    }
}
