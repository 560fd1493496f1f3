use std::sync::Arc;

use crate::application::ports::{
    AnswerEngineError, Embedder, SearchResult, TextGenerator, VectorStore,
};
use crate::domain::{Message, MessageRole};

pub struct ChainInput<'a> {
    pub question: &'a str,
    pub chat_history: &'a [Message],
}

#[derive(Debug, Clone)]
pub struct ChainOutput {
    pub answer: String,
    pub generated_question: String,
    pub source_chunks: Vec<SearchResult>,
}

/// Retrieval-augmented QA: optionally condense history into a standalone
/// question, retrieve the closest chunks, then stuff them into one prompt.
pub struct ConversationalRetrievalChain<V: ?Sized> {
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn TextGenerator>,
    retriever: Arc<V>,
    top_k: usize,
}

impl<V> ConversationalRetrievalChain<V>
where
    V: VectorStore + ?Sized,
{
    pub fn new(
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn TextGenerator>,
        retriever: Arc<V>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            generator,
            retriever,
            top_k,
        }
    }

    #[tracing::instrument(skip_all, fields(history_len = input.chat_history.len(), top_k = self.top_k))]
    pub async fn invoke(&self, input: ChainInput<'_>) -> Result<ChainOutput, AnswerEngineError> {
        let generated_question = if input.chat_history.is_empty() {
            input.question.to_string()
        } else {
            let prompt = condense_question_prompt(input.chat_history, input.question);
            self.generator.generate(&prompt).await?.trim().to_string()
        };

        let query_embedding = self.embedder.embed(&generated_question).await?;
        let source_chunks = self.retriever.search(&query_embedding, self.top_k).await?;

        tracing::debug!(retrieved = source_chunks.len(), "Retrieved context chunks");

        let context = source_chunks
            .iter()
            .map(|r| r.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = qa_prompt(&context, &generated_question);
        let answer = self.generator.generate(&prompt).await?;

        Ok(ChainOutput {
            answer,
            generated_question,
            source_chunks,
        })
    }
}

pub fn qa_prompt(context: &str, question: &str) -> String {
    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n\
         {context}\n\nQuestion: {question}\nHelpful Answer:"
    )
}

pub fn condense_question_prompt(chat_history: &[Message], question: &str) -> String {
    let chat_history = format_chat_history(chat_history);
    format!(
        "Given the following conversation and a follow up question, \
         rephrase the follow up question to be a standalone question, in its original language.\n\n\
         Chat History:\n{chat_history}\nFollow Up Input: {question}\nStandalone question:"
    )
}

fn format_chat_history(chat_history: &[Message]) -> String {
    chat_history
        .iter()
        .map(|m| {
            let speaker = match m.role {
                MessageRole::User => "Human",
                MessageRole::Assistant => "Assistant",
                MessageRole::System => "System",
            };
            format!("{}: {}", speaker, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
