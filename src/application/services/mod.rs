mod conversational_retrieval_chain;
mod hosted_completion_engine;
mod ingestion_service;
mod local_retrieval_engine;
mod qa_service;

pub use conversational_retrieval_chain::{
    ChainInput, ChainOutput, ConversationalRetrievalChain, condense_question_prompt, qa_prompt,
};
pub use hosted_completion_engine::{DEFAULT_SYSTEM_PROMPT, HostedCompletionEngine, article_prompt};
pub use ingestion_service::{IngestionError, IngestionService};
pub use local_retrieval_engine::LocalRetrievalEngine;
pub use qa_service::{Answer, AskRequest, Notice, Outcome, QaError, QaService};
