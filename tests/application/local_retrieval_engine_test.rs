use docqa::application::ports::{AnswerEngine, AnswerEngineError};
use docqa::application::services::LocalRetrievalEngine;
use docqa::domain::UploadedArtifact;
use docqa::infrastructure::persistence::InMemoryVectorStore;

use crate::helpers::{self, KeywordEmbedder, RecordingGenerator};

const TOP_K: usize = 4;
const MAX_CHUNKS: usize = 2000;

fn paragraph(topic: &str) -> String {
    format!("The {topic} paragraph. ").repeat(60)
}

#[tokio::test]
async fn given_document_when_answering_then_every_chunk_is_embedded_once_in_one_batch() {
    let embedder = KeywordEmbedder::new();
    let generator = RecordingGenerator::replying(" Blue.");
    let engine = LocalRetrievalEngine::<InMemoryVectorStore>::new(
        embedder.clone(),
        generator.clone(),
        TOP_K,
        MAX_CHUNKS,
    );
    let text = format!("{}{}{}", paragraph("sky"), paragraph("grass"), paragraph("sea"));
    let document = helpers::ingestion_service()
        .ingest(&UploadedArtifact::new("nature.txt", text.into_bytes()))
        .await
        .unwrap();

    let answer = engine
        .answer(&document, "What color is the sky?")
        .await
        .unwrap();

    assert_eq!(answer, " Blue.");
    assert_eq!(embedder.batch_calls(), 1);
    let chunk_texts: Vec<String> = document.chunks.iter().map(|c| c.text.clone()).collect();
    assert_eq!(embedder.batch_texts(), chunk_texts);
    assert_eq!(embedder.single_calls(), 1);
}

#[tokio::test]
async fn given_document_when_answering_then_question_goes_straight_to_qa_prompt() {
    let generator = RecordingGenerator::replying("Blue.");
    let engine = LocalRetrievalEngine::<InMemoryVectorStore>::new(
        KeywordEmbedder::new(),
        generator.clone(),
        TOP_K,
        MAX_CHUNKS,
    );
    let document = helpers::ingestion_service()
        .ingest(&UploadedArtifact::new("notes.txt", b"The sky is blue.".to_vec()))
        .await
        .unwrap();

    engine.answer(&document, "What color is the sky?").await.unwrap();

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1, "no condense step with empty history");
    assert!(prompts[0].contains("The sky is blue."));
    assert!(prompts[0].ends_with("Question: What color is the sky?\nHelpful Answer:"));
}

#[tokio::test]
async fn given_document_over_chunk_limit_when_answering_then_fails_before_embedding() {
    let embedder = KeywordEmbedder::new();
    let engine = LocalRetrievalEngine::<InMemoryVectorStore>::new(
        embedder.clone(),
        RecordingGenerator::replying("unused"),
        TOP_K,
        2,
    );
    let document = helpers::ingestion_service()
        .ingest(&UploadedArtifact::new("long.txt", "z".repeat(5000).into_bytes()))
        .await
        .unwrap();

    let result = engine.answer(&document, "Anything?").await;

    assert!(matches!(
        result,
        Err(AnswerEngineError::DocumentTooLarge { chunks: 6, limit: 2 })
    ));
    assert_eq!(embedder.batch_calls(), 0);
}

#[tokio::test]
async fn given_document_without_chunks_when_answering_then_returns_empty_document() {
    let generator = RecordingGenerator::replying("unused");
    let engine = LocalRetrievalEngine::<InMemoryVectorStore>::new(
        KeywordEmbedder::new(),
        generator.clone(),
        TOP_K,
        MAX_CHUNKS,
    );
    let document = helpers::ingestion_service()
        .ingest(&UploadedArtifact::new("empty.md", Vec::new()))
        .await
        .unwrap();

    let result = engine.answer(&document, "Anything?").await;

    assert!(matches!(result, Err(AnswerEngineError::EmptyDocument)));
    assert!(generator.prompts().is_empty());
}
