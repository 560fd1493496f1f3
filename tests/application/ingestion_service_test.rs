use docqa::application::services::IngestionError;
use docqa::domain::{DocumentFormat, UploadedArtifact};

use crate::helpers;

#[tokio::test]
async fn given_text_file_when_ingesting_then_returns_single_segment_and_chunks() {
    let service = helpers::ingestion_service();
    let artifact = UploadedArtifact::new("notes.txt", b"The sky is blue.".to_vec());

    let document = service.ingest(&artifact).await.unwrap();

    assert_eq!(document.document.format, DocumentFormat::Text);
    assert_eq!(document.segments.len(), 1);
    assert_eq!(document.full_text(), "The sky is blue.");
    assert_eq!(document.chunks.len(), 1);
    assert_eq!(document.chunks[0].text, "The sky is blue.");
    assert_eq!(document.chunks[0].document_id, document.document.id);
}

#[tokio::test]
async fn given_markdown_file_when_ingesting_then_chunks_drop_markup_and_source_is_kept() {
    let service = helpers::ingestion_service();
    let source = "# Setup\n\nInstall **everything** first.\n\n- step one\n- step two\n";
    let artifact = UploadedArtifact::new("guide.MD", source.as_bytes().to_vec());

    let document = service.ingest(&artifact).await.unwrap();
    let text = &document.segments[0].text;

    assert_eq!(document.document.format, DocumentFormat::Markdown);
    assert!(text.contains("Setup"));
    assert!(text.contains("Install everything first."));
    assert!(!text.contains('#'));
    assert!(!text.contains("**"));
    assert!(!document.chunks.is_empty());
    assert!(document.chunks.iter().all(|c| !c.text.contains("**")));
    assert_eq!(document.source_text.as_deref(), Some(source));
    assert_eq!(document.full_text(), source);
}

#[tokio::test]
async fn given_multi_page_pdf_when_ingesting_then_each_page_is_split_separately() {
    let service = helpers::ingestion_service();
    let pdf = helpers::pdf_with_pages(&["Photosynthesis", "Chlorophyll"]);
    let artifact = UploadedArtifact::new("biology.pdf", pdf);

    let document = service.ingest(&artifact).await.unwrap();

    assert_eq!(document.document.format, DocumentFormat::Pdf);
    assert_eq!(document.segments.len(), 2);
    assert_eq!(document.chunks.len(), 2);
    assert!(document.chunks[0].text.contains("Photosynthesis"));
    assert_eq!(document.chunks[0].page, Some(1));
    assert!(document.chunks[1].text.contains("Chlorophyll"));
    assert_eq!(document.chunks[1].page, Some(2));
}

#[tokio::test]
async fn given_long_text_when_ingesting_then_chunks_preserve_document_order() {
    let service = helpers::ingestion_service();
    let text: String = (0..2500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    let artifact = UploadedArtifact::new("long.txt", text.clone().into_bytes());

    let document = service.ingest(&artifact).await.unwrap();

    assert_eq!(document.chunks.len(), 3);
    let offsets: Vec<usize> = document.chunks.iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 900, 1800]);
    assert_eq!(document.chunks[2].text, text[1800..]);
}

#[tokio::test]
async fn given_unsupported_extension_when_ingesting_then_returns_unsupported_format() {
    let service = helpers::ingestion_service();
    let artifact = UploadedArtifact::new("slides.pptx", b"PK".to_vec());

    let result = service.ingest(&artifact).await;

    assert!(matches!(result, Err(IngestionError::UnsupportedFormat(ext)) if ext == "pptx"));
}

#[tokio::test]
async fn given_corrupt_pdf_when_ingesting_then_returns_file_loading_error() {
    let service = helpers::ingestion_service();
    let artifact = UploadedArtifact::new("broken.pdf", b"not a pdf at all".to_vec());

    let result = service.ingest(&artifact).await;

    assert!(matches!(result, Err(IngestionError::FileLoading(_))));
}

#[tokio::test]
async fn given_empty_text_file_when_ingesting_then_returns_no_chunks() {
    let service = helpers::ingestion_service();
    let artifact = UploadedArtifact::new("empty.txt", Vec::new());

    let document = service.ingest(&artifact).await.unwrap();

    assert!(document.chunks.is_empty());
}
