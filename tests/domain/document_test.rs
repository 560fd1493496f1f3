use docqa::domain::{Document, DocumentFormat, FileFormat};

#[test]
fn given_supported_extensions_when_classifying_then_returns_matching_format() {
    assert_eq!(FileFormat::from_filename("paper.pdf"), FileFormat::Pdf);
    assert_eq!(FileFormat::from_filename("notes.txt"), FileFormat::Text);
    assert_eq!(FileFormat::from_filename("README.md"), FileFormat::Markdown);
}

#[test]
fn given_uppercase_extension_when_classifying_then_case_is_ignored() {
    assert_eq!(FileFormat::from_filename("notes.TXT"), FileFormat::Text);
    assert_eq!(FileFormat::from_filename("Paper.Pdf"), FileFormat::Pdf);
}

#[test]
fn given_multiple_dots_when_classifying_then_only_last_segment_counts() {
    assert_eq!(FileFormat::from_filename("a.b.pdf"), FileFormat::Pdf);
    assert_eq!(
        FileFormat::from_filename("notes.md.bak"),
        FileFormat::Unsupported("bak".to_string())
    );
}

#[test]
fn given_unknown_extension_when_classifying_then_returns_unsupported_with_extension() {
    assert_eq!(
        FileFormat::from_filename("report.docx"),
        FileFormat::Unsupported("docx".to_string())
    );
}

#[test]
fn given_name_without_extension_when_classifying_then_unsupported_with_empty_extension() {
    assert_eq!(
        FileFormat::from_filename("Makefile"),
        FileFormat::Unsupported(String::new())
    );
    assert_eq!(
        FileFormat::from_filename("archive."),
        FileFormat::Unsupported(String::new())
    );
}

#[test]
fn given_document_formats_when_reading_mime_then_returns_expected_types() {
    assert_eq!(DocumentFormat::Pdf.as_mime(), "application/pdf");
    assert_eq!(DocumentFormat::Text.as_mime(), "text/plain");
    assert_eq!(DocumentFormat::Markdown.as_mime(), "text/markdown");
}

#[test]
fn given_two_documents_when_created_then_ids_differ() {
    let a = Document::new("a.txt".to_string(), DocumentFormat::Text, 1);
    let b = Document::new("a.txt".to_string(), DocumentFormat::Text, 1);

    assert_ne!(a.id, b.id);
    assert_eq!(a.size_bytes, 1);
}
