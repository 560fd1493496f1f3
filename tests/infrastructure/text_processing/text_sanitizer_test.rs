use docqa::infrastructure::text_processing::sanitize_extracted_text;

#[test]
fn given_hyphenated_line_break_when_sanitizing_then_word_is_rejoined() {
    assert_eq!(sanitize_extracted_text("docu-\nment text"), "document text");
}

#[test]
fn given_control_characters_and_space_runs_when_sanitizing_then_they_are_removed() {
    let raw = "\u{c}  Title   line \n\n\n\nbody\u{0} text  ";

    assert_eq!(sanitize_extracted_text(raw), "Title line\n\nbody text");
}

#[test]
fn given_ligature_when_sanitizing_then_it_is_decomposed() {
    assert_eq!(sanitize_extracted_text("\u{fb01}le"), "file");
}

#[test]
fn given_whitespace_only_page_when_sanitizing_then_result_is_empty() {
    assert!(sanitize_extracted_text(" \n\t\n ").is_empty());
}

#[test]
fn given_single_line_breaks_when_sanitizing_then_they_are_kept() {
    assert_eq!(sanitize_extracted_text("one\ntwo"), "one\ntwo");
}
