use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static HYPHENATED_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<head>\w)-[ \t]*\r?\n[ \t]*(?P<tail>\w)")
        .expect("hyphenation pattern is a valid regex")
});

/// Cleans raw PDF page text: NFKC-normalises ligatures, drops control
/// characters, re-joins words hyphenated across lines and collapses runs of
/// whitespace. Paragraph breaks survive as a single blank line.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw
        .nfkc()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    let joined = HYPHENATED_LINE_BREAK.replace_all(&normalized, "$head$tail");

    let mut out = String::with_capacity(joined.len());
    let mut pending_blank = false;

    for line in joined.lines().map(str::trim) {
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push_str(if pending_blank { "\n\n" } else { "\n" });
        }
        push_collapsed(line, &mut out);
        pending_blank = false;
    }

    out
}

fn push_collapsed(line: &str, out: &mut String) {
    let mut words = line.split_whitespace();
    if let Some(first) = words.next() {
        out.push_str(first);
    }
    for word in words {
        out.push(' ');
        out.push_str(word);
    }
}

