use std::sync::LazyLock;

use regex::Regex;

const MAX_VISIBLE_CHARS: usize = 100;

static SECRET_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bbearer\s+[^\s&'\x22]+", "Bearer [REDACTED]"),
        (
            r"(?i)\b(?P<key>api_key|password|secret|token)=[^\s&'\x22]+",
            "$key=[REDACTED]",
        ),
        (r"\bsk-[A-Za-z0-9_\-]{8,}", "sk-[REDACTED]"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("secret pattern is a valid regex"),
            replacement,
        )
    })
    .collect()
});

/// Makes user-supplied text safe to put in a log line: truncated, with
/// anything that looks like a credential redacted.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let mut redacted = trimmed.to_string();
    for (pattern, replacement) in SECRET_PATTERNS.iter() {
        redacted = pattern.replace_all(&redacted, *replacement).into_owned();
    }

    let total_chars = redacted.chars().count();
    if total_chars > MAX_VISIBLE_CHARS {
        let visible: String = redacted.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{visible}... ({total_chars} chars total)")
    } else {
        redacted
    }
}
