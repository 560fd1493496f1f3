use async_trait::async_trait;
use pulldown_cmark::{Event, Parser, TagEnd};

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{Document, DocumentFormat, DocumentSegment};

use super::plain_text_adapter::decode_utf8;

/// Loads a `.md` file as a single segment of its rendered text, markup removed.
pub struct MarkdownAdapter;

#[async_trait]
impl FileLoader for MarkdownAdapter {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    async fn load(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<Vec<DocumentSegment>, FileLoaderError> {
        if document.format != DocumentFormat::Markdown {
            return Err(FileLoaderError::UnsupportedContentType(
                document.format.as_mime().to_string(),
            ));
        }

        let source = decode_utf8(data)?;
        Ok(vec![DocumentSegment::whole(markdown_to_text(&source))])
    }
}

/// Block elements end up separated by a blank line, list items by a newline.
pub fn markdown_to_text(source: &str) -> String {
    let mut out = String::with_capacity(source.len());

    for event in Parser::new(source) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::End(TagEnd::Item) => push_separator(&mut out, "\n"),
            Event::End(TagEnd::TableCell) => out.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::CodeBlock
                | TagEnd::TableHead
                | TagEnd::TableRow,
            ) => push_separator(&mut out, "\n\n"),
            _ => {}
        }
    }

    out.trim().to_string()
}

fn push_separator(out: &mut String, separator: &str) {
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    if !out.is_empty() {
        out.push_str(separator);
    }
}
