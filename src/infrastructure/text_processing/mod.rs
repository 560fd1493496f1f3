mod character_splitter;
mod composite_file_loader;
mod markdown_adapter;
mod pdf_adapter;
mod plain_text_adapter;
mod text_sanitizer;

pub use character_splitter::CharacterSplitter;
pub use composite_file_loader::CompositeFileLoader;
pub use markdown_adapter::{MarkdownAdapter, markdown_to_text};
pub use pdf_adapter::PdfAdapter;
pub use plain_text_adapter::PlainTextAdapter;
pub use text_sanitizer::sanitize_extracted_text;
