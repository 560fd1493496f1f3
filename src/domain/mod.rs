mod artifact;
mod backend;
mod chunk;
mod document;
mod embedding;
mod message;
mod message_role;

pub use artifact::{DocumentSegment, IngestedDocument, Query, UploadedArtifact};
pub use backend::Backend;
pub use chunk::{Chunk, ChunkId, DocumentId};
pub use document::{Document, DocumentFormat, FileFormat};
pub use embedding::Embedding;
pub use message::Message;
pub use message_role::MessageRole;
