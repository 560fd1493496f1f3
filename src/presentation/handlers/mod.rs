mod ask;
mod backends;
mod health;
mod index;

pub use ask::{AskResponse, ErrorResponse, ask_handler};
pub use backends::{BackendInfo, backends_handler};
pub use health::{HealthResponse, health_handler};
pub use index::index_handler;
