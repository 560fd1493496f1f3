mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ChunkingSettings, HostedLlmSettings, LocalModelSettings, LoggingSettings, RetrievalSettings,
    ServerSettings, Settings, UploadSettings,
};
