use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::application::services::DEFAULT_SYSTEM_PROMPT;

/// Runtime configuration. Every field has a default, so an empty
/// environment yields a working local setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub hosted: HostedLlmSettings,
    pub local: LocalModelSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub upload: UploadSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Defaults, then `appsettings.{environment}.toml` if present, then
    /// `APP_*` variables with `__` between nested keys (`APP_SERVER__PORT`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str().to_lowercase()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// The OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostedLlmSettings {
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
}

impl Default for HostedLlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Models pulled from the Hugging Face hub for the local backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalModelSettings {
    pub generation_model: String,
    pub generation_revision: String,
    pub embedding_model: String,
    pub max_new_tokens: usize,
    /// `None` means greedy decoding.
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub seed: u64,
    pub repeat_penalty: f32,
    pub repeat_last_n: usize,
}

impl Default for LocalModelSettings {
    fn default() -> Self {
        Self {
            generation_model: "mistralai/Mistral-7B-v0.1".to_string(),
            generation_revision: "main".to_string(),
            embedding_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            max_new_tokens: 256,
            temperature: None,
            top_p: None,
            seed: 299_792_458,
            repeat_penalty: 1.1,
            repeat_last_n: 64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    /// Upper bound on chunks embedded for a single document.
    pub max_chunks: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_chunks: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub max_file_size_mb: usize,
}

impl UploadSettings {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_size_mb: 200,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub json: bool,
}
