use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::mistral::{Config as MistralConfig, Model as MistralModel};
use hf_hub::api::sync::{Api, ApiRepo};
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{TextGenerator, TextGeneratorError};
use crate::presentation::config::LocalModelSettings;

use super::device::{select_device, select_dtype};

const EOS_TOKEN: &str = "</s>";

/// Decoding parameters for one `generate` call.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub max_new_tokens: usize,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub seed: u64,
    pub repeat_penalty: f32,
    pub repeat_last_n: usize,
}

impl From<&LocalModelSettings> for GenerationOptions {
    fn from(settings: &LocalModelSettings) -> Self {
        Self {
            max_new_tokens: settings.max_new_tokens,
            temperature: settings.temperature,
            top_p: settings.top_p,
            seed: settings.seed,
            repeat_penalty: settings.repeat_penalty,
            repeat_last_n: settings.repeat_last_n,
        }
    }
}

/// Collects the distinct shard file names from a `model.safetensors.index.json`.
pub fn parse_shard_names(index_json: &str) -> Result<Vec<String>, TextGeneratorError> {
    let index: serde_json::Value = serde_json::from_str(index_json)
        .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("parse index.json: {e}")))?;

    let weight_map = index
        .get("weight_map")
        .and_then(|v| v.as_object())
        .ok_or_else(|| {
            TextGeneratorError::ModelLoadFailed("index.json missing weight_map object".to_string())
        })?;

    let names: BTreeSet<String> = weight_map
        .values()
        .filter_map(|v| v.as_str())
        .map(str::to_owned)
        .collect();

    if names.is_empty() {
        return Err(TextGeneratorError::ModelLoadFailed(
            "index.json weight_map contains no shard filenames".to_string(),
        ));
    }

    Ok(names.into_iter().collect())
}

/// A Mistral causal LM run through candle as a text-generation pipeline.
/// The KV cache lives in the model, so calls are serialised by a mutex.
pub struct LocalMistralGenerator {
    model: Arc<Mutex<MistralModel>>,
    tokenizer: Arc<Tokenizer>,
    device: Device,
    eos_token: Option<u32>,
    options: GenerationOptions,
}

impl LocalMistralGenerator {
    /// Downloads (or reuses the cached) weights and builds the model. Blocking.
    pub fn new(
        model_id: &str,
        revision: &str,
        options: GenerationOptions,
    ) -> Result<Self, TextGeneratorError> {
        let device = select_device();

        tracing::info!(
            model = model_id,
            revision,
            device = ?device,
            "Initializing local generation model"
        );

        let api = Api::new()
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("hf-hub init failed: {e}")))?;
        let repo = api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("tokenizer.json: {e}")))?;
        let config_path = repo
            .get("config.json")
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("config.json: {e}")))?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("read config: {e}")))?;
        let config: MistralConfig = serde_json::from_str(&config_contents)
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("parse config: {e}")))?;

        let weight_paths = Self::load_weights(&repo)?;
        let dtype = select_dtype(&device);

        // SAFETY: safetensors files are memory-mapped read-only from a locally cached HF repo.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&weight_paths, dtype, &device)
                .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("load weights: {e}")))?
        };

        let model = MistralModel::new(&config, vb)
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("model init: {e}")))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("tokenizer: {e}")))?;
        let eos_token = tokenizer.token_to_id(EOS_TOKEN);

        tracing::info!("Local generation model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            tokenizer: Arc::new(tokenizer),
            device,
            eos_token,
            options,
        })
    }

    fn load_weights(repo: &ApiRepo) -> Result<Vec<PathBuf>, TextGeneratorError> {
        if let Ok(path) = repo.get("model.safetensors") {
            tracing::info!("Loading single-shard model.safetensors");
            return Ok(vec![path]);
        }

        let index_path = repo.get("model.safetensors.index.json").map_err(|e| {
            TextGeneratorError::ModelLoadFailed(format!("model.safetensors.index.json: {e}"))
        })?;
        let index_str = std::fs::read_to_string(&index_path)
            .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("read index.json: {e}")))?;

        let shard_names = parse_shard_names(&index_str)?;

        tracing::info!(shard_count = shard_names.len(), "Downloading weight shards");

        shard_names
            .iter()
            .map(|name| {
                repo.get(name)
                    .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("shard {name}: {e}")))
            })
            .collect()
    }
}

fn generation_err(e: impl std::fmt::Display) -> TextGeneratorError {
    TextGeneratorError::GenerationFailed(e.to_string())
}

fn run_generation(
    model: &Mutex<MistralModel>,
    tokenizer: &Tokenizer,
    device: &Device,
    eos_token: Option<u32>,
    options: &GenerationOptions,
    prompt: &str,
) -> Result<String, TextGeneratorError> {
    let mut tokens: Vec<u32> = tokenizer
        .encode(prompt, true)
        .map_err(|e| generation_err(format!("tokenize prompt: {e}")))?
        .get_ids()
        .to_vec();
    let prompt_len = tokens.len();

    let mut logits_processor = LogitsProcessor::new(options.seed, options.temperature, options.top_p);

    let mut model = model.blocking_lock();
    model.clear_kv_cache();

    for step in 0..options.max_new_tokens {
        let context_size = if step > 0 { 1 } else { tokens.len() };
        let start_pos = tokens.len().saturating_sub(context_size);

        let input = Tensor::new(&tokens[start_pos..], device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(generation_err)?;

        let logits = model
            .forward(&input, start_pos)
            .and_then(|l| l.squeeze(0))
            .and_then(|l| l.squeeze(0))
            .and_then(|l| l.to_dtype(DType::F32))
            .map_err(generation_err)?;

        let logits = if (options.repeat_penalty - 1.0).abs() < f32::EPSILON {
            logits
        } else {
            let start_at = tokens.len().saturating_sub(options.repeat_last_n);
            candle_transformers::utils::apply_repeat_penalty(
                &logits,
                options.repeat_penalty,
                &tokens[start_at..],
            )
            .map_err(generation_err)?
        };

        let next_token = logits_processor.sample(&logits).map_err(generation_err)?;
        if Some(next_token) == eos_token {
            break;
        }
        tokens.push(next_token);
    }

    let generated = &tokens[prompt_len..];
    tracing::debug!(new_tokens = generated.len(), "Generation finished");

    tokenizer
        .decode(generated, true)
        .map_err(|e| generation_err(format!("decode: {e}")))
}

#[async_trait]
impl TextGenerator for LocalMistralGenerator {
    #[tracing::instrument(skip(self, prompt), fields(prompt_chars = prompt.chars().count()))]
    async fn generate(&self, prompt: &str) -> Result<String, TextGeneratorError> {
        let model = Arc::clone(&self.model);
        let tokenizer = Arc::clone(&self.tokenizer);
        let device = self.device.clone();
        let eos_token = self.eos_token;
        let options = self.options.clone();
        let prompt = prompt.to_string();

        tokio::task::spawn_blocking(move || {
            run_generation(&model, &tokenizer, &device, eos_token, &options, &prompt)
        })
        .await
        .map_err(|e| generation_err(format!("task join error: {e}")))?
    }
}
