use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

use super::device::{select_device, select_dtype};

/// Texts per forward pass; bounds padding memory for long documents.
const ENCODE_BATCH_SIZE: usize = 32;

/// Sentence embeddings from a BERT-family model on the Hugging Face hub:
/// mean pooling over the attention mask followed by L2 normalisation.
pub struct LocalCandleEmbedder {
    encoder: Arc<BertEncoder>,
}

struct BertEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl LocalCandleEmbedder {
    /// Downloads (or reuses the cached) model files. Blocking.
    pub fn new(model_id: &str) -> Result<Self, EmbedderError> {
        let device = select_device();

        tracing::info!(
            device = ?device,
            model = model_id,
            "Initializing local Candle embedding model"
        );

        let api = Api::new().map_err(|e| EmbedderError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("tokenizer.json: {}", e)))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("model.safetensors: {}", e)))?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: BertConfig = serde_json::from_str(&config_contents)
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("tokenizer: {}", e)))?;

        tokenizer
            .with_padding(None)
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: config.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("truncation config: {}", e)))?;

        let dtype = select_dtype(&device);

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], dtype, &device)
                .map_err(|e| EmbedderError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = BertModel::load(vb, &config)
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("model: {}", e)))?;

        tracing::info!("Local Candle embedding model loaded");

        Ok(Self {
            encoder: Arc::new(BertEncoder {
                model,
                tokenizer,
                device,
            }),
        })
    }

    async fn encode(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let encoder = Arc::clone(&self.encoder);
        tokio::task::spawn_blocking(move || {
            let mut vectors = Vec::with_capacity(texts.len());
            for batch in texts.chunks(ENCODE_BATCH_SIZE) {
                vectors.extend(encoder.encode_batch(batch)?);
            }
            Ok(vectors)
        })
        .await
        .map_err(|e| EmbedderError::InferenceFailed(format!("task join error: {e}")))?
    }
}

fn inference_err(e: candle_core::Error) -> EmbedderError {
    EmbedderError::InferenceFailed(e.to_string())
}

impl BertEncoder {
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbedderError::InferenceFailed(format!("tokenization: {}", e)))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let batch_size = texts.len();
        let mut input_ids = Vec::with_capacity(batch_size * max_len);
        let mut type_ids = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask = Vec::with_capacity(batch_size * max_len);

        for encoding in &encodings {
            let pad_len = max_len - encoding.get_ids().len();

            input_ids.extend_from_slice(encoding.get_ids());
            input_ids.extend(std::iter::repeat_n(0u32, pad_len));

            type_ids.extend_from_slice(encoding.get_type_ids());
            type_ids.extend(std::iter::repeat_n(0u32, pad_len));

            attention_mask.extend_from_slice(encoding.get_attention_mask());
            attention_mask.extend(std::iter::repeat_n(0u32, pad_len));
        }

        let shape = (batch_size, max_len);
        let input_ids = Tensor::from_vec(input_ids, shape, &self.device).map_err(inference_err)?;
        let token_type_ids =
            Tensor::from_vec(type_ids, shape, &self.device).map_err(inference_err)?;
        let attention_mask =
            Tensor::from_vec(attention_mask, shape, &self.device).map_err(inference_err)?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .and_then(|t| t.to_dtype(DType::F32))
            .map_err(inference_err)?;

        // Mean pooling with attention mask
        let mask = attention_mask.to_dtype(DType::F32).map_err(inference_err)?;
        let summed = hidden
            .broadcast_mul(&mask.unsqueeze(2).map_err(inference_err)?)
            .and_then(|t| t.sum(1))
            .map_err(inference_err)?;
        let token_counts = mask
            .sum(1)
            .and_then(|t| t.unsqueeze(1))
            .map_err(inference_err)?;
        let pooled: Vec<Vec<f32>> = summed
            .broadcast_div(&token_counts)
            .and_then(|t| t.to_vec2())
            .map_err(inference_err)?;

        Ok(pooled
            .into_iter()
            .map(|mut values| {
                l2_normalize(&mut values);
                values
            })
            .collect())
    }
}

fn l2_normalize(v: &mut [f32]) {
    let length: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if length > 0.0 {
        v.iter_mut().for_each(|x| *x /= length);
    }
}

#[async_trait]
impl Embedder for LocalCandleEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.encode(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .map(Embedding::new)
            .ok_or_else(|| EmbedderError::InvalidResponse("empty result".to_string()))
    }

    #[tracing::instrument(skip(self, texts), fields(batch = texts.len()))]
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let owned = texts.iter().map(|t| (*t).to_string()).collect();
        let vectors = self.encode(owned).await?;
        Ok(vectors.into_iter().map(Embedding::new).collect())
    }
}
