use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::application::ports::{Embedder, EmbedderError, TextGenerator, TextGeneratorError};
use crate::presentation::config::LocalModelSettings;

use super::{GenerationOptions, LocalCandleEmbedder, LocalMistralGenerator};

/// Process-wide handles to the local models. Each is loaded on first use
/// and shared by every later interaction.
pub struct LocalModels {
    settings: LocalModelSettings,
    embedder: OnceCell<Arc<dyn Embedder>>,
    generator: OnceCell<Arc<dyn TextGenerator>>,
}

impl LocalModels {
    pub fn new(settings: LocalModelSettings) -> Self {
        Self {
            settings,
            embedder: OnceCell::new(),
            generator: OnceCell::new(),
        }
    }

    /// Handles that are already loaded, e.g. test doubles.
    pub fn preloaded(embedder: Arc<dyn Embedder>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            settings: LocalModelSettings::default(),
            embedder: OnceCell::new_with(Some(embedder)),
            generator: OnceCell::new_with(Some(generator)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.embedder.initialized() && self.generator.initialized()
    }

    pub async fn embedder(&self) -> Result<Arc<dyn Embedder>, EmbedderError> {
        self.embedder
            .get_or_try_init(|| async {
                let model_id = self.settings.embedding_model.clone();
                let embedder = tokio::task::spawn_blocking(move || LocalCandleEmbedder::new(&model_id))
                    .await
                    .map_err(|e| EmbedderError::ModelLoadFailed(format!("task join error: {e}")))??;
                Ok::<Arc<dyn Embedder>, EmbedderError>(Arc::new(embedder))
            })
            .await
            .map(Arc::clone)
    }

    pub async fn generator(&self) -> Result<Arc<dyn TextGenerator>, TextGeneratorError> {
        self.generator
            .get_or_try_init(|| async {
                let model_id = self.settings.generation_model.clone();
                let revision = self.settings.generation_revision.clone();
                let options = GenerationOptions::from(&self.settings);
                let generator = tokio::task::spawn_blocking(move || {
                    LocalMistralGenerator::new(&model_id, &revision, options)
                })
                .await
                .map_err(|e| TextGeneratorError::ModelLoadFailed(format!("task join error: {e}")))??;
                Ok::<Arc<dyn TextGenerator>, TextGeneratorError>(Arc::new(generator))
            })
            .await
            .map(Arc::clone)
    }
}
