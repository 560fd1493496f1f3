mod answer_engine_factory;
mod device;
mod local_candle_embedder;
mod local_mistral_generator;
mod local_models;
mod openai_client;

pub use answer_engine_factory::AnswerEngineFactory;
pub use device::{select_device, select_dtype};
pub use local_candle_embedder::LocalCandleEmbedder;
pub use local_mistral_generator::{GenerationOptions, LocalMistralGenerator, parse_shard_names};
pub use local_models::LocalModels;
pub use openai_client::OpenAiClient;
