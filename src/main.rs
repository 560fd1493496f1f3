use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use docqa::application::services::{IngestionService, QaService};
use docqa::infrastructure::llm::{AnswerEngineFactory, LocalModels};
use docqa::infrastructure::observability::{TracingConfig, init_tracing};
use docqa::infrastructure::text_processing::{CharacterSplitter, CompositeFileLoader};
use docqa::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let settings = Settings::load(environment).context("failed to load settings")?;

    init_tracing(&TracingConfig::new(environment.as_str(), settings.logging.json).with_env_override())?;

    let text_splitter = CharacterSplitter::new(
        settings.chunking.chunk_size,
        settings.chunking.chunk_overlap,
    )
    .context("invalid chunking settings")?;

    let ingestion_service = Arc::new(IngestionService::new(
        Arc::new(CompositeFileLoader::with_default_adapters()),
        Arc::new(text_splitter),
    ));

    let local_models = Arc::new(LocalModels::new(settings.local.clone()));
    let engines = Arc::new(AnswerEngineFactory::new(
        settings.hosted.clone(),
        settings.retrieval.clone(),
        Arc::clone(&local_models),
    ));

    let state = AppState {
        qa_service: Arc::new(QaService::new(ingestion_service, engines)),
        local_models,
        settings: settings.clone(),
    };

    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        hosted_model = %settings.hosted.model,
        generation_model = %settings.local.generation_model,
        "Listening"
    );

    axum::serve(listener, router).await?;

    Ok(())
}
