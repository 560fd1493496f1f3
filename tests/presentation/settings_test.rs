use config::{Config, File, FileFormat};

use docqa::application::services::DEFAULT_SYSTEM_PROMPT;
use docqa::presentation::config::UploadSettings;
use docqa::presentation::{Environment, Settings};

fn settings_from_toml(toml: &str) -> Settings {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn given_no_configuration_when_using_defaults_then_matches_documented_values() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.hosted.base_url, "https://api.openai.com/v1");
    assert_eq!(settings.hosted.model, "gpt-3.5-turbo");
    assert_eq!(settings.hosted.system_prompt, "You are a helpful assistant.");
    assert_eq!(settings.hosted.system_prompt, DEFAULT_SYSTEM_PROMPT);
    assert_eq!(settings.local.generation_model, "mistralai/Mistral-7B-v0.1");
    assert_eq!(
        settings.local.embedding_model,
        "sentence-transformers/all-MiniLM-L6-v2"
    );
    assert_eq!(settings.local.temperature, None);
    assert_eq!(settings.chunking.chunk_size, 1000);
    assert_eq!(settings.chunking.chunk_overlap, 100);
    assert_eq!(settings.retrieval.top_k, 4);
    assert_eq!(settings.retrieval.max_chunks, 2000);
    assert_eq!(settings.upload.max_file_size_mb, 200);
    assert!(!settings.logging.json);
}

#[test]
fn given_test_environment_without_overlay_file_when_loading_then_succeeds_with_defaults() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.chunking.chunk_size, 1000);
    assert_eq!(settings.hosted.model, "gpt-3.5-turbo");
}

#[test]
fn given_partial_overlay_when_deserializing_then_unset_fields_keep_defaults() {
    let settings = settings_from_toml(
        r#"
        [server]
        port = 8080

        [local]
        temperature = 0.7

        [logging]
        json = true
        "#,
    );

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.local.temperature, Some(0.7));
    assert_eq!(settings.local.max_new_tokens, 256);
    assert!(settings.logging.json);
    assert_eq!(settings.retrieval.top_k, 4);
}

#[test]
fn given_upload_limit_in_megabytes_when_converting_then_returns_bytes() {
    let upload = UploadSettings {
        max_file_size_mb: 200,
    };

    assert_eq!(upload.max_file_size_bytes(), 200 * 1024 * 1024);
}
