use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{AnswerEngineError, EngineProviderError};
use crate::application::services::{AskRequest, IngestionError, Notice, Outcome, QaError};
use crate::domain::{Backend, UploadedArtifact};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type.";

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AskResponse {
    Answered { backend: Backend, answer: String },
    AwaitingInput { notice: &'static str },
    Notice { notice: &'static str },
}

impl From<Outcome> for AskResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Answered(answer) => AskResponse::Answered {
                backend: answer.backend,
                answer: answer.text,
            },
            Outcome::Notice(notice @ Notice::AwaitingInput) => AskResponse::AwaitingInput {
                notice: notice.message(),
            },
            Outcome::Notice(notice @ Notice::MissingCredential) => AskResponse::Notice {
                notice: notice.message(),
            },
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Default)]
struct AskForm {
    backend: Option<String>,
    api_key: Option<String>,
    artifact: Option<UploadedArtifact>,
    question: Option<String>,
}

async fn read_form(multipart: &mut Multipart) -> Result<AskForm, MultipartError> {
    let mut form = AskForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "backend" => form.backend = Some(field.text().await?),
            "api_key" => form.api_key = Some(field.text().await?),
            "question" => form.question = Some(field.text().await?),
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                // Browsers send an empty, nameless part when no file is chosen.
                if !filename.is_empty() {
                    form.artifact = Some(UploadedArtifact::new(filename, data.to_vec()));
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(form)
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn qa_error_response(error: &QaError) -> Response {
    let status = match error {
        QaError::Ingestion(IngestionError::UnsupportedFormat(_)) => {
            return error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                UNSUPPORTED_FILE_TYPE.to_string(),
            );
        }
        QaError::EngineSelection(EngineProviderError::MissingCredential(_)) => {
            return (
                StatusCode::OK,
                Json(AskResponse::from(Outcome::Notice(Notice::MissingCredential))),
            )
                .into_response();
        }
        QaError::Ingestion(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QaError::Engine(AnswerEngineError::DocumentTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        QaError::Engine(AnswerEngineError::EmptyDocument) => StatusCode::UNPROCESSABLE_ENTITY,
        QaError::Engine(_) | QaError::EngineSelection(_) => StatusCode::BAD_GATEWAY,
    };

    error_response(status, error.to_string())
}

#[tracing::instrument(skip(state, multipart))]
pub async fn ask_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read multipart");
            return error_response(e.status(), format!("Failed to read multipart: {}", e.body_text()));
        }
    };

    let backend = match form.backend.as_deref().map(str::parse::<Backend>).transpose() {
        Ok(backend) => backend.unwrap_or(Backend::HostedApi),
        Err(e) => {
            tracing::warn!(error = %e, "Unknown backend");
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    };

    tracing::info!(
        backend = backend.id(),
        filename = form.artifact.as_ref().map(|a| a.filename.as_str()).unwrap_or_default(),
        question = %sanitize_prompt(form.question.as_deref().unwrap_or_default()),
        "Ask request received"
    );

    let request = AskRequest {
        backend,
        api_key: form.api_key,
        artifact: form.artifact,
        question: form.question,
    };

    match state.qa_service.ask(request).await {
        Ok(outcome) => (StatusCode::OK, Json(AskResponse::from(outcome))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Interaction failed");
            qa_error_response(&e)
        }
    }
}
