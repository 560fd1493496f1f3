use std::sync::Arc;

use crate::application::services::QaService;
use crate::infrastructure::llm::LocalModels;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub qa_service: Arc<QaService>,
    pub local_models: Arc<LocalModels>,
    pub settings: Settings,
}
