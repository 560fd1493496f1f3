use axum::Json;
use serde::Serialize;

use crate::domain::Backend;

#[derive(Serialize)]
pub struct BackendInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub requires_api_key: bool,
}

/// Options for the backend selector, in display order.
pub async fn backends_handler() -> Json<Vec<BackendInfo>> {
    Json(
        Backend::ALL
            .iter()
            .map(|b| BackendInfo {
                id: b.id(),
                label: b.label(),
                requires_api_key: b.requires_credential(),
            })
            .collect(),
    )
}
