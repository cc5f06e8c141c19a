use axum::{Json, extract::State};
use serde::Serialize;

use crate::infra::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: String,
    pub observers: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        storage: state.config().storage.backend.to_string(),
        observers: state.hub.len(),
    })
}
