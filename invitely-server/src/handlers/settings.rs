use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use invitely_core::{EventSettings, EventSettingsInput, NotificationEvent};
use tracing::info;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

pub async fn get_active_settings(
    State(state): State<AppState>,
) -> AppResult<Json<EventSettings>> {
    state
        .store
        .settings
        .active_settings()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("No active event settings"))
}

pub async fn get_settings_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<EventSettings>> {
    state
        .store
        .settings
        .get_settings(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Event {slug} not found")))
}

pub async fn upsert_settings(
    State(state): State<AppState>,
    payload: Result<Json<EventSettingsInput>, JsonRejection>,
) -> AppResult<Json<EventSettings>> {
    let Json(input) = payload?;
    let settings = state.store.settings.upsert_settings(input).await?;

    info!(slug = %settings.slug, "event settings saved");
    state.publish(NotificationEvent::SettingsUpdated {
        data: settings.clone(),
    });

    Ok(Json(settings))
}
