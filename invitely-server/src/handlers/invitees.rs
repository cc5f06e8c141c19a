use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use invitely_core::{
    Guest, GuestId, GuestUpdate, NewGuest, NotificationEvent,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Ids that do not parse were never issued, so they are simply not found.
fn parse_guest_id(raw: &str) -> AppResult<GuestId> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::not_found(format!("Invitee {raw} not found")))
}

pub async fn list_invitees(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Guest>>> {
    let guests = state.store.guests.list_guests().await?;
    Ok(Json(guests))
}

pub async fn create_invitee(
    State(state): State<AppState>,
    payload: Result<Json<NewGuest>, JsonRejection>,
) -> AppResult<Json<Guest>> {
    let Json(new_guest) = payload?;
    let guest = state.store.guests.create_guest(new_guest).await?;

    info!(guest.id = %guest.id, "invitee created");
    state.publish(NotificationEvent::NewInvitee {
        data: guest.clone(),
    });

    Ok(Json(guest))
}

pub async fn get_invitee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Guest>> {
    let id = parse_guest_id(&id)?;
    state
        .store
        .guests
        .get_guest(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Invitee {id} not found")))
}

pub async fn update_invitee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<GuestUpdate>, JsonRejection>,
) -> AppResult<Json<Guest>> {
    let id = parse_guest_id(&id)?;
    let Json(update) = payload?;

    if update.is_empty() {
        return state
            .store
            .guests
            .get_guest(id)
            .await?
            .map(Json)
            .ok_or_else(|| {
                AppError::not_found(format!("Invitee {id} not found"))
            });
    }

    let guest = state.store.guests.update_guest(id, update).await?;

    info!(guest.id = %guest.id, "invitee updated");
    state.publish(NotificationEvent::InviteeUpdated {
        data: guest.clone(),
    });

    Ok(Json(guest))
}

pub async fn delete_invitee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_guest_id(&id)?;

    if !state.store.guests.delete_guest(id).await? {
        return Err(AppError::not_found(format!("Invitee {id} not found")));
    }

    info!(guest.id = %id, "invitee removed");
    state.publish(NotificationEvent::InviteeRemoved { id });

    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_in_invitee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    let id = parse_guest_id(&id)?;
    let guest = state.store.guests.check_in(id).await?;

    info!(guest.id = %guest.id, "invitee checked in");
    state.publish(NotificationEvent::Checkin { guest: guest.name });

    Ok(Json(StatusResponse::success()))
}
