use axum::{Json, extract::State};
use invitely_core::DashboardStats;

use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn get_stats(
    State(state): State<AppState>,
) -> AppResult<Json<DashboardStats>> {
    let guests = state.store.guests.list_guests().await?;
    Ok(Json(DashboardStats::from_guests(&guests)))
}
