//! # Invitely Server
//!
//! Guest-list backend for a wedding: invitees are created, updated and
//! checked in over HTTP, and every change is pushed to the dashboards
//! connected on `/ws`.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
