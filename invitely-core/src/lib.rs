//! Core library for Invitely.
//!
//! Holds the guest and event-settings records, the repository ports the
//! server depends on, the storage adapters behind them, and the
//! notification payloads pushed to live observers.

pub mod database;
pub mod domain;
pub mod error;

pub use database::RecordStore;
pub use domain::{
    DashboardStats, EventSettings, EventSettingsInput, Guest, GuestId,
    GuestUpdate, NewGuest, NotificationEvent, RsvpStatus,
};
pub use error::{Result, StoreError};

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
