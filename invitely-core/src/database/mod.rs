pub mod memory;
pub mod ports;
#[cfg(feature = "database")]
pub mod postgres;

use std::{fmt, sync::Arc};

use memory::{InMemoryGuestRepository, InMemorySettingsRepository};
use ports::{GuestRepository, SettingsRepository};

/// The repositories a request handler needs, behind trait objects so the
/// backend is picked once at startup.
#[derive(Clone)]
pub struct RecordStore {
    pub guests: Arc<dyn GuestRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

impl RecordStore {
    pub fn new(
        guests: Arc<dyn GuestRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self { guests, settings }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryGuestRepository::new()),
            Arc::new(InMemorySettingsRepository::new()),
        )
    }

    #[cfg(feature = "database")]
    pub fn from_postgres(db: &postgres::PostgresDatabase) -> Self {
        Self::new(
            Arc::new(db.guests().clone()),
            Arc::new(db.settings().clone()),
        )
    }
}
