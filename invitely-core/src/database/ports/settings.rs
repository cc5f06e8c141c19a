use async_trait::async_trait;

use crate::domain::settings::{EventSettings, EventSettingsInput};
use crate::error::Result;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get_settings(&self, slug: &str) -> Result<Option<EventSettings>>;

    /// Most recently updated record that is marked active.
    async fn active_settings(&self) -> Result<Option<EventSettings>>;

    /// Create the record for `input.slug`, or replace its fields if it
    /// exists. The id of an existing record is kept.
    async fn upsert_settings(
        &self,
        input: EventSettingsInput,
    ) -> Result<EventSettings>;
}
