//! Process-local adapters backed by insertion-ordered vectors.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::ports::{GuestRepository, SettingsRepository};
use crate::domain::{
    guest::{Guest, GuestId, GuestUpdate, NewGuest},
    settings::{EventSettings, EventSettingsInput},
};
use crate::error::{Result, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryGuestRepository {
    guests: RwLock<Vec<Guest>>,
}

impl InMemoryGuestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GuestRepository for InMemoryGuestRepository {
    async fn list_guests(&self) -> Result<Vec<Guest>> {
        Ok(self.guests.read().await.clone())
    }

    async fn create_guest(&self, guest: NewGuest) -> Result<Guest> {
        let guest = guest.into_guest(Uuid::now_v7(), Utc::now())?;
        self.guests.write().await.push(guest.clone());
        Ok(guest)
    }

    async fn get_guest(&self, id: GuestId) -> Result<Option<Guest>> {
        Ok(self
            .guests
            .read()
            .await
            .iter()
            .find(|guest| guest.id == id)
            .cloned())
    }

    async fn update_guest(
        &self,
        id: GuestId,
        update: GuestUpdate,
    ) -> Result<Guest> {
        let mut guests = self.guests.write().await;
        let guest = guests
            .iter_mut()
            .find(|guest| guest.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("guest {id}")))?;

        update.apply_to(guest)?;
        Ok(guest.clone())
    }

    async fn delete_guest(&self, id: GuestId) -> Result<bool> {
        let mut guests = self.guests.write().await;
        let before = guests.len();
        guests.retain(|guest| guest.id != id);
        Ok(guests.len() != before)
    }
}

#[derive(Debug, Default)]
pub struct InMemorySettingsRepository {
    settings: RwLock<Vec<EventSettings>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get_settings(&self, slug: &str) -> Result<Option<EventSettings>> {
        Ok(self
            .settings
            .read()
            .await
            .iter()
            .find(|settings| settings.slug == slug)
            .cloned())
    }

    async fn active_settings(&self) -> Result<Option<EventSettings>> {
        Ok(self
            .settings
            .read()
            .await
            .iter()
            .filter(|settings| settings.is_active)
            .max_by_key(|settings| settings.updated_at)
            .cloned())
    }

    async fn upsert_settings(
        &self,
        input: EventSettingsInput,
    ) -> Result<EventSettings> {
        let mut all = self.settings.write().await;
        match all.iter_mut().find(|existing| existing.slug == input.slug) {
            Some(existing) => {
                *existing = input.into_settings(existing.id, Utc::now())?;
                Ok(existing.clone())
            }
            None => {
                let created = input.into_settings(Uuid::now_v7(), Utc::now())?;
                all.push(created.clone());
                Ok(created)
            }
        }
    }
}
