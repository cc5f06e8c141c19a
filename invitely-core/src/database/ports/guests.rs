use async_trait::async_trait;

use crate::domain::guest::{Guest, GuestId, GuestUpdate, NewGuest};
use crate::error::Result;

#[async_trait]
pub trait GuestRepository: Send + Sync {
    /// All guests, oldest first.
    async fn list_guests(&self) -> Result<Vec<Guest>>;

    /// Assign an id and defaults, persist, and return the stored record.
    async fn create_guest(&self, guest: NewGuest) -> Result<Guest>;

    /// `None` when no guest has this id.
    async fn get_guest(&self, id: GuestId) -> Result<Option<Guest>>;

    /// Fails with `StoreError::NotFound` for an unknown id.
    async fn update_guest(
        &self,
        id: GuestId,
        update: GuestUpdate,
    ) -> Result<Guest>;

    /// Returns `true` when a record was removed.
    async fn delete_guest(&self, id: GuestId) -> Result<bool>;

    async fn check_in(&self, id: GuestId) -> Result<Guest> {
        self.update_guest(id, GuestUpdate::check_in()).await
    }
}
