use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use super::query_error;
use crate::database::ports::GuestRepository;
use crate::domain::guest::{Guest, GuestId, GuestUpdate, NewGuest};
use crate::error::{Result, StoreError};

const GUEST_COLUMNS: &str = "id, name, phone, family_count, rsvp_status, \
     food_preference, tag, message, arrived, created_at";

#[derive(Debug, Clone)]
pub struct PostgresGuestRepository {
    pool: PgPool,
}

impl PostgresGuestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Guest> {
        let read = |e: sqlx::Error| {
            StoreError::Internal(format!("Failed to read guest row: {e}"))
        };

        let family_count: i32 = row.try_get("family_count").map_err(read)?;
        let rsvp_status: String = row.try_get("rsvp_status").map_err(read)?;

        Ok(Guest {
            id: row.try_get("id").map_err(read)?,
            name: row.try_get("name").map_err(read)?,
            phone: row.try_get("phone").map_err(read)?,
            family_count: u32::try_from(family_count).map_err(|_| {
                StoreError::Internal(format!(
                    "Stored family_count out of range: {family_count}"
                ))
            })?,
            rsvp_status: rsvp_status.parse()?,
            food_preference: row.try_get("food_preference").map_err(read)?,
            tag: row.try_get("tag").map_err(read)?,
            message: row.try_get("message").map_err(read)?,
            arrived: row.try_get("arrived").map_err(read)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(read)?,
        })
    }

    fn family_count_param(guest: &Guest) -> Result<i32> {
        i32::try_from(guest.family_count).map_err(|_| {
            StoreError::Validation(format!(
                "`family_count` too large: {}",
                guest.family_count
            ))
        })
    }
}

#[async_trait]
impl GuestRepository for PostgresGuestRepository {
    async fn list_guests(&self) -> Result<Vec<Guest>> {
        let rows = sqlx::query(&format!(
            "SELECT {GUEST_COLUMNS} FROM invitees ORDER BY created_at, id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(|e| query_error("Failed to list guests", e))?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn create_guest(&self, guest: NewGuest) -> Result<Guest> {
        let guest = guest.into_guest(Uuid::now_v7(), Utc::now())?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO invitees ({GUEST_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {GUEST_COLUMNS}
            "#
        ))
        .bind(guest.id)
        .bind(&guest.name)
        .bind(&guest.phone)
        .bind(Self::family_count_param(&guest)?)
        .bind(guest.rsvp_status.as_str())
        .bind(&guest.food_preference)
        .bind(&guest.tag)
        .bind(&guest.message)
        .bind(guest.arrived)
        .bind(guest.created_at)
        .fetch_one(self.pool())
        .await
        .map_err(|e| query_error("Failed to insert guest", e))?;

        Self::map_row(&row)
    }

    async fn get_guest(&self, id: GuestId) -> Result<Option<Guest>> {
        let row = sqlx::query(&format!(
            "SELECT {GUEST_COLUMNS} FROM invitees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| query_error("Failed to load guest", e))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn update_guest(
        &self,
        id: GuestId,
        update: GuestUpdate,
    ) -> Result<Guest> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| query_error("Failed to begin transaction", e))?;

        let row = sqlx::query(&format!(
            "SELECT {GUEST_COLUMNS} FROM invitees WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| query_error("Failed to load guest", e))?
        .ok_or_else(|| StoreError::NotFound(format!("guest {id}")))?;

        let mut guest = Self::map_row(&row)?;
        update.apply_to(&mut guest)?;

        sqlx::query(
            r#"
            UPDATE invitees
            SET name = $2,
                phone = $3,
                family_count = $4,
                rsvp_status = $5,
                food_preference = $6,
                tag = $7,
                message = $8,
                arrived = $9
            WHERE id = $1
            "#,
        )
        .bind(guest.id)
        .bind(&guest.name)
        .bind(&guest.phone)
        .bind(Self::family_count_param(&guest)?)
        .bind(guest.rsvp_status.as_str())
        .bind(&guest.food_preference)
        .bind(&guest.tag)
        .bind(&guest.message)
        .bind(guest.arrived)
        .execute(&mut *tx)
        .await
        .map_err(|e| query_error("Failed to update guest", e))?;

        tx.commit()
            .await
            .map_err(|e| query_error("Failed to commit guest update", e))?;

        Ok(guest)
    }

    async fn delete_guest(&self, id: GuestId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invitees WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| query_error("Failed to delete guest", e))?;

        Ok(result.rows_affected() > 0)
    }
}
