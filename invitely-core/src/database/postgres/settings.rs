use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use super::query_error;
use crate::database::ports::SettingsRepository;
use crate::domain::settings::{EventSettings, EventSettingsInput};
use crate::error::{Result, StoreError};

const SETTINGS_COLUMNS: &str = "id, bride_name, groom_name, event_date, \
     event_time, venue, venue_map_url, slug, is_active, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresSettingsRepository {
    pool: PgPool,
}

impl PostgresSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<EventSettings> {
        let read = |e: sqlx::Error| {
            StoreError::Internal(format!("Failed to read settings row: {e}"))
        };

        Ok(EventSettings {
            id: row.try_get("id").map_err(read)?,
            bride_name: row.try_get("bride_name").map_err(read)?,
            groom_name: row.try_get("groom_name").map_err(read)?,
            date: row.try_get("event_date").map_err(read)?,
            time: row.try_get("event_time").map_err(read)?,
            venue: row.try_get("venue").map_err(read)?,
            venue_map_url: row.try_get("venue_map_url").map_err(read)?,
            slug: row.try_get("slug").map_err(read)?,
            is_active: row.try_get("is_active").map_err(read)?,
            updated_at: row.try_get("updated_at").map_err(read)?,
        })
    }
}

#[async_trait]
impl SettingsRepository for PostgresSettingsRepository {
    async fn get_settings(&self, slug: &str) -> Result<Option<EventSettings>> {
        let row = sqlx::query(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM event_settings WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| query_error("Failed to load event settings", e))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn active_settings(&self) -> Result<Option<EventSettings>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {SETTINGS_COLUMNS}
            FROM event_settings
            WHERE is_active
            ORDER BY updated_at DESC
            LIMIT 1
            "#
        ))
        .fetch_optional(self.pool())
        .await
        .map_err(|e| query_error("Failed to load active settings", e))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn upsert_settings(
        &self,
        input: EventSettingsInput,
    ) -> Result<EventSettings> {
        let settings = input.into_settings(Uuid::now_v7(), Utc::now())?;

        // On conflict the existing row keeps its id.
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO event_settings ({SETTINGS_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (slug) DO UPDATE
            SET bride_name = EXCLUDED.bride_name,
                groom_name = EXCLUDED.groom_name,
                event_date = EXCLUDED.event_date,
                event_time = EXCLUDED.event_time,
                venue = EXCLUDED.venue,
                venue_map_url = EXCLUDED.venue_map_url,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .bind(settings.id)
        .bind(&settings.bride_name)
        .bind(&settings.groom_name)
        .bind(&settings.date)
        .bind(&settings.time)
        .bind(&settings.venue)
        .bind(&settings.venue_map_url)
        .bind(&settings.slug)
        .bind(settings.is_active)
        .bind(settings.updated_at)
        .fetch_one(self.pool())
        .await
        .map_err(|e| query_error("Failed to upsert event settings", e))?;

        Self::map_row(&row)
    }
}
