pub mod guests;
pub mod settings;

use std::{fmt, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::error::{Result, StoreError};

pub use guests::PostgresGuestRepository;
pub use settings::PostgresSettingsRepository;

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    guests: PostgresGuestRepository,
    settings: PostgresSettingsRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

impl PostgresDatabase {
    /// Connect eagerly so an unreachable server fails here rather than on
    /// the first request.
    pub async fn connect(
        connection_string: &str,
        max_connections: u32,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .connect(connection_string)
            .await
            .map_err(|e| {
                StoreError::Unavailable(format!(
                    "Database connection failed: {e}"
                ))
            })?;

        info!(max_connections, "Database pool initialized");

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            guests: PostgresGuestRepository::new(pool.clone()),
            settings: PostgresSettingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            StoreError::Unavailable(format!("Failed to apply migrations: {e}"))
        })?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn guests(&self) -> &PostgresGuestRepository {
        &self.guests
    }

    pub fn settings(&self) -> &PostgresSettingsRepository {
        &self.settings
    }
}

pub(crate) fn query_error(context: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_) => {
            StoreError::Unavailable(format!("{context}: {err}"))
        }
        other => StoreError::Internal(format!("{context}: {other}")),
    }
}
