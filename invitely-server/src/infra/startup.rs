use anyhow::{Context, Result};
use invitely_config::{Config, StorageBackend};
use invitely_core::{RecordStore, database::postgres::PostgresDatabase};
use tracing::{info, warn};

/// Open the configured backend. For Postgres this connects and applies
/// migrations; any failure here must stop the process before it serves.
pub async fn open_store(config: &Config) -> Result<RecordStore> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db = connect_postgres(config).await?;
            db.migrate()
                .await
                .context("failed to apply database migrations")?;
            Ok(RecordStore::from_postgres(&db))
        }
        StorageBackend::Memory => {
            warn!("using in-memory storage; records are lost on restart");
            Ok(RecordStore::in_memory())
        }
    }
}

pub async fn connect_postgres(config: &Config) -> Result<PostgresDatabase> {
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;

    let db = PostgresDatabase::connect(url, config.database.max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("connected to PostgreSQL");
    Ok(db)
}
