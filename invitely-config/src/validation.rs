use thiserror::Error;

use crate::models::{Config, StorageBackend};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error(
        "storage backend is postgres but no DATABASE_URL or [database].url is set"
    )]
    MissingDatabaseUrl,
    #[error("database URL scheme `{scheme}` is not postgres/postgresql")]
    UnsupportedDatabaseScheme { scheme: String },
    #[error("database.max_connections must be at least 1")]
    ZeroMaxConnections,
}

/// Reject configurations the server cannot start with and collect warnings
/// for the ones that are merely risky.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    match config.storage.backend {
        StorageBackend::Postgres => {
            if config.database.url.is_none() {
                return Err(ConfigGuardRailError::MissingDatabaseUrl);
            }
            if config.database.max_connections == 0 {
                return Err(ConfigGuardRailError::ZeroMaxConnections);
            }
        }
        StorageBackend::Memory => warnings.push_with_hint(
            "In-memory storage selected; records are lost on restart",
            "Set STORAGE_BACKEND=postgres and DATABASE_URL for durable storage",
        ),
    }

    if config.cors.is_wildcard_included() {
        warnings.push("CORS allows any origin (`*`)");
    }

    Ok(warnings)
}
