use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::StorageBackend;
use crate::loader::error::ConfigLoadError;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub storage: FileStorageConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileStorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<StorageBackend>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_headers: Option<Vec<String>>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub storage_backend: Option<StorageBackend>,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl EnvConfig {
    /// Fails when `STORAGE_BACKEND` is set to something unknown; falling
    /// back to the default would silently switch backends.
    pub fn gather() -> Result<Self, ConfigLoadError> {
        Ok(Self {
            config_path: std::env::var("INVITELY_CONFIG_PATH")
                .ok()
                .map(PathBuf::from),
            server_host: std::env::var("SERVER_HOST").ok(),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok()),
            database_url: std::env::var("DATABASE_URL").ok(),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok()),
            storage_backend: parse_storage_backend(
                std::env::var("STORAGE_BACKEND").ok(),
            )?,
            cors_allowed_origins: parse_csv(
                std::env::var("CORS_ALLOWED_ORIGINS").ok(),
            ),
        })
    }
}

pub(crate) fn parse_storage_backend(
    raw: Option<String>,
) -> Result<Option<StorageBackend>, ConfigLoadError> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|reason| {
            ConfigLoadError::InvalidEnvVar {
                name: "STORAGE_BACKEND",
                value,
                reason,
            }
        }),
    }
}

pub(crate) fn parse_csv(raw: Option<String>) -> Option<Vec<String>> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    })
}
