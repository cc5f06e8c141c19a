pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use url::Url;

use crate::{
    models::{
        Config, ConfigMetadata, CorsConfig, DEFAULT_HOST,
        DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT, DatabaseConfig, ServerConfig,
        StorageConfig,
        default_cors_headers, default_cors_methods, default_cors_origins,
        sources::{EnvConfig, FileConfig},
    },
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};
use error::ConfigLoadError;

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["invitely.toml", "config/invitely.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Read `.env`, the environment and the config file, then compose.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let env = EnvConfig::gather()?;
        let (file, config_path) = self.load_file_config(&env)?;

        self.compose(file, env, config_path, env_file_loaded)
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        let loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };
        // A missing .env file is normal outside development.
        match loaded {
            Ok(loaded) => Ok(loaded),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigLoadError::MissingConfig { path });
                }
                path
            }
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file = Self::read_file(&path)?;
        Ok((Some(file), Some(path)))
    }

    pub fn read_file(path: &Path) -> Result<FileConfig, ConfigLoadError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge the sources: environment over file over defaults.
    pub fn compose(
        &self,
        file: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if file.is_none() {
            warnings.push_with_hint(
                "No invitely.toml detected; using environment variables and defaults",
                "Create invitely.toml or set INVITELY_CONFIG_PATH",
            );
        }

        let FileConfig {
            server: file_server,
            database: file_database,
            storage: file_storage,
            cors: file_cors,
        } = file.unwrap_or_default();

        let server = ServerConfig {
            host: env
                .server_host
                .clone()
                .filter(|value| !value.trim().is_empty())
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let database = DatabaseConfig {
            url: Self::resolve_database_url(
                env.database_url.clone(),
                file_database.url,
            )?,
            max_connections: env
                .database_max_connections
                .or(file_database.max_connections)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        };

        let storage = StorageConfig {
            backend: env
                .storage_backend
                .or(file_storage.backend)
                .unwrap_or_default(),
        };

        let cors = CorsConfig {
            allowed_origins: env
                .cors_allowed_origins
                .clone()
                .or(file_cors.allowed_origins)
                .unwrap_or_else(default_cors_origins),
            allowed_methods: file_cors
                .allowed_methods
                .unwrap_or_else(default_cors_methods),
            allowed_headers: file_cors
                .allowed_headers
                .unwrap_or_else(default_cors_headers),
        };

        let config = Config {
            server,
            database,
            storage,
            cors,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        };

        warnings.extend(validation::apply_guard_rails(&config)?);

        Ok(ConfigLoad { config, warnings })
    }

    fn resolve_database_url(
        env_url: Option<String>,
        file_url: Option<String>,
    ) -> Result<Option<String>, ConfigLoadError> {
        let Some(raw) = env_url
            .filter(|value| !value.trim().is_empty())
            .or(file_url.filter(|value| !value.trim().is_empty()))
        else {
            return Ok(None);
        };

        let parsed = Url::parse(raw.trim())
            .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
        match parsed.scheme() {
            "postgres" | "postgresql" => Ok(Some(parsed.to_string())),
            other => Err(ConfigGuardRailError::UnsupportedDatabaseScheme {
                scheme: other.to_string(),
            }
            .into()),
        }
    }
}
