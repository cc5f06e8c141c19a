//! Configuration for the Invitely server.
//!
//! Values are composed from CLI overrides (applied by the binary), the
//! process environment (optionally seeded from `.env`), an `invitely.toml`
//! file and built-in defaults, in that order of precedence.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError,
};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    Config, ConfigMetadata, CorsConfig, DatabaseConfig, ServerConfig,
    StorageBackend, StorageConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
