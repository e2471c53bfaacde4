//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod access;
pub mod files;
pub mod logging;
pub mod store;

use serde::{Deserialize, Serialize};
use tracing::debug;

use self::access::AccessConfig;
use self::files::FilesConfig;
use self::logging::LoggingConfig;
use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Key-value store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Access engine traversal settings.
    #[serde(default)]
    pub access: AccessConfig,
    /// File metadata settings.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `<dir>/default.toml` with an environment-specific overlay
    /// `<dir>/<env>.toml` and environment variables prefixed with
    /// `FOLDERSHARE__`. Missing files are tolerated.
    pub fn load(dir: &str, env: &str) -> Result<Self, AppError> {
        debug!(dir, env, "Loading configuration");

        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FOLDERSHARE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
