//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod categorizer;
pub mod database;
pub mod logging;
pub mod sharing;
pub mod storage;
pub mod trash;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, BiometricMode};
pub use self::categorizer::CategorizerConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::sharing::SharingConfig;
pub use self::storage::{StorageConfig, StorageProviderKind};
pub use self::trash::TrashConfig;

use crate::error::AppError;

/// Environment variable prefix, e.g. `LOCKER__DATABASE__URL`.
const ENV_PREFIX: &str = "LOCKER";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Bearer token and private-access settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Object storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Share link settings.
    #[serde(default)]
    pub sharing: SharingConfig,
    /// AI categorization settings.
    #[serde(default)]
    pub categorizer: CategorizerConfig,
    /// Trash retention settings.
    #[serde(default)]
    pub trash: TrashConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config/default.toml`, the `config/{env}.toml`
    /// overlay and `LOCKER__*` environment variables.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Like [`AppConfig::load`] with an explicit base file. The overlay is
    /// looked up next to the base file.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let base = base.trim_end_matches(".toml");
        let overlay = match base.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/{env}"),
            None => env.to_string(),
        };

        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&overlay).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
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

    /// Parse configuration from an in-memory TOML document. Missing
    /// sections fall back to their defaults.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Base URL used when building public share links.
    pub fn share_link_base(&self) -> &str {
        self.sharing
            .link_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or_else(|| self.server.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.bucket, "documents");
        assert_eq!(config.storage.provider, StorageProviderKind::Local);
        assert_eq!(config.auth.biometric_mode, BiometricMode::Disabled);
        assert!(!config.categorizer.enabled);
        assert_eq!(config.trash.retention_days, 30);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            public_base_url = "https://locker.example.com/"

            [storage]
            provider = "memory"
            max_upload_size_bytes = 1024

            [categorizer]
            enabled = true
            api_key = "sk-test"
            auto_apply_threshold = 0.9
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.provider, StorageProviderKind::Memory);
        assert_eq!(config.storage.max_upload_size_bytes, 1024);
        assert_eq!(config.categorizer.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.share_link_base(), "https://locker.example.com");
    }

    #[test]
    fn test_share_link_base_prefers_sharing_section() {
        let config = AppConfig::from_toml(
            r#"
            [sharing]
            link_base_url = "https://share.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.share_link_base(), "https://share.example.com");
    }
}
