//! CLI configuration
use anyhow::Context;
use qasid_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "qasid.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub player: PlaybackConfig,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub resolver: ResolverSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Storage bucket; required by `resolve`
    #[serde(default)]
    pub bucket: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            bucket: None,
        }
    }
}

fn default_database_url() -> String {
    "sqlite://./data/qasid.db".to_string()
}

fn default_endpoint() -> String {
    qasid_catalog::DEFAULT_ENDPOINT.to_string()
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default `qasid.toml` is optional.
    /// Environment variables prefixed `QASID_` override file values, with
    /// `__` separating sections (`QASID_STORAGE__DATABASE_URL`).
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("QASID")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .and_then(config::Config::try_deserialize)
            .context("Failed to load configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.database_url.trim().is_empty() {
            anyhow::bail!("storage.database_url cannot be empty");
        }
        if !(0.0..=1.0).contains(&self.player.finished_ratio) {
            anyhow::bail!("player.finished_ratio must be between 0 and 1");
        }
        if self.player.progress_flush_interval_ms == 0 {
            anyhow::bail!("player.progress_flush_interval_ms must be positive");
        }
        Ok(())
    }
}
