use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_PROJECT_URL: &str = "http://127.0.0.1:54321";
pub const DEFAULT_TABLE: &str = "productos";
const ENV_PREFIX: &str = "INVENTORY";
const CONFIG_DIR_NAME: &str = "cloud_inventory";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Where the hosted table lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub project_url: String,
    #[serde(default)]
    pub api_key: String,
    pub table: String,
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load client configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid project url '{url}': {reason}")]
    InvalidProjectUrl { url: String, reason: String },
    #[error("table name must not be empty")]
    EmptyTable,
}

impl ClientConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Defaults, then the TOML file, then `INVENTORY_*` variables, then
    /// `overrides`. An explicitly given `path` must exist; the default
    /// location is optional.
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::load_with_env(path, overrides, None)
    }

    /// Like [`ClientConfig::load`], reading variables from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        overrides: ConfigOverrides,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("project_url", DEFAULT_PROJECT_URL)?
            .set_default("api_key", "")?
            .set_default("table", DEFAULT_TABLE)?;

        let file = path.map(Path::to_path_buf).or_else(Self::default_path);
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "reading client config file");
            builder = builder.add_source(
                File::from(file.as_path())
                    .format(FileFormat::Toml)
                    .required(path.is_some()),
            );
        }

        let config: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
            .set_override_option("project_url", overrides.project_url)?
            .set_override_option("api_key", overrides.api_key)?
            .set_override_option("table", overrides.table)?
            .build()?
            .try_deserialize()?;

        config.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        let url = Url::parse(&self.project_url).map_err(|err| ConfigError::InvalidProjectUrl {
            url: self.project_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidProjectUrl {
                url: self.project_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.table.trim().is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
