use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub table_name: String,
    pub api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:54321".into(),
            database_url: "sqlite://./data/inventory.db".into(),
            table_name: "productos".into(),
            api_key: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let file_contents = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file_contents.as_deref(), |name| std::env::var(name).ok())
}

/// `server.toml` values first, then plain variables, then `APP__` variables.
pub fn load_settings_from(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<HashMap<String, String>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr") {
                    settings.server_bind = v.clone();
                }
                if let Some(v) = file_cfg.get("database_url") {
                    settings.database_url = v.clone();
                }
                if let Some(v) = file_cfg.get("table_name") {
                    settings.table_name = v.clone();
                }
                if let Some(v) = file_cfg.get("api_key") {
                    settings.api_key = Some(v.clone());
                }
            }
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable {SETTINGS_FILE}");
            }
        }
    }

    for name in ["SERVER_BIND", "APP__BIND_ADDR"] {
        if let Some(v) = env(name) {
            settings.server_bind = v;
        }
    }
    for name in ["DATABASE_URL", "APP__DATABASE_URL"] {
        if let Some(v) = env(name) {
            settings.database_url = v;
        }
    }
    for name in ["TABLE_NAME", "APP__TABLE_NAME"] {
        if let Some(v) = env(name) {
            settings.table_name = v;
        }
    }
    for name in ["API_KEY", "APP__API_KEY"] {
        if let Some(v) = env(name) {
            settings.api_key = Some(v);
        }
    }

    if settings
        .api_key
        .as_deref()
        .is_some_and(|key| key.trim().is_empty())
    {
        settings.api_key = None;
    }

    settings
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
