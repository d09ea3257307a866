use anyhow::Context;
use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use super::settings::UserSettings;

// Embed the entire configs directory at compile time
static CONFIGS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources/configs");

/// Load a YAML configuration file from disk
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Parse YAML from string
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> anyhow::Result<T> {
    let config: T = serde_yaml::from_str(content)?;
    Ok(config)
}

/// Save a configuration to a YAML file
pub fn save_yaml<T: Serialize>(path: impl AsRef<Path>, config: &T) -> anyhow::Result<()> {
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Raw text of an embedded config file, comments included
pub fn embedded_config_text(name: &str) -> Option<&'static str> {
    CONFIGS_DIR
        .get_file(format!("{}.yaml", name))
        .and_then(|file| file.contents_utf8())
}

/// Load embedded configuration by name from the configs directory
/// Files are embedded at compile time using include_dir
pub fn load_embedded_config<T: DeserializeOwned + Default>(name: &str) -> T {
    match embedded_config_text(name) {
        Some(content) => match parse_yaml::<T>(content) {
            Ok(config) => {
                tracing::debug!("Loaded embedded config: {}", name);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse embedded config {}: {}", name, e);
                T::default()
            }
        },
        None => {
            tracing::warn!("Embedded config {} not found, using defaults", name);
            T::default()
        }
    }
}

/// Read user settings from `path`; `Ok(None)` when there is no such file
pub fn read_user_settings(path: &Path) -> anyhow::Result<Option<UserSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let settings = load_yaml::<UserSettings>(path)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(settings))
}

/// Load user settings from `path`.
/// Falls back to the embedded defaults if the file doesn't exist or is invalid
pub fn load_user_settings(path: &Path) -> UserSettings {
    match read_user_settings(path) {
        Ok(Some(settings)) => {
            tracing::info!("Loaded user settings from {:?}", path);
            settings
        }
        Ok(None) => {
            tracing::debug!("No settings file at {:?}, using defaults", path);
            load_embedded_config("settings")
        }
        Err(e) => {
            tracing::warn!("{:#}, using defaults", e);
            load_embedded_config("settings")
        }
    }
}

/// Save user settings to `path`, creating its directory
pub fn save_user_settings(path: &Path, settings: &UserSettings) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    save_yaml(path, settings)?;
    tracing::info!("Saved user settings to {:?}", path);
    Ok(())
}

/// Write the commented default settings file unless one already exists.
/// Returns false when the file was already present.
pub fn init_user_settings(path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    ensure_parent_dir(path)?;
    match embedded_config_text("settings") {
        Some(template) => std::fs::write(path, template)?,
        None => save_yaml(path, &UserSettings::default())?,
    }
    tracing::info!("Wrote default settings to {:?}", path);
    Ok(true)
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
