pub mod loader;
pub mod paths;
mod settings;

pub use settings::*;

use std::path::{Path, PathBuf};

/// Settings as loaded, plus the problems found along the way.
///
/// Settings load before logging exists (they decide whether file logging is
/// on), so the caller reports `notices` once the subscriber is installed.
#[derive(Debug)]
pub struct LoadedSettings {
    pub path: PathBuf,
    pub settings: UserSettings,
    pub notices: Vec<String>,
}

/// Load and normalize settings, from `path` or the platform default location.
/// The result is passed into constructors; there is no global config.
pub fn load(path: Option<&Path>) -> LoadedSettings {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(paths::default_settings_path);

    let mut notices = Vec::new();
    let mut settings = match loader::read_user_settings(&path) {
        Ok(Some(settings)) => settings,
        Ok(None) => loader::load_embedded_config("settings"),
        Err(e) => {
            notices.push(format!("{:#}, using defaults", e));
            loader::load_embedded_config("settings")
        }
    };
    notices.extend(settings.normalize());

    LoadedSettings {
        path,
        settings,
        notices,
    }
}
