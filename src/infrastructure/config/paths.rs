use std::path::PathBuf;

/// Get platform-specific configuration directory
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Library/Application Support/accountdeck")
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("accountdeck")
    }
}

pub fn default_groups_path() -> PathBuf {
    config_dir().join("groups.json")
}

pub fn default_tokens_path() -> PathBuf {
    config_dir().join("tokens.json")
}

pub fn default_settings_path() -> PathBuf {
    config_dir().join("settings.yaml")
}

pub fn log_dir() -> PathBuf {
    config_dir().join("logs")
}
