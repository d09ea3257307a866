use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::paths;
use crate::infrastructure::api::ApiConfig;

pub const MIN_THREADS: usize = 1;
pub const MAX_THREADS: usize = 20;

/// User settings stored in settings.yaml in user config directory.
/// All fields are optional - missing values use defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserSettings {
    /// Identity API endpoint and timeout
    pub api: ApiConfig,

    /// Batch verification settings
    pub batch: BatchSettings,

    /// Where the group and token files live
    pub storage: StorageSettings,

    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Maximum verifications in flight
    pub max_threads: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { max_threads: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageSettings {
    /// Leave empty to use platform default path
    pub groups_path: String,
    /// Leave empty to use platform default path
    pub tokens_path: String,
}

impl StorageSettings {
    pub fn effective_groups_path(&self) -> PathBuf {
        if self.groups_path.trim().is_empty() {
            paths::default_groups_path()
        } else {
            PathBuf::from(&self.groups_path)
        }
    }

    pub fn effective_tokens_path(&self) -> PathBuf {
        if self.tokens_path.trim().is_empty() {
            paths::default_tokens_path()
        } else {
            PathBuf::from(&self.tokens_path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Write a daily rolling log file in addition to the console
    pub file_enabled: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { file_enabled: true }
    }
}

impl UserSettings {
    /// Clamp numeric settings into their supported ranges.
    /// Returns one notice per value that was changed.
    pub fn normalize(&mut self) -> Vec<String> {
        let mut notices: Vec<String> = self.api.normalize().into_iter().collect();

        let threads = self.batch.max_threads.clamp(MIN_THREADS, MAX_THREADS);
        if threads != self.batch.max_threads {
            notices.push(format!(
                "batch.max_threads {} out of range {}..={}, using {}",
                self.batch.max_threads, MIN_THREADS, MAX_THREADS, threads
            ));
            self.batch.max_threads = threads;
        }

        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: UserSettings = serde_yaml::from_str("batch:\n  max_threads: 8\n").unwrap();

        assert_eq!(settings.batch.max_threads, 8);
        assert_eq!(settings.api, ApiConfig::default());
        assert!(settings.logging.file_enabled);
        assert!(settings.storage.groups_path.is_empty());
    }

    #[test]
    fn test_normalize_clamps_threads() {
        let mut settings = UserSettings::default();
        settings.batch.max_threads = 0;
        assert_eq!(settings.normalize().len(), 1);
        assert_eq!(settings.batch.max_threads, MIN_THREADS);

        let mut settings = UserSettings::default();
        settings.batch.max_threads = 64;
        settings.normalize();
        assert_eq!(settings.batch.max_threads, MAX_THREADS);
    }

    #[test]
    fn test_normalize_reports_every_clamped_value() {
        let mut settings = UserSettings::default();
        settings.batch.max_threads = 99;
        settings.api.timeout_sec = 1;

        let notices = settings.normalize();

        assert_eq!(notices.len(), 2);
        assert!(notices[0].starts_with("api.timeout_sec 1 out of range"));
        assert!(notices[1].starts_with("batch.max_threads 99 out of range"));
    }

    #[test]
    fn test_defaults_need_no_clamping() {
        assert!(UserSettings::default().normalize().is_empty());
    }

    #[test]
    fn test_explicit_storage_paths_win() {
        let storage = StorageSettings {
            groups_path: "/tmp/g.json".to_string(),
            tokens_path: String::new(),
        };

        assert_eq!(storage.effective_groups_path(), PathBuf::from("/tmp/g.json"));
        assert_eq!(storage.effective_tokens_path(), paths::default_tokens_path());
    }
}
