use super::write_atomic;
use crate::domain::repository::{Result, TokenRepository};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Verified token list stored as a JSON array of strings
pub struct JsonTokenRepository {
    path: PathBuf,
}

impl JsonTokenRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenRepository for JsonTokenRepository {
    fn load(&self) -> Vec<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read token file {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            tracing::warn!("Token file {:?} is empty", self.path);
            return Vec::new();
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(token) => Some(token),
                    _ => None,
                })
                .collect(),
            Ok(_) => {
                tracing::warn!("Token file {:?} is not a list, ignoring it", self.path);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Token file {:?} is malformed: {}", self.path, e);
                Vec::new()
            }
        }
    }

    fn replace_all(&self, tokens: &[String]) -> Result<()> {
        let json = serde_json::to_vec(tokens)?;
        write_atomic(&self.path, &json)?;
        tracing::info!("Saved {} tokens to {:?}", tokens.len(), self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Removed token file {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
