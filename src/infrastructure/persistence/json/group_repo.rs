use super::write_atomic;
use crate::domain::model::{AccountRecord, Group};
use crate::domain::repository::{GroupRepository, LoadedGroups, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

/// Group mapping stored as one JSON object: group name -> array of accounts
pub struct JsonGroupRepository {
    path: PathBuf,
}

impl JsonGroupRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_exists(&self) -> Result<()> {
        if !self.path.exists() {
            write_atomic(&self.path, b"{}")?;
            tracing::info!("Created empty group file at {:?}", self.path);
        }
        Ok(())
    }
}

impl GroupRepository for JsonGroupRepository {
    fn load_all(&self) -> Result<LoadedGroups> {
        self.ensure_exists()?;
        let content = fs::read_to_string(&self.path)?;

        match parse_groups(&content) {
            Ok(groups) => {
                tracing::debug!("Loaded {} groups from {:?}", groups.len(), self.path);
                Ok(LoadedGroups {
                    groups,
                    recovered: false,
                })
            }
            Err(reason) => {
                tracing::warn!(
                    path = ?self.path,
                    %reason,
                    "Group file is corrupt, resetting to empty; previous contents are discarded"
                );
                self.save_all(&[])?;
                Ok(LoadedGroups {
                    groups: Vec::new(),
                    recovered: true,
                })
            }
        }
    }

    fn save_all(&self, groups: &[Group]) -> Result<()> {
        let mut map = Map::with_capacity(groups.len());
        for group in groups {
            map.insert(group.name.clone(), serde_json::to_value(&group.members)?);
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        Value::Object(map).serialize(&mut ser)?;

        write_atomic(&self.path, &buf)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse the group file.
///
/// Only invalid JSON or a non-object top level is an error. A group whose
/// value is not an array, or a member that is not a valid record, is dropped
/// on its own with a warning.
fn parse_groups(content: &str) -> std::result::Result<Vec<Group>, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    let Value::Object(map) = value else {
        return Err("top-level value is not an object".to_string());
    };

    let mut groups = Vec::with_capacity(map.len());
    for (name, members) in map {
        if name.trim().is_empty() {
            tracing::warn!("Dropping group with blank name from group file");
            continue;
        }
        let Value::Array(items) = members else {
            tracing::warn!("Dropping group '{}': value is not an array", name);
            continue;
        };

        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<AccountRecord>(item) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Dropping member #{} of group '{}': {}", idx + 1, name, e),
            }
        }
        groups.push(Group {
            name,
            members: records,
        });
    }

    Ok(groups)
}
