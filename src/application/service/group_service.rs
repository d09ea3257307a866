use std::sync::{Mutex, MutexGuard};

use crate::application::eventbus::SharedEventBus;
use crate::domain::error::DomainError;
use crate::domain::event::DomainEvent;
use crate::domain::model::{AccountRecord, Group};
use crate::domain::repository::{GroupRepository, Result};

/// Group store: named, ordered account lists with full-file persistence.
///
/// Every mutation runs under one lock, is applied to a copy, and only
/// replaces the in-memory state once the repository write succeeded.
pub struct GroupService<R: GroupRepository> {
    repo: R,
    groups: Mutex<Vec<Group>>,
    event_bus: SharedEventBus,
}

impl<R: GroupRepository> GroupService<R> {
    pub fn new(repo: R, event_bus: SharedEventBus) -> Result<Self> {
        let loaded = repo.load_all()?;
        if loaded.recovered {
            tracing::warn!(
                "Group store at {} was corrupt and starts empty",
                repo.location()
            );
        }
        tracing::info!(
            "Group store ready with {} groups from {}",
            loaded.groups.len(),
            repo.location()
        );

        Ok(Self {
            repo,
            groups: Mutex::new(loaded.groups),
            event_bus,
        })
    }

    pub fn create_group(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }

        self.mutate(name, |groups| {
            if groups.iter().any(|g| g.name == name) {
                return Err(DomainError::AlreadyExists(name.to_string()));
            }
            groups.push(Group::new(name.to_string()));
            Ok(())
        })?;

        tracing::info!("Created group: {}", name);
        Ok(())
    }

    /// Delete a group and discard its members
    pub fn delete_group(&self, name: &str) -> Result<()> {
        self.mutate(name, |groups| {
            let idx = index_of(groups, name)?;
            groups.remove(idx);
            Ok(())
        })?;

        tracing::info!("Deleted group: {}", name);
        Ok(())
    }

    pub fn add_member(&self, group: &str, record: AccountRecord) -> Result<()> {
        let username = record.username.clone();

        self.mutate(group, |groups| {
            let idx = index_of(groups, group)?;
            let target = &mut groups[idx];
            if target.contains(&record.username) {
                return Err(DomainError::DuplicateMember {
                    group: group.to_string(),
                    username: record.username.clone(),
                });
            }
            target.members.push(record);
            Ok(())
        })?;

        tracing::info!("Added @{} to group {}", username, group);
        Ok(())
    }

    /// Move the first member named `username` from one group to the end of another
    pub fn move_member(&self, from: &str, to: &str, username: &str) -> Result<()> {
        self.mutate(to, |groups| {
            let from_idx = index_of(groups, from)?;
            let to_idx = index_of(groups, to)?;
            let pos = groups[from_idx]
                .position_of(username)
                .ok_or_else(|| DomainError::MemberNotFound {
                    group: from.to_string(),
                    username: username.to_string(),
                })?;

            let member = groups[from_idx].members.remove(pos);
            groups[to_idx].members.push(member);
            Ok(())
        })?;

        tracing::info!("Moved @{} from {} to {}", username, from, to);
        Ok(())
    }

    /// Remove the first member named `username` from a group
    pub fn remove_member(&self, group: &str, username: &str) -> Result<AccountRecord> {
        let removed = self.mutate(group, |groups| {
            let idx = index_of(groups, group)?;
            let pos = groups[idx]
                .position_of(username)
                .ok_or_else(|| DomainError::MemberNotFound {
                    group: group.to_string(),
                    username: username.to_string(),
                })?;
            Ok(groups[idx].members.remove(pos))
        })?;

        tracing::info!("Removed @{} from group {}", username, group);
        Ok(removed)
    }

    /// Group names in insertion order
    pub fn list_group_names(&self) -> Result<Vec<String>> {
        let groups = self.lock()?;
        Ok(groups.iter().map(|g| g.name.clone()).collect())
    }

    /// Members of a group; an unknown group has no members
    pub fn list_members(&self, group: &str) -> Result<Vec<AccountRecord>> {
        let groups = self.lock()?;
        Ok(groups
            .iter()
            .find(|g| g.name == group)
            .map(|g| g.members.clone())
            .unwrap_or_default())
    }

    pub fn find_groups_containing(&self, username: &str) -> Result<Vec<String>> {
        let groups = self.lock()?;
        Ok(groups
            .iter()
            .filter(|g| g.contains(username))
            .map(|g| g.name.clone())
            .collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Group>>> {
        self.groups
            .lock()
            .map_err(|e| DomainError::Storage(format!("group store lock poisoned: {}", e)))
    }

    fn mutate<T>(
        &self,
        changed_group: &str,
        apply: impl FnOnce(&mut Vec<Group>) -> Result<T>,
    ) -> Result<T> {
        let mut current = self.lock()?;
        let mut next = current.clone();
        let out = apply(&mut next)?;

        if let Err(e) = self.repo.save_all(&next) {
            tracing::error!("Failed to save groups to {}: {}", self.repo.location(), e);
            return Err(e);
        }
        *current = next;
        drop(current);

        self.event_bus.publish(DomainEvent::GroupsChanged {
            group: changed_group.to_string(),
        });
        Ok(out)
    }
}

fn index_of(groups: &[Group], name: &str) -> Result<usize> {
    groups
        .iter()
        .position(|g| g.name == name)
        .ok_or_else(|| DomainError::NotFound(name.to_string()))
}
