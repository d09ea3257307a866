use super::AccountRecord;
use serde::{Deserialize, Serialize};

/// Group entity - an operator-defined, ordered collection of accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub members: Vec<AccountRecord>,
}

impl Group {
    pub fn new(name: String) -> Self {
        Self {
            name,
            members: Vec::new(),
        }
    }

    pub fn contains(&self, username: &str) -> bool {
        self.position_of(username).is_some()
    }

    /// Index of the first member with this username
    pub fn position_of(&self, username: &str) -> Option<usize> {
        self.members.iter().position(|m| m.username == username)
    }
}
