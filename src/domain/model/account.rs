use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Account entity - a verified identity behind a bearer token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(default)]
    pub token: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub id: String,
    /// Fields this tool does not interpret, kept so a rewrite does not lose them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountRecord {
    pub fn new(token: String, username: String, name: String, id: String) -> Self {
        Self {
            token,
            username,
            name,
            id,
            extra: Map::new(),
        }
    }

    /// Returns display string in format "Name (@username)"
    pub fn display_name(&self) -> String {
        format!("{} (@{})", self.name, self.username)
    }

    /// Masked form of the token, safe for logs and terminal output
    pub fn token_hint(&self) -> String {
        mask_token(&self.token)
    }
}

// Tokens must never reach logs through `{:?}`.
impl fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRecord")
            .field("token", &self.token_hint())
            .field("username", &self.username)
            .field("name", &self.name)
            .field("id", &self.id)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Mask a token down to its length and last four characters.
pub fn mask_token(token: &str) -> String {
    let token = token.trim();
    let chars: Vec<char> = token.chars().collect();
    if chars.is_empty() {
        return "<empty>".to_string();
    }
    if chars.len() <= 8 {
        return format!("****({} chars)", chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}({} chars)", tail, chars.len())
}
