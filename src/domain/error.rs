use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Group name cannot be empty")]
    EmptyName,

    #[error("Group '{0}' already exists")]
    AlreadyExists(String),

    #[error("Group '{0}' not found")]
    NotFound(String),

    #[error("Account @{username} is already in group '{group}'")]
    DuplicateMember { group: String, username: String },

    #[error("Account @{username} is not in group '{group}'")]
    MemberNotFound { group: String, username: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}

/// Failure to verify a single bearer token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Network request failed: {0}")]
    Transport(String),

    #[error("Credential rejected ({status}): {detail}")]
    Auth { status: u16, detail: String },

    #[error("Malformed identity response: {0}")]
    MalformedResponse(String),
}
