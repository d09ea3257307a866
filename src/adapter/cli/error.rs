use crate::domain::error::DomainError;
use std::fmt;

/// Operator-facing failure message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError {
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError {
            message: format!("{:#}", err),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError {
            message: err.to_string(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_message_is_kept() {
        let err: ApiError = DomainError::NotFound("work".to_string()).into();
        assert_eq!(err.message, "Group 'work' not found");
    }

    #[test]
    fn test_anyhow_chain_is_flattened() {
        let err = anyhow::anyhow!("disk full").context("failed to write settings");
        let err: ApiError = err.into();
        assert_eq!(err.to_string(), "failed to write settings: disk full");
    }
}
