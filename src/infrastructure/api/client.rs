//! Identity client implementations.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::config::ApiConfig;
use crate::domain::error::VerifyError;
use crate::domain::model::{mask_token, AccountRecord};

/// Client trait for resolving a bearer token to its account.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Look up the account behind a non-blank, trimmed token.
    async fn lookup(&self, token: &str) -> Result<AccountRecord, VerifyError>;
}

/// Handle to an identity client for cloning and sharing.
pub type IdentityClientHandle = Arc<dyn IdentityClient>;

/// HTTP-based client calling `users/me` on the REST API.
pub struct HttpIdentityClient {
    config: ApiConfig,
    client: Client,
}

impl HttpIdentityClient {
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { config, client })
    }
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    data: Option<MeData>,
}

#[derive(Debug, Deserialize)]
struct MeData {
    username: Option<String>,
    name: Option<String>,
    id: Option<Value>,
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    async fn lookup(&self, token: &str) -> Result<AccountRecord, VerifyError> {
        let url = self.config.identity_url();
        tracing::debug!(token = %mask_token(token), "GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(&self.config, e))?;

        let status = response.status();
        tracing::debug!(token = %mask_token(token), "Response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&self.config, e))?;

        let result = interpret_response(token, status, &body);
        match &result {
            Ok(record) => tracing::info!("Verified @{}", record.username),
            Err(e) => tracing::warn!(token = %mask_token(token), "Verification failed: {}", e),
        }
        result
    }
}

fn transport_error(config: &ApiConfig, err: reqwest::Error) -> VerifyError {
    if err.is_timeout() {
        VerifyError::Transport(format!("request timed out after {}s", config.timeout_sec))
    } else {
        VerifyError::Transport(err.to_string())
    }
}

/// Map a raw HTTP status and body to an account or a verification failure.
pub(crate) fn interpret_response(
    token: &str,
    status: StatusCode,
    body: &str,
) -> Result<AccountRecord, VerifyError> {
    if !status.is_success() {
        return Err(VerifyError::Auth {
            status: status.as_u16(),
            detail: error_detail(body),
        });
    }

    let parsed: MeResponse = serde_json::from_str(body)
        .map_err(|e| VerifyError::MalformedResponse(e.to_string()))?;
    let data = parsed
        .data
        .ok_or_else(|| VerifyError::MalformedResponse("missing `data` object".to_string()))?;

    let username = data
        .username
        .ok_or_else(|| VerifyError::MalformedResponse("missing `data.username`".to_string()))?;
    let name = data
        .name
        .ok_or_else(|| VerifyError::MalformedResponse("missing `data.name`".to_string()))?;
    let id = match data.id {
        Some(Value::String(id)) => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(VerifyError::MalformedResponse("missing `data.id`".to_string())),
    };

    Ok(AccountRecord::new(token.to_string(), username, name, id))
}

/// Human-readable detail from an error body: every `errors[].detail`, else a
/// top-level `detail`, else the raw text.
pub(crate) fn error_detail(body: &str) -> String {
    if body.trim().is_empty() {
        return "empty response body".to_string();
    }

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    if let Some(errors) = value.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            return errors
                .iter()
                .map(|e| match e.get("detail").and_then(Value::as_str) {
                    Some(detail) => detail.to_string(),
                    None => e.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; ");
        }
    }

    match value.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(other) => other.to_string(),
        None => body.to_string(),
    }
}
