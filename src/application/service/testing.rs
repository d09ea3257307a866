//! Test doubles shared by the service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::CancelHandle;
use crate::domain::error::VerifyError;
use crate::domain::model::AccountRecord;
use crate::infrastructure::api::IdentityClient;

/// Tokens starting with "bad" are rejected; anything else verifies as an
/// account whose username is the token itself.
#[derive(Default)]
pub struct FakeIdentityClient {
    delays_ms: HashMap<String, u64>,
    cancel_on_lookup: Option<CancelHandle>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl FakeIdentityClient {
    pub fn with_delays(delays: &[(&str, u64)]) -> Self {
        Self {
            delays_ms: delays.iter().map(|(t, d)| (t.to_string(), *d)).collect(),
            ..Default::default()
        }
    }

    pub fn cancelling(handle: CancelHandle) -> Self {
        Self {
            cancel_on_lookup: Some(handle),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityClient for FakeIdentityClient {
    async fn lookup(&self, token: &str) -> Result<AccountRecord, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(token.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(handle) = &self.cancel_on_lookup {
            handle.cancel();
        }
        let delay = self.delays_ms.get(token).copied().unwrap_or(5);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if token.starts_with("bad") {
            return Err(VerifyError::Auth {
                status: 401,
                detail: "Invalid token".to_string(),
            });
        }
        Ok(AccountRecord::new(
            token.to_string(),
            token.to_string(),
            format!("Name {}", token),
            format!("id-{}", token),
        ))
    }
}
