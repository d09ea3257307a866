use crate::domain::error::VerifyError;
use crate::domain::model::AccountRecord;
use crate::infrastructure::api::IdentityClientHandle;

/// Resolves one raw token to an account.
#[derive(Clone)]
pub struct CredentialVerifier {
    client: IdentityClientHandle,
}

impl CredentialVerifier {
    pub fn new(client: IdentityClientHandle) -> Self {
        Self { client }
    }

    /// A blank token is skipped: `Ok(None)` without a request.
    pub async fn verify(&self, token: &str) -> Result<Option<AccountRecord>, VerifyError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        self.client.lookup(token).await.map(Some)
    }
}
