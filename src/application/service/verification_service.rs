use super::batch_runner::{BatchReport, BatchRunner, CancelHandle};
use crate::domain::repository::{Result, TokenRepository};

/// Batch verification plus persistence of the verified token list
pub struct VerificationService<T: TokenRepository> {
    runner: BatchRunner,
    tokens: T,
}

impl<T: TokenRepository> VerificationService<T> {
    pub fn new(runner: BatchRunner, tokens: T) -> Self {
        Self { runner, tokens }
    }

    /// Verify `tokens` and overwrite the token store with the successful ones.
    ///
    /// The report is returned even when saving fails; the second value is the
    /// outcome of the write. A cancelled batch leaves the token store untouched.
    pub async fn verify_and_store(
        &self,
        tokens: &[String],
        cancel: &CancelHandle,
    ) -> (BatchReport, Result<()>) {
        let report = self.runner.run(tokens, cancel).await;

        if report.cancelled {
            tracing::info!("Batch cancelled, saved tokens left unchanged");
            return (report, Ok(()));
        }

        let saved = self.tokens.replace_all(&report.tokens());
        if let Err(e) = &saved {
            tracing::error!("Failed to save verified tokens: {}", e);
            for record in &report.records {
                tracing::info!("Unsaved verified account @{} ({})", record.username, record.token_hint());
            }
        }
        (report, saved)
    }

    /// Re-verify the tokens saved by the previous run
    pub async fn verify_saved(&self, cancel: &CancelHandle) -> (BatchReport, Result<()>) {
        let tokens = self.tokens.load();
        tracing::info!("Re-verifying {} saved tokens", tokens.len());
        self.verify_and_store(&tokens, cancel).await
    }

    pub fn saved_tokens(&self) -> Vec<String> {
        self.tokens.load()
    }

    pub fn clear_tokens(&self) -> Result<()> {
        self.tokens.clear()?;
        tracing::info!("Cleared all saved tokens");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::eventbus::create_event_bus;
    use crate::application::service::testing::FakeIdentityClient;
    use crate::application::service::CredentialVerifier;
    use crate::domain::error::DomainError;
    use crate::infrastructure::persistence::json::JsonTokenRepository;
    use std::sync::Arc;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn service<T: TokenRepository>(repo: T) -> VerificationService<T> {
        let verifier = CredentialVerifier::new(Arc::new(FakeIdentityClient::default()));
        VerificationService::new(BatchRunner::new(verifier, 3, create_event_bus()), repo)
    }

    #[tokio::test]
    async fn test_only_verified_tokens_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(JsonTokenRepository::new(dir.path().join("tokens.json")));

        let (report, saved) = svc
            .verify_and_store(&tokens(&["good1", "", "bad", " good2 "]), &CancelHandle::new())
            .await;

        saved.unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(svc.saved_tokens(), tokens(&["good1", "good2"]));
    }

    #[tokio::test]
    async fn test_all_failures_overwrite_with_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let svc = service(JsonTokenRepository::new(&path));
        svc.verify_and_store(&tokens(&["old"]), &CancelHandle::new())
            .await
            .1
            .unwrap();

        let (report, saved) = svc
            .verify_and_store(&tokens(&["bad1", "bad2"]), &CancelHandle::new())
            .await;

        saved.unwrap();
        assert!(report.records.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_cancelled_batch_keeps_saved_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(JsonTokenRepository::new(dir.path().join("tokens.json")));
        svc.verify_and_store(&tokens(&["keep"]), &CancelHandle::new())
            .await
            .1
            .unwrap();

        let cancel = CancelHandle::new();
        cancel.cancel();
        let (report, saved) = svc.verify_and_store(&tokens(&["other"]), &cancel).await;

        saved.unwrap();
        assert!(report.cancelled);
        assert_eq!(svc.saved_tokens(), tokens(&["keep"]));
    }

    #[tokio::test]
    async fn test_verify_saved_reruns_previous_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(JsonTokenRepository::new(dir.path().join("tokens.json")));
        svc.verify_and_store(&tokens(&["a", "b"]), &CancelHandle::new())
            .await
            .1
            .unwrap();

        let (report, _) = svc.verify_saved(&CancelHandle::new()).await;

        let names: Vec<_> = report.records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_clear_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let svc = service(JsonTokenRepository::new(&path));
        svc.verify_and_store(&tokens(&["a"]), &CancelHandle::new())
            .await
            .1
            .unwrap();

        svc.clear_tokens().unwrap();

        assert!(!path.exists());
        assert!(svc.saved_tokens().is_empty());
    }

    struct ReadOnlyRepo;

    impl TokenRepository for ReadOnlyRepo {
        fn load(&self) -> Vec<String> {
            Vec::new()
        }

        fn replace_all(&self, _tokens: &[String]) -> Result<()> {
            Err(DomainError::Storage("read-only file system".to_string()))
        }

        fn clear(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_save_failure_still_returns_report() {
        let svc = service(ReadOnlyRepo);

        let (report, saved) = svc
            .verify_and_store(&tokens(&["a"]), &CancelHandle::new())
            .await;

        assert_eq!(report.records.len(), 1);
        assert_eq!(
            saved,
            Err(DomainError::Storage("read-only file system".to_string()))
        );
    }
}
