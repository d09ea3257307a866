use crate::application::eventbus::{create_event_bus, SharedEventBus};
use crate::application::service::{BatchRunner, CredentialVerifier, GroupService, VerificationService};
use crate::domain::repository::{GroupRepository, TokenRepository};
use crate::infrastructure::api::{HttpIdentityClient, IdentityClientHandle};
use crate::infrastructure::config::UserSettings;
use crate::infrastructure::persistence::json::{JsonGroupRepository, JsonTokenRepository};
use std::sync::Arc;

/// Type aliases for dynamic repository types
pub type DynGroupRepository = Box<dyn GroupRepository>;
pub type DynTokenRepository = Box<dyn TokenRepository>;

pub struct AppState {
    pub group_service: GroupService<DynGroupRepository>,
    pub verification_service: VerificationService<DynTokenRepository>,
    pub event_bus: SharedEventBus,
}

impl AppState {
    /// Wire the JSON stores and the HTTP identity client from settings
    pub fn from_settings(settings: &UserSettings) -> anyhow::Result<Self> {
        let client: IdentityClientHandle = Arc::new(HttpIdentityClient::new(settings.api.clone())?);
        let group_repo = Box::new(JsonGroupRepository::new(
            settings.storage.effective_groups_path(),
        ));
        let token_repo = Box::new(JsonTokenRepository::new(
            settings.storage.effective_tokens_path(),
        ));

        Ok(Self::new(
            group_repo,
            token_repo,
            client,
            settings.batch.max_threads,
            create_event_bus(),
        )?)
    }

    pub fn new(
        group_repo: DynGroupRepository,
        token_repo: DynTokenRepository,
        client: IdentityClientHandle,
        max_threads: usize,
        event_bus: SharedEventBus,
    ) -> crate::domain::repository::Result<Self> {
        let group_service = GroupService::new(group_repo, event_bus.clone())?;
        let runner = BatchRunner::new(CredentialVerifier::new(client), max_threads, event_bus.clone());

        Ok(Self {
            group_service,
            verification_service: VerificationService::new(runner, token_repo),
            event_bus,
        })
    }
}
