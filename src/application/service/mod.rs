mod batch_runner;
mod group_service;
mod verification_service;
mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use batch_runner::{BatchReport, BatchRunner, CancelHandle};
pub use group_service::GroupService;
pub use verification_service::VerificationService;
pub use verifier::CredentialVerifier;
