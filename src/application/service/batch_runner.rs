use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};

use super::verifier::CredentialVerifier;
use crate::application::eventbus::SharedEventBus;
use crate::domain::event::DomainEvent;
use crate::domain::model::AccountRecord;

/// Cooperative stop signal for a running batch.
///
/// Checked before each item starts; items already in flight finish normally.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Successful records, in input order
    pub records: Vec<AccountRecord>,
    pub failed: usize,
    /// Blank input lines
    pub skipped: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl BatchReport {
    /// Tokens of the successful records, in input order
    pub fn tokens(&self) -> Vec<String> {
        self.records.iter().map(|r| r.token.clone()).collect()
    }
}

/// Runs the verifier over a token list on a bounded number of workers
pub struct BatchRunner {
    verifier: CredentialVerifier,
    max_workers: usize,
    event_bus: SharedEventBus,
}

impl BatchRunner {
    pub fn new(verifier: CredentialVerifier, max_workers: usize, event_bus: SharedEventBus) -> Self {
        Self {
            verifier,
            max_workers: max_workers.max(1),
            event_bus,
        }
    }

    /// Verify every non-blank token, publishing one `BatchProgress` per
    /// completed item and a single `BatchCompleted` at the end.
    pub async fn run(&self, tokens: &[String], cancel: &CancelHandle) -> BatchReport {
        let started = Instant::now();

        let work: Vec<(usize, &str)> = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| !token.trim().is_empty())
            .map(|(idx, token)| (idx, token.as_str()))
            .collect();
        let total = work.len();
        let skipped = tokens.len() - total;

        tracing::info!(
            total,
            skipped,
            workers = self.max_workers,
            "Batch verification started"
        );
        self.event_bus.publish(DomainEvent::BatchStarted { total });

        // Results land in their input slot regardless of completion order
        let mut slots: Vec<Option<AccountRecord>> = vec![None; tokens.len()];
        let mut completed = 0;
        let mut failed = 0;

        let verifier = &self.verifier;
        let mut outcomes = stream::iter(work)
            .map(move |(idx, token)| async move {
                if cancel.is_cancelled() {
                    return (idx, None);
                }
                (idx, Some(verifier.verify(token).await))
            })
            .buffer_unordered(self.max_workers);

        while let Some((idx, outcome)) = outcomes.next().await {
            let Some(outcome) = outcome else {
                continue;
            };
            completed += 1;

            let (message, is_failure) = match outcome {
                Ok(record) => {
                    slots[idx] = record;
                    (format!("processing {}/{}", completed, total), false)
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!("Batch item {} failed: {}", idx + 1, e);
                    (format!("failed {}/{}: {}", completed, total, e), true)
                }
            };

            self.event_bus.publish(DomainEvent::BatchProgress {
                percent: percent(completed, total),
                completed,
                total,
                message,
                failed: is_failure,
            });
        }

        let records: Vec<AccountRecord> = slots.into_iter().flatten().collect();
        let cancelled = cancel.is_cancelled();
        let elapsed = started.elapsed();

        tracing::info!(
            verified = records.len(),
            failed,
            skipped,
            cancelled,
            "Batch verification finished in {}",
            humantime::format_duration(Duration::from_millis(elapsed.as_millis() as u64))
        );
        self.event_bus.publish(DomainEvent::BatchCompleted {
            verified: records.len(),
            failed,
            skipped,
            cancelled,
        });

        BatchReport {
            records,
            failed,
            skipped,
            cancelled,
            elapsed,
        }
    }
}

/// `round(100 * completed / total)`
fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed as f64 * 100.0 / total as f64).round() as u64).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::eventbus::{create_event_bus, drain};
    use crate::application::service::testing::FakeIdentityClient;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn runner(client: Arc<FakeIdentityClient>, workers: usize) -> (BatchRunner, SharedEventBus) {
        let bus = create_event_bus();
        let runner = BatchRunner::new(CredentialVerifier::new(client), workers, bus.clone());
        (runner, bus)
    }

    fn progress_events(events: &[DomainEvent]) -> Vec<(u8, String, bool)> {
        events
            .iter()
            .filter_map(|e| match e {
                DomainEvent::BatchProgress {
                    percent,
                    message,
                    failed,
                    ..
                } => Some((*percent, message.clone(), *failed)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[tokio::test]
    async fn test_blank_success_and_failure() {
        let client = Arc::new(FakeIdentityClient::default());
        let (runner, bus) = runner(client.clone(), 5);
        let mut rx = bus.subscribe();

        let report = runner
            .run(&tokens(&["", "valid1", "bad2"]), &CancelHandle::new())
            .await;

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].username, "valid1");
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert!(!report.cancelled);
        assert_eq!(client.calls(), 2);

        let events = drain(&mut rx);
        let progress = progress_events(&events);
        assert_eq!(progress.len(), 2);
        assert_eq!(progress.iter().filter(|(_, _, failed)| *failed).count(), 1);
        assert_eq!(progress[0].0, 50);
        assert_eq!(progress[1].0, 100);
        assert!(progress
            .iter()
            .any(|(_, msg, _)| msg.starts_with("failed ") && msg.contains("Invalid token")));
        assert!(progress.iter().any(|(_, msg, _)| msg.starts_with("processing ")));

        assert_eq!(events.first(), Some(&DomainEvent::BatchStarted { total: 2 }));
        assert_eq!(
            events.last(),
            Some(&DomainEvent::BatchCompleted {
                verified: 1,
                failed: 1,
                skipped: 1,
                cancelled: false
            })
        );
    }

    #[tokio::test]
    async fn test_results_follow_input_order() {
        let client = Arc::new(FakeIdentityClient::with_delays(&[
            ("first", 60),
            ("second", 30),
            ("third", 1),
        ]));
        let (runner, _bus) = runner(client, 3);

        let report = runner
            .run(&tokens(&["first", "second", "third"]), &CancelHandle::new())
            .await;

        let names: Vec<_> = report.records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(report.tokens(), tokens(&["first", "second", "third"]));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let client = Arc::new(FakeIdentityClient::with_delays(&[
            ("a", 20),
            ("b", 20),
            ("c", 20),
            ("d", 20),
            ("e", 20),
            ("f", 20),
        ]));
        let (runner, _bus) = runner(client.clone(), 2);

        let report = runner
            .run(&tokens(&["a", "b", "c", "d", "e", "f"]), &CancelHandle::new())
            .await;

        assert_eq!(report.records.len(), 6);
        assert!(client.max_in_flight() <= 2);
        assert!(client.max_in_flight() >= 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let client = Arc::new(FakeIdentityClient::default());
        let (runner, bus) = runner(client.clone(), 5);
        let mut rx = bus.subscribe();

        let report = runner.run(&tokens(&[" ", ""]), &CancelHandle::new()).await;

        assert!(report.records.is_empty());
        assert_eq!(report.skipped, 2);
        assert_eq!(client.calls(), 0);
        assert_eq!(
            drain(&mut rx),
            vec![
                DomainEvent::BatchStarted { total: 0 },
                DomainEvent::BatchCompleted {
                    verified: 0,
                    failed: 0,
                    skipped: 2,
                    cancelled: false
                }
            ]
        );
    }

    #[tokio::test]
    async fn test_cancel_before_start_runs_nothing() {
        let client = Arc::new(FakeIdentityClient::default());
        let (runner, bus) = runner(client.clone(), 5);
        let mut rx = bus.subscribe();
        let cancel = CancelHandle::new();
        cancel.cancel();

        let report = runner.run(&tokens(&["a", "b"]), &cancel).await;

        assert!(report.cancelled);
        assert!(report.records.is_empty());
        assert_eq!(client.calls(), 0);
        assert!(progress_events(&drain(&mut rx)).is_empty());
    }

    #[tokio::test]
    async fn test_cancel_mid_batch_keeps_finished_items() {
        let cancel = CancelHandle::new();
        let client = Arc::new(FakeIdentityClient::cancelling(cancel.clone()));
        let (runner, bus) = runner(client.clone(), 1);
        let mut rx = bus.subscribe();

        let report = runner.run(&tokens(&["a", "b", "c"]), &cancel).await;

        assert!(report.cancelled);
        assert_eq!(client.seen(), vec!["a"]);
        assert_eq!(report.records.len(), 1);
        assert_eq!(progress_events(&drain(&mut rx)).len(), 1);
    }
}
