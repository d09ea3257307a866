use crate::application::eventbus::SharedEventBus;
use crate::domain::event::DomainEvent;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;

/// Start listening to the event bus and render batch progress on the terminal.
///
/// Subscribes before returning, so no event published afterwards is missed.
/// The task ends after `BatchCompleted` or when the bus closes.
pub fn start_event_forwarder(event_bus: SharedEventBus) -> JoinHandle<()> {
    let mut receiver = event_bus.subscribe();

    tokio::spawn(async move {
        let mut bar: Option<ProgressBar> = None;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if forward_event(&mut bar, event) {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event forwarder lagged by {} events", n);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, stopping forwarder");
                    break;
                }
            }
        }
        if let Some(pb) = bar.take() {
            pb.finish_and_clear();
        }
    })
}

/// Apply one event to the progress bar; true once the batch is over
fn forward_event(bar: &mut Option<ProgressBar>, event: DomainEvent) -> bool {
    tracing::trace!("Forwarding event {}", event.event_name());

    match event {
        DomainEvent::BatchStarted { total } => {
            let pb = ProgressBar::new(100);
            match ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/dim}] {pos:>3}% {msg}") {
                Ok(style) => pb.set_style(style.progress_chars("━╸─")),
                Err(e) => tracing::debug!("Invalid progress template: {}", e),
            }
            pb.set_message(format!("verifying {} tokens...", total));
            pb.enable_steady_tick(std::time::Duration::from_millis(80));
            *bar = Some(pb);
            false
        }
        DomainEvent::BatchProgress {
            percent,
            message,
            failed,
            ..
        } => {
            if let Some(pb) = bar.as_ref() {
                pb.set_position(u64::from(percent));
                if failed {
                    pb.println(format!("  ✗ {}", message));
                }
                pb.set_message(message);
            }
            false
        }
        DomainEvent::BatchCompleted { .. } => {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
            true
        }
        DomainEvent::GroupsChanged { .. } => false,
    }
}
