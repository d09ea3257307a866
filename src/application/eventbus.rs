use crate::domain::event::DomainEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Event bus for publishing and subscribing to domain events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: DomainEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::trace!("No subscribers for event: {}", e);
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Shared event bus wrapped in Arc for thread-safe sharing
pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::default())
}

/// Drain every event currently buffered for `rx` without waiting.
#[cfg(test)]
pub(crate) fn drain(rx: &mut broadcast::Receiver<DomainEvent>) -> Vec<DomainEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_ignored() {
        let bus = create_event_bus();
        bus.publish(DomainEvent::BatchStarted { total: 1 });
    }

    #[test]
    fn test_subscriber_receives_in_publish_order() {
        let bus = create_event_bus();
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::BatchStarted { total: 2 });
        bus.publish(DomainEvent::GroupsChanged {
            group: "g".to_string(),
        });

        let names: Vec<_> = drain(&mut rx).iter().map(|e| e.event_name()).collect();
        assert_eq!(names, vec!["batch_started", "groups_changed"]);
    }
}
