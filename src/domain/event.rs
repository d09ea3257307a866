use serde::{Deserialize, Serialize};

/// Domain events that represent state changes in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// A verification batch was dispatched
    BatchStarted { total: usize },

    /// One batch item finished, successfully or not
    BatchProgress {
        percent: u8,
        completed: usize,
        total: usize,
        message: String,
        failed: bool,
    },

    /// The batch finished; counts describe the whole run
    BatchCompleted {
        verified: usize,
        failed: usize,
        skipped: usize,
        cancelled: bool,
    },

    /// A group store mutation was persisted
    GroupsChanged { group: String },
}

impl DomainEvent {
    /// Get the event type name for subscriber routing
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::BatchStarted { .. } => "batch_started",
            Self::BatchProgress { .. } => "batch_progress",
            Self::BatchCompleted { .. } => "batch_completed",
            Self::GroupsChanged { .. } => "groups_changed",
        }
    }
}
