use std::time::{SystemTime, UNIX_EPOCH};

use crate::snapshot::Snapshot;

/// Immutable snapshot plus the events that led up to it.
#[derive(Clone, Debug)]
pub struct Checkpoint {
    snapshot: Snapshot,
    created_at_ms: u64,
    events: Vec<String>,
}

impl Checkpoint {
    pub(crate) fn new(snapshot: Snapshot, events: Vec<String>) -> Self {
        let created_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            snapshot,
            created_at_ms,
            events,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Creation time, milliseconds since the Unix epoch.
    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    /// Event descriptions accumulated since the previous checkpoint.
    pub fn events(&self) -> &[String] {
        &self.events
    }
}
