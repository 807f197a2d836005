use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;

use super::event_types::{EventEnvelope, LedgerEvent};

/// Channel prefix for ledger events
const EVENT_CHANNEL_PREFIX: &str = "ledger:";

/// Sink for committed ledger events. Publishing is infallible from the
/// ledger's point of view: a committed state change is never rolled back
/// because a notification could not be delivered.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: LedgerEvent);
}

pub fn channel_for_event(event: &LedgerEvent) -> String {
    format!("{}{}", EVENT_CHANNEL_PREFIX, event.name())
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _event: LedgerEvent) {}
}

/// Append-only in-memory journal of published events.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: RwLock<Vec<EventEnvelope>>,
    next_sequence: AtomicU64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.entries.read().iter().map(|e| e.event.clone()).collect()
    }

    /// Entries with a sequence number at or after `from`.
    pub fn since(&self, from: u64) -> Vec<EventEnvelope> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.sequence >= from)
            .cloned()
            .collect()
    }

    pub fn last(&self) -> Option<LedgerEvent> {
        self.entries.read().last().map(|e| e.event.clone())
    }
}

impl EventPublisher for EventLog {
    fn publish(&self, event: LedgerEvent) {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        info!(
            channel = %channel_for_event(&event),
            sequence,
            bounty_id = ?event.bounty_id(),
            "Published ledger event"
        );
        self.entries.write().push(EventEnvelope {
            sequence,
            emitted_at: Utc::now(),
            event,
        });
    }
}
