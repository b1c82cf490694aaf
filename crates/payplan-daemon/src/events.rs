//! Change notification bus.
//!
//! Every mirrored row change is broadcast as a [`Event`]. Each subscriber
//! has an independent buffer; a subscriber that falls behind sees
//! `RecvError::Lagged` and must treat it as "everything changed".

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use payplan_types::events::{Event, EventType};
use tokio::sync::broadcast;

/// Event bus for broadcasting change events to subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    sequence: Arc<AtomicU64>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: Event) {
        self.sequence.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(event_type = ?event.event_type, member = ?event.member_id, "event emitted");
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to events. Returns a receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Get the current sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

/// Whether an event only affects the member it names.
///
/// Settings and revenue changes alter every member's dashboard, so they are
/// plan-wide even when a member is attached.
pub fn is_member_scoped(event: &Event) -> bool {
    event.member_id.is_some()
        && matches!(
            event.event_type,
            EventType::LegVolumesChanged | EventType::EarningsChanged
        )
}

/// Current Unix time in seconds.
pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
