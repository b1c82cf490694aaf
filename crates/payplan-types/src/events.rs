//! Read-model change events.
//!
//! Every mirrored row change is announced as an [`Event`]. Listeners treat
//! events as cache invalidations and recompute from the store.

use serde::{Deserialize, Serialize};

/// Envelope for change events.
#[derive(Clone, Debug, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Event {
    pub event_type: EventType,
    pub timestamp: u64,
    /// Member affected, or `None` when the change is plan-wide.
    pub member_id: Option<String>,
}

/// All change event types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EventType {
    SettingsChanged,
    RevenueRecorded,
    LegVolumesChanged,
    EarningsChanged,
    /// Periodic poll tick; forces every cached snapshot to refresh.
    Refresh,
}

impl Event {
    /// A plan-wide event (settings, revenue, poll tick).
    pub fn global(event_type: EventType, timestamp: u64) -> Self {
        Self {
            event_type,
            timestamp,
            member_id: None,
        }
    }

    /// An event scoped to one member.
    pub fn for_member(event_type: EventType, timestamp: u64, member_id: impl Into<String>) -> Self {
        Self {
            event_type,
            timestamp,
            member_id: Some(member_id.into()),
        }
    }
}
