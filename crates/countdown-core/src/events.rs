use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every store mutation produces an event.
/// Views subscribe to them to know when to re-render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    EventAdded {
        id: String,
        at: DateTime<Utc>,
    },
    EventRemoved {
        id: String,
        at: DateTime<Utc>,
    },
    /// All records dropped at once.
    StoreCleared {
        removed: usize,
        at: DateTime<Utc>,
    },
}

impl StoreEvent {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            StoreEvent::EventAdded { at, .. }
            | StoreEvent::EventRemoved { at, .. }
            | StoreEvent::StoreCleared { at, .. } => *at,
        }
    }
}
