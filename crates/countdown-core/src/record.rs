use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TimeError;
use crate::timekeeping::{self, RemainingDuration, Tier};

/// A user-defined deadline.
///
/// Records are immutable once created; expiry is derived from `time`, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    /// Target instant in any representation [`timekeeping::parse_timestamp`] accepts.
    pub time: String,
    #[serde(default)]
    pub description: String,
}

impl EventRecord {
    /// Create a record with a fresh id.
    pub fn new(title: impl Into<String>, time: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            time: time.into(),
            description: description.into(),
        }
    }

    pub fn target(&self) -> Result<DateTime<Utc>, TimeError> {
        timekeeping::parse_timestamp(&self.time)
    }

    pub fn remaining_at(&self, now: DateTime<Utc>) -> Result<RemainingDuration, TimeError> {
        Ok(timekeeping::remaining_at(self.target()?, now))
    }

    pub fn tier_at(&self, now: DateTime<Utc>) -> Result<Tier, TimeError> {
        Ok(timekeeping::classify(self.remaining_at(now)?.total_ms))
    }
}

/// Opaque unique token for a new record.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_ids_are_unique() {
        let a = EventRecord::new("A", "2030-01-01T00:00:00Z", "");
        let b = EventRecord::new("A", "2030-01-01T00:00:00Z", "");
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 32);
    }

    #[test]
    fn description_defaults_to_empty() {
        let rec: EventRecord =
            serde_json::from_str(r#"{"id":"a","title":"Exam","time":"2099-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(rec.description, "");
    }

    #[test]
    fn tier_follows_clock() {
        let rec = EventRecord {
            id: "a".into(),
            title: "Exam".into(),
            time: "2099-01-01T00:00:00Z".into(),
            description: String::new(),
        };
        let before = Utc.with_ymd_and_hms(2098, 1, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(rec.tier_at(before).unwrap(), Tier::Normal);
        assert_eq!(rec.tier_at(after).unwrap(), Tier::Expired);
    }
}
