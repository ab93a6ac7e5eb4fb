//! Time-remaining computation.
//!
//! The breakdown is a fixed-radix decomposition of a millisecond count:
//! a day is always 86 400 000 ms. Month lengths, DST shifts and leap seconds
//! are ignored on purpose.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse::parse_timestamp;
use super::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use crate::error::TimeError;

/// Days/hours/minutes/seconds left until a target instant.
///
/// When `total_ms` is zero the reading is expired and every unit is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemainingDuration {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    #[serde(rename = "totalMs")]
    pub total_ms: i64,
}

impl RemainingDuration {
    /// The clamped reading for a target that has already passed.
    pub const EXPIRED: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        total_ms: 0,
    };

    /// Decompose a millisecond delta. Non-positive input yields [`Self::EXPIRED`].
    pub fn from_millis(total_ms: i64) -> Self {
        if total_ms <= 0 {
            return Self::EXPIRED;
        }
        Self {
            days: (total_ms / MS_PER_DAY) as u64,
            hours: (total_ms / MS_PER_HOUR % 24) as u64,
            minutes: (total_ms / MS_PER_MINUTE % 60) as u64,
            seconds: (total_ms / MS_PER_SECOND % 60) as u64,
            total_ms,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.total_ms <= 0
    }

    /// Milliseconds represented by the unit fields (whole seconds only).
    pub fn unit_ms(&self) -> i64 {
        self.days as i64 * MS_PER_DAY
            + self.hours as i64 * MS_PER_HOUR
            + self.minutes as i64 * MS_PER_MINUTE
            + self.seconds as i64 * MS_PER_SECOND
    }

    /// `(value, label)` pairs in display order.
    pub fn units(&self) -> [(u64, &'static str); 4] {
        [
            (self.days, "Days"),
            (self.hours, "Hours"),
            (self.minutes, "Mins"),
            (self.seconds, "Secs"),
        ]
    }
}

/// Time left between `now` and `target`.
pub fn remaining_at(target: DateTime<Utc>, now: DateTime<Utc>) -> RemainingDuration {
    RemainingDuration::from_millis((target - now).num_milliseconds())
}

/// Time left until a textual target, measured against the system clock.
///
/// # Errors
///
/// Returns [`TimeError`] if `target` is not a recognizable timestamp.
pub fn remaining(target: &str) -> Result<RemainingDuration, TimeError> {
    let target = parse_timestamp(target)?;
    Ok(remaining_at(target, Utc::now()))
}

/// Two-digit zero-padded unit value as shown on cards and exports.
pub fn pad2(value: u64) -> String {
    format!("{value:02}")
}
