//! Manual event entry.

use chrono::{NaiveDate, NaiveTime, SecondsFormat};

use crate::error::ValidationError;
use crate::record::EventRecord;
use crate::timekeeping::local_to_utc;

/// Raw fields of the add-event form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualEntry {
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` or `HH:MM:SS`, local wall-clock time
    pub time: String,
    pub description: String,
}

impl ManualEntry {
    /// Build the record, or `None` if a required field is blank or the date
    /// and time do not form a valid local instant.
    pub fn submit(&self) -> Option<EventRecord> {
        self.validate().ok()
    }

    /// Like [`ManualEntry::submit`] but reports what was wrong.
    pub fn validate(&self) -> Result<EventRecord, ValidationError> {
        let title = required("title", &self.title)?;
        let date = required("date", &self.date)?;
        let time = required("time", &self.time)?;

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| ValidationError::InvalidValue {
            field: "date".into(),
            message: e.to_string(),
        })?;
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .map_err(|e| ValidationError::InvalidValue {
                field: "time".into(),
                message: e.to_string(),
            })?;

        let combined = date.and_time(time);
        let instant = local_to_utc(combined, &combined.to_string()).map_err(|e| ValidationError::InvalidValue {
            field: "time".into(),
            message: e.to_string(),
        })?;

        Ok(EventRecord::new(
            title,
            instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.description.trim(),
        ))
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field.to_string()))
    } else {
        Ok(value)
    }
}
