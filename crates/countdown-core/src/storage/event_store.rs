//! Event list persistence.
//!
//! The whole list lives in memory and is rewritten to one JSON file after
//! every mutation. A missing or corrupt file is never fatal: the store starts
//! empty and logs why.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::broadcast;

use super::data_dir;
use crate::error::{ConfigError, StoreError};
use crate::events::StoreEvent;
use crate::record::EventRecord;

/// Name of the file holding the serialized list inside the data directory.
pub const STORAGE_SLOT: &str = "countdown_events.json";

const CHANNEL_CAPACITY: usize = 64;

/// Newest-first list of deadlines mirrored to disk.
pub struct EventStore {
    path: PathBuf,
    events: Vec<EventRecord>,
    notify: broadcast::Sender<StoreEvent>,
}

impl EventStore {
    /// Open the store in the data directory.
    pub fn open() -> Result<Self, ConfigError> {
        Ok(Self::with_path(data_dir()?.join(STORAGE_SLOT)))
    }

    /// Open a store backed by `path`, loading whatever valid list it holds.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let events = load_events(&path);
        let (notify, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            path,
            events,
            notify,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in display order (newest first).
    pub fn list(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&EventRecord> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Receive a [`StoreEvent`] for every subsequent mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.notify.subscribe()
    }

    /// Prepend a record and persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if the id is taken, or a write
    /// error if persisting fails. On error the store is left unchanged.
    pub fn add(&mut self, record: EventRecord) -> Result<(), StoreError> {
        if self.contains(&record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        let id = record.id.clone();
        let mut next = Vec::with_capacity(self.events.len() + 1);
        next.push(record);
        next.extend_from_slice(&self.events);
        self.commit(next)?;
        tracing::debug!(%id, "event added");
        self.publish(StoreEvent::EventAdded { id, at: Utc::now() });
        Ok(())
    }

    /// Remove the record with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(pos) = self.events.iter().position(|e| e.id == id) else {
            return Ok(false);
        };
        let mut next = self.events.clone();
        next.remove(pos);
        self.commit(next)?;
        tracing::debug!(%id, "event removed");
        self.publish(StoreEvent::EventRemoved {
            id: id.to_string(),
            at: Utc::now(),
        });
        Ok(true)
    }

    /// Drop every record. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        let removed = self.events.len();
        self.commit(Vec::new())?;
        tracing::debug!(removed, "store cleared");
        self.publish(StoreEvent::StoreCleared {
            removed,
            at: Utc::now(),
        });
        Ok(removed)
    }

    /// Add every record, assigning a fresh id to any that collide with an
    /// existing one. Returns the number added.
    pub fn extend(&mut self, records: impl IntoIterator<Item = EventRecord>) -> Result<usize, StoreError> {
        let mut added = 0;
        for mut record in records {
            while record.id.trim().is_empty() || self.contains(&record.id) {
                record.id = crate::record::new_id();
            }
            self.add(record)?;
            added += 1;
        }
        Ok(added)
    }

    fn publish(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.notify.send(event);
    }

    /// Write `next` to disk, then make it the in-memory list.
    fn commit(&mut self, next: Vec<EventRecord>) -> Result<(), StoreError> {
        self.persist(&next)?;
        self.events = next;
        Ok(())
    }

    fn persist(&self, events: &[EventRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(events)?;
        let write_failed = |source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_failed)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(write_failed)?;
        std::fs::rename(&tmp, &self.path).map_err(write_failed)?;
        Ok(())
    }
}

fn load_events(path: &Path) -> Vec<EventRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), "failed to read saved events: {e}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<EventRecord>>(&content) {
        Ok(events) => dedup_ids(events, path),
        Err(e) => {
            tracing::warn!(path = %path.display(), "failed to parse saved events: {e}");
            Vec::new()
        }
    }
}

/// Keep the first record for each id; later repeats are dropped.
fn dedup_ids(events: Vec<EventRecord>, path: &Path) -> Vec<EventRecord> {
    let mut seen = HashSet::with_capacity(events.len());
    let before = events.len();
    let events: Vec<_> = events.into_iter().filter(|e| seen.insert(e.id.clone())).collect();
    if events.len() < before {
        tracing::warn!(
            path = %path.display(),
            dropped = before - events.len(),
            "saved events contain repeated ids"
        );
    }
    events
}
