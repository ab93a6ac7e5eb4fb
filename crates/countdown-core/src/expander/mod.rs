//! Free-text to events expansion.
//!
//! The expander is an external collaborator: it may be slow, wrong, or down.
//! Callers only ever see a (possibly empty) list of candidate records; every
//! failure is logged and swallowed here.

mod gemini;

pub use gemini::GeminiExpander;

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

use crate::record::{new_id, EventRecord};
use crate::timekeeping::parse_timestamp;

/// Errors raised inside an expander. Never returned from
/// [`PromptExpander::expand`].
#[derive(Error, Debug)]
pub enum ExpanderError {
    #[error("no API key configured (set GEMINI_API_KEY or run `countdown auth set-key`)")]
    MissingApiKey,

    #[error("invalid expander endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response envelope: {0}")]
    Envelope(String),

    #[error("response is not a list of events: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("keyring error: {0}")]
    Keyring(String),
}

/// Turns a free-text request into candidate events.
pub trait PromptExpander {
    /// Best-effort candidates for `prompt`. Empty on any failure.
    fn expand(&self, prompt: &str) -> impl Future<Output = Vec<EventRecord>> + Send;
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    id: Option<String>,
    title: String,
    time: String,
    #[serde(default)]
    description: Option<String>,
}

/// Parse the service's JSON text into records.
///
/// The text must be an array of objects carrying string `title` and `time`.
/// Entries whose `time` is not a valid timestamp are dropped; missing ids are
/// generated.
///
/// # Errors
///
/// Returns [`ExpanderError::Schema`] if the text is not such an array.
pub fn parse_candidates(text: &str) -> Result<Vec<EventRecord>, ExpanderError> {
    let candidates: Vec<Candidate> = serde_json::from_str(text.trim())?;

    let records = candidates
        .into_iter()
        .filter_map(|c| {
            if let Err(e) = parse_timestamp(&c.time) {
                tracing::warn!(title = %c.title, "dropping candidate: {e}");
                return None;
            }
            let id = c.id.filter(|id| !id.trim().is_empty()).unwrap_or_else(new_id);
            Some(EventRecord {
                id,
                title: c.title,
                time: c.time,
                description: c.description.unwrap_or_default(),
            })
        })
        .collect();
    Ok(records)
}

/// Like [`parse_candidates`], logging and returning an empty list on failure.
pub fn parse_candidates_lenient(text: &str) -> Vec<EventRecord> {
    parse_candidates(text).unwrap_or_else(|e| {
        tracing::warn!("failed to parse expander response: {e}");
        Vec::new()
    })
}

/// Resolve the expander API key: `GEMINI_API_KEY`, then `API_KEY`, then the
/// OS keyring.
pub fn resolve_api_key() -> Option<String> {
    for var in ["GEMINI_API_KEY", "API_KEY"] {
        if let Ok(key) = std::env::var(var) {
            if !key.trim().is_empty() {
                return Some(key);
            }
        }
    }
    match keyring_store::get(keyring_store::API_KEY_ENTRY) {
        Ok(key) => key.filter(|k| !k.trim().is_empty()),
        Err(e) => {
            tracing::debug!("keyring lookup failed: {e}");
            None
        }
    }
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use super::ExpanderError;

    const SERVICE: &str = "countdown";
    pub const API_KEY_ENTRY: &str = "gemini_api_key";

    pub fn get(key: &str) -> Result<Option<String>, ExpanderError> {
        let entry = keyring::Entry::new(SERVICE, key).map_err(keyring_err)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(keyring_err(e)),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), ExpanderError> {
        let entry = keyring::Entry::new(SERVICE, key).map_err(keyring_err)?;
        entry.set_password(value).map_err(keyring_err)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), ExpanderError> {
        let entry = keyring::Entry::new(SERVICE, key).map_err(keyring_err)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(keyring_err(e)),
        }
    }

    fn keyring_err(e: keyring::Error) -> ExpanderError {
        ExpanderError::Keyring(e.to_string())
    }
}
