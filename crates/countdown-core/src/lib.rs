//! # Countdown Core Library
//!
//! This library provides the core logic for the Countdown deadline tracker.
//! It follows a CLI-first philosophy: every operation is available through the
//! standalone `countdown` binary, which is a thin presentation layer over this
//! crate.
//!
//! ## Architecture
//!
//! - **Time Engine**: pure fixed-radix decomposition of the milliseconds left
//!   until a target instant, plus the urgency tier derived from it
//! - **Event Store**: newest-first list of deadlines mirrored to a JSON file
//!   on every mutation
//! - **Card**: per-event view model refreshed by a cancellable ticker
//! - **Export**: fixed-layout 1200x800 JPEG rendering of one countdown
//! - **Expander**: free-text to events via a generative text service
//!
//! ## Key Components
//!
//! - [`remaining`] / [`classify`]: countdown arithmetic
//! - [`EventStore`]: persistence and change notifications
//! - [`Exporter`]: image rendering
//! - [`Config`]: application configuration management

pub mod card;
pub mod entry;
pub mod error;
pub mod events;
pub mod expander;
pub mod export;
pub mod record;
pub mod storage;
pub mod timekeeping;

pub use card::{CardFrame, CardTicker, CountdownCard, Interaction, StylePicker};
pub use entry::ManualEntry;
pub use error::{ConfigError, CoreError, ExportError, StoreError, TimeError, ValidationError};
pub use events::StoreEvent;
pub use expander::{ExpanderError, GeminiExpander, PromptExpander};
pub use export::{Exporter, Theme, Typeface};
pub use record::EventRecord;
pub use storage::{data_dir, Config, EventStore};
pub use timekeeping::{classify, parse_timestamp, remaining, remaining_at, RemainingDuration, Tier};
