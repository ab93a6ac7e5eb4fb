//! Per-event countdown card.
//!
//! A [`CountdownCard`] is the view model behind one displayed deadline. A
//! [`CardTicker`] refreshes it on a fixed period while it is shown; dropping
//! the ticker stops the refresh, so removing a card from the view can never
//! leave a timer behind.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::TimeError;
use crate::export::{Theme, Typeface};
use crate::record::EventRecord;
use crate::timekeeping::{self, format_local, pad2, RemainingDuration, Tier};

const TITLE_FALLBACK: &str = "Untitled Event";
const DESCRIPTION_FALLBACK: &str = "Deadline Countdown";

/// What a card shows at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardFrame {
    pub id: String,
    pub remaining: RemainingDuration,
    pub tier: Tier,
    pub at: DateTime<Utc>,
}

impl CardFrame {
    pub fn is_expired(&self) -> bool {
        self.remaining.is_expired()
    }

    /// Zero-padded unit values with their labels, in display order.
    pub fn unit_cells(&self) -> [(String, &'static str); 4] {
        self.remaining.units().map(|(value, label)| (pad2(value), label))
    }
}

/// View model for one event.
#[derive(Debug, Clone)]
pub struct CountdownCard {
    event: EventRecord,
    target: DateTime<Utc>,
    frame: CardFrame,
}

impl CountdownCard {
    /// Build a card and compute its first frame against the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError`] if the event's target cannot be parsed.
    pub fn new(event: EventRecord) -> Result<Self, TimeError> {
        Self::new_at(event, Utc::now())
    }

    pub fn new_at(event: EventRecord, now: DateTime<Utc>) -> Result<Self, TimeError> {
        let target = event.target()?;
        let frame = frame_for(&event.id, target, now);
        Ok(Self { event, target, frame })
    }

    pub fn event(&self) -> &EventRecord {
        &self.event
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    pub fn frame(&self) -> &CardFrame {
        &self.frame
    }

    pub fn refresh(&mut self) -> &CardFrame {
        self.refresh_at(Utc::now())
    }

    pub fn refresh_at(&mut self, now: DateTime<Utc>) -> &CardFrame {
        self.frame = frame_for(&self.event.id, self.target, now);
        &self.frame
    }

    pub fn title(&self) -> &str {
        non_empty_or(&self.event.title, TITLE_FALLBACK)
    }

    pub fn description(&self) -> &str {
        non_empty_or(&self.event.description, DESCRIPTION_FALLBACK)
    }

    pub fn target_date(&self, pattern: &str) -> String {
        format_local(self.target, pattern)
    }
}

fn frame_for(id: &str, target: DateTime<Utc>, now: DateTime<Utc>) -> CardFrame {
    let remaining = timekeeping::remaining_at(target, now);
    CardFrame {
        id: id.to_string(),
        tier: timekeeping::classify(remaining.total_ms),
        remaining,
        at: now,
    }
}

fn non_empty_or<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.trim().is_empty() {
        fallback
    } else {
        s
    }
}

/// Periodic refresh of one card.
///
/// The latest frame is published on a watch channel; the background task is
/// aborted on [`CardTicker::stop`] or drop.
pub struct CardTicker {
    frames: watch::Receiver<CardFrame>,
    handle: JoinHandle<()>,
}

impl CardTicker {
    /// Start refreshing `card` every `period`. Must be called inside a Tokio
    /// runtime.
    pub fn spawn(mut card: CountdownCard, period: Duration) -> Self {
        let (tx, rx) = watch::channel(card.frame().clone());
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let frame = card.refresh().clone();
                if tx.send(frame).is_err() {
                    break;
                }
            }
        });
        Self { frames: rx, handle }
    }

    /// Latest published frame.
    pub fn current(&self) -> CardFrame {
        self.frames.borrow().clone()
    }

    /// A receiver that wakes whenever a new frame is published.
    pub fn frames(&self) -> watch::Receiver<CardFrame> {
        self.frames.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        // Drop does the work.
    }
}

impl Drop for CardTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Where a pointer interaction landed relative to the style popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Inside,
    Outside,
}

/// Export style popover attached to a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePicker {
    open: bool,
    theme: Theme,
    typeface: Typeface,
}

impl Default for StylePicker {
    fn default() -> Self {
        Self::new(Theme::default(), Typeface::default())
    }
}

impl StylePicker {
    pub fn new(theme: Theme, typeface: Typeface) -> Self {
        Self {
            open: false,
            theme,
            typeface,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn typeface(&self) -> Typeface {
        self.typeface
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn select_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn select_typeface(&mut self, typeface: Typeface) {
        self.typeface = typeface;
    }

    /// Outside interactions close the popover; inside ones leave it alone.
    pub fn interact(&mut self, at: Interaction) {
        if at == Interaction::Outside {
            self.open = false;
        }
    }

    /// Selected style for an export. Closes the popover.
    pub fn take_selection(&mut self) -> (Theme, Typeface) {
        self.open = false;
        (self.theme, self.typeface)
    }
}
