//! Terminal rendering of countdown cards.

use ansi_term::{Colour, Style};
use countdown_core::storage::DisplayConfig;
use countdown_core::{CardFrame, CountdownCard, EventRecord, RemainingDuration, Tier};
use serde::Serialize;

/// JSON shape printed by `event list --json` and `watch --json`.
#[derive(Serialize)]
pub struct CardJson<'a> {
    #[serde(flatten)]
    pub event: &'a EventRecord,
    pub remaining: Option<RemainingDuration>,
    pub tier: Option<Tier>,
}

impl<'a> CardJson<'a> {
    pub fn new(event: &'a EventRecord, frame: Option<&CardFrame>) -> Self {
        Self {
            event,
            remaining: frame.map(|f| f.remaining),
            tier: frame.map(|f| f.tier),
        }
    }
}

fn tier_colour(tier: Tier) -> Colour {
    let (r, g, b) = tier.rgb();
    Colour::RGB(r, g, b)
}

/// Multi-line card block.
pub fn card_block(card: &CountdownCard, frame: &CardFrame, display: &DisplayConfig, color: bool) -> String {
    let paint = |style: Style, s: &str| {
        if color {
            style.paint(s).to_string()
        } else {
            s.to_string()
        }
    };

    let mut out = String::new();
    out.push_str(&paint(Style::new().bold(), card.title()));
    out.push_str(&format!("  [{}]\n", card.event().id));
    out.push_str(&format!("  {}\n", card.description()));

    if frame.is_expired() {
        out.push_str(&format!("  {}\n", paint(tier_colour(Tier::Expired).bold(), "COMPLETED")));
    } else {
        let cells: Vec<String> = frame
            .unit_cells()
            .iter()
            .map(|(value, label)| format!("{} {}", value, label.to_uppercase()))
            .collect();
        out.push_str(&format!("  {}\n", paint(tier_colour(frame.tier).bold(), &cells.join("  "))));
    }

    out.push_str(&format!(
        "  Target: {}  {}\n",
        card.target_date(&display.date_format),
        card.target_date(&display.time_format)
    ));
    out
}

/// Block for a record whose target cannot be parsed.
pub fn invalid_block(event: &EventRecord, reason: &str) -> String {
    format!("{}  [{}]\n  invalid target '{}': {}\n", event.title, event.id, event.time, reason)
}
