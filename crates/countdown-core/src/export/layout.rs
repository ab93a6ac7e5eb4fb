//! Export layout.
//!
//! Turns one countdown into a flat list of draw operations on a fixed
//! 1200x800 canvas. Everything here is plain arithmetic; the rasterizer only
//! replays the list.

use super::theme::{Palette, Rgba, Theme, Typeface};
use crate::record::EventRecord;
use crate::timekeeping::{pad2, RemainingDuration};

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 800;

pub const CARD_WIDTH: f32 = 220.0;
pub const CARD_HEIGHT: f32 = 240.0;
pub const CARD_GAP: f32 = 40.0;
pub const CARD_RADIUS: f32 = 30.0;
pub const CARD_TOP: f32 = 340.0;
const CARD_COUNT: usize = 4;

const TITLE_FALLBACK: &str = "Untitled Event";
const DESCRIPTION_FALLBACK: &str = "Deadline Countdown";
const COMPLETED_BANNER: &str = "COMPLETED";
const WATERMARK_OPACITY: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Medium,
    Bold,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Rgba,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Flood the whole canvas.
    Background(Rgba),
    RoundRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Rgba,
        outline: Option<Outline>,
    },
    /// Single line of text centered on `center_x` with its baseline at `baseline_y`.
    Text {
        text: String,
        center_x: f32,
        baseline_y: f32,
        size: f32,
        weight: FontWeight,
        color: Rgba,
        opacity: f32,
    },
}

/// A composed export, ready for rasterizing.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub typeface: Typeface,
    pub ops: Vec<DrawOp>,
}

impl Scene {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Clamp a corner radius so opposite arcs never overlap.
pub fn clamp_radius(width: f32, height: f32, radius: f32) -> f32 {
    radius.min(width / 2.0).min(height / 2.0).max(0.0)
}

/// Left edge of each unit card, with the row centered on the canvas.
pub fn card_origins() -> [f32; CARD_COUNT] {
    let n = CARD_COUNT as f32;
    let total_width = n * CARD_WIDTH + (n - 1.0) * CARD_GAP;
    let start_x = (CANVAS_WIDTH as f32 - total_width) / 2.0;
    std::array::from_fn(|i| start_x + i as f32 * (CARD_WIDTH + CARD_GAP))
}

/// Lay out one countdown.
///
/// `target_label` is the already formatted target date shown in the footer.
pub fn compose(
    event: &EventRecord,
    remaining: &RemainingDuration,
    theme: Theme,
    typeface: Typeface,
    target_label: &str,
    watermark: &str,
) -> Scene {
    let palette = theme.palette();
    let center_x = CANVAS_WIDTH as f32 / 2.0;
    let mut ops = vec![DrawOp::Background(palette.background)];

    let title = non_empty_or(&event.title, TITLE_FALLBACK);
    ops.push(text(title, center_x, 180.0, 72.0, FontWeight::Black, palette.text));

    let description = non_empty_or(&event.description, DESCRIPTION_FALLBACK);
    ops.push(text(description, center_x, 250.0, 32.0, FontWeight::Medium, palette.secondary));

    if remaining.is_expired() {
        ops.push(text(COMPLETED_BANNER, center_x, 480.0, 100.0, FontWeight::Black, palette.text));
    } else {
        push_unit_cards(&mut ops, remaining, &palette);
    }

    ops.push(text(
        &format!("TARGET: {target_label}"),
        center_x,
        680.0,
        26.0,
        FontWeight::Bold,
        palette.secondary,
    ));

    if !watermark.is_empty() {
        ops.push(DrawOp::Text {
            text: single_line(watermark),
            center_x,
            baseline_y: 740.0,
            size: 32.0,
            weight: FontWeight::Black,
            color: palette.accent,
            opacity: WATERMARK_OPACITY,
        });
    }

    Scene {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        typeface,
        ops,
    }
}

fn push_unit_cards(ops: &mut Vec<DrawOp>, remaining: &RemainingDuration, palette: &Palette) {
    let outline = palette.card_outline.map(|color| Outline { color, width: 2.0 });

    for (x, (value, label)) in card_origins().into_iter().zip(remaining.units()) {
        ops.push(DrawOp::RoundRect {
            x,
            y: CARD_TOP,
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            radius: clamp_radius(CARD_WIDTH, CARD_HEIGHT, CARD_RADIUS),
            fill: palette.card,
            outline,
        });

        let card_center = x + CARD_WIDTH / 2.0;
        ops.push(text(
            &pad2(value),
            card_center,
            CARD_TOP + 130.0,
            96.0,
            FontWeight::Black,
            palette.accent,
        ));
        ops.push(text(
            &label.to_uppercase(),
            card_center,
            CARD_TOP + 185.0,
            24.0,
            FontWeight::Bold,
            palette.secondary,
        ));
    }
}

fn text(s: &str, center_x: f32, baseline_y: f32, size: f32, weight: FontWeight, color: Rgba) -> DrawOp {
    DrawOp::Text {
        text: single_line(s),
        center_x,
        baseline_y,
        size,
        weight,
        color,
        opacity: 1.0,
    }
}

/// Text ops are single lines: newlines, tabs and other control characters
/// become spaces.
fn single_line(s: &str) -> String {
    s.chars().map(|c| if c.is_control() { ' ' } else { c }).collect()
}

fn non_empty_or<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.trim().is_empty() {
        fallback
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timekeeping::MS_PER_DAY;

    fn exam() -> EventRecord {
        EventRecord {
            id: "a".into(),
            title: "Exam".into(),
            time: "2099-01-01T00:00:00Z".into(),
            description: "Finals week".into(),
        }
    }

    fn round_rects(scene: &Scene) -> Vec<(f32, f32, f32, f32, f32)> {
        scene
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::RoundRect { x, y, width, height, radius, .. } => {
                    Some((*x, *y, *width, *height, *radius))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cards_are_centered() {
        assert_eq!(card_origins(), [100.0, 360.0, 620.0, 880.0]);
        let last = card_origins()[3] + CARD_WIDTH;
        assert_eq!(last, CANVAS_WIDTH as f32 - 100.0);
    }

    #[test]
    fn radius_is_clamped_to_half_the_shorter_side() {
        assert_eq!(clamp_radius(220.0, 240.0, 30.0), 30.0);
        assert_eq!(clamp_radius(20.0, 240.0, 30.0), 10.0);
        assert_eq!(clamp_radius(220.0, 12.0, 30.0), 6.0);
        assert_eq!(clamp_radius(8.0, 4.0, 30.0), 2.0);
        assert_eq!(clamp_radius(10.0, 10.0, -5.0), 0.0);
    }

    #[test]
    fn running_countdown_draws_four_cards() {
        let r = RemainingDuration::from_millis(3 * MS_PER_DAY + 7_000);
        let scene = compose(&exam(), &r, Theme::Indigo, Typeface::Modern, "01 Jan 2099", "TIMER BD");

        let rects = round_rects(&scene);
        assert_eq!(rects.len(), 4);
        for ((x, y, w, h, radius), expected_x) in rects.into_iter().zip(card_origins()) {
            assert_eq!((x, y, w, h, radius), (expected_x, 340.0, 220.0, 240.0, 30.0));
        }

        let texts: Vec<_> = scene.texts().collect();
        assert_eq!(
            texts,
            [
                "Exam",
                "Finals week",
                "03",
                "DAYS",
                "00",
                "HOURS",
                "00",
                "MINS",
                "07",
                "SECS",
                "TARGET: 01 Jan 2099",
                "TIMER BD"
            ]
        );
        assert!(!texts.contains(&"COMPLETED"));
    }

    #[test]
    fn expired_countdown_draws_banner_instead_of_cards() {
        let scene = compose(
            &exam(),
            &RemainingDuration::EXPIRED,
            Theme::Slate,
            Typeface::Classic,
            "x",
            "TIMER BD",
        );
        assert!(round_rects(&scene).is_empty());
        assert!(scene.texts().any(|t| t == "COMPLETED"));
    }

    #[test]
    fn blank_title_and_description_fall_back() {
        let mut event = exam();
        event.title = "  ".into();
        event.description.clear();
        let scene = compose(&event, &RemainingDuration::EXPIRED, Theme::Rose, Typeface::Tech, "x", "");
        let texts: Vec<_> = scene.texts().collect();
        assert_eq!(texts[0], "Untitled Event");
        assert_eq!(texts[1], "Deadline Countdown");
        assert!(!texts.contains(&""));
    }

    #[test]
    fn multi_line_text_is_flattened() {
        let mut event = exam();
        event.title = "Final\nExam".into();
        event.description = "Room 4\r\n\tHall B".into();
        let scene = compose(&event, &RemainingDuration::EXPIRED, Theme::Indigo, Typeface::Modern, "x", "TIMER\nBD");
        let texts: Vec<_> = scene.texts().collect();
        assert_eq!(texts[0], "Final Exam");
        assert_eq!(texts[1], "Room 4   Hall B");
        assert!(texts.contains(&"TIMER BD"));
        assert!(texts.iter().all(|t| !t.chars().any(char::is_control)));
    }

    #[test]
    fn white_theme_outlines_cards() {
        let r = RemainingDuration::from_millis(MS_PER_DAY);
        let scene = compose(&exam(), &r, Theme::White, Typeface::Modern, "x", "");
        let outlined = scene
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::RoundRect { outline: Some(o), .. } if o.width == 2.0))
            .count();
        assert_eq!(outlined, 4);
    }

    #[test]
    fn watermark_is_faint() {
        let scene = compose(&exam(), &RemainingDuration::EXPIRED, Theme::Indigo, Typeface::Modern, "x", "BRAND");
        let opacity = scene.ops.iter().find_map(|op| match op {
            DrawOp::Text { text, opacity, baseline_y, .. } if text == "BRAND" => Some((*opacity, *baseline_y)),
            _ => None,
        });
        assert_eq!(opacity, Some((0.4, 740.0)));
    }

    #[test]
    fn scene_starts_with_background() {
        let scene = compose(&exam(), &RemainingDuration::EXPIRED, Theme::Emerald, Typeface::Modern, "x", "");
        assert_eq!(scene.ops[0], DrawOp::Background(Theme::Emerald.palette().background));
        assert_eq!((scene.width, scene.height), (1200, 800));
    }
}
