//! Countdown image export.
//!
//! Rendering is split in three stages:
//!
//! ```text
//! compose (layout arithmetic) -> Rasterizer::paint (pixmap) -> encode_jpeg
//! ```
//!
//! Only the first stage knows about countdowns; the other two replay a
//! [`Scene`].

mod filename;
mod layout;
mod raster;
mod theme;

pub use filename::{export_filename, MAX_STEM_BYTES};
pub use layout::{
    card_origins, clamp_radius, compose, DrawOp, FontWeight, Outline, Scene, CANVAS_HEIGHT,
    CANVAS_WIDTH, CARD_GAP, CARD_HEIGHT, CARD_RADIUS, CARD_TOP, CARD_WIDTH,
};
pub use raster::{encode_jpeg, rounded_rect_path, Rasterizer};
pub use theme::{GenericFamily, Palette, Rgba, Theme, Typeface};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::ExportError;
use crate::record::EventRecord;
use crate::storage::{DisplayConfig, ExportConfig};
use crate::timekeeping::{self, format_local};

/// Renders countdown images with the configured quality, watermark and
/// footer date format.
pub struct Exporter {
    rasterizer: Rasterizer,
    quality: u8,
    watermark: String,
    datetime_format: String,
}

impl Exporter {
    pub fn new(export: &ExportConfig, display: &DisplayConfig) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            quality: export.quality,
            watermark: export.watermark.clone(),
            datetime_format: display.datetime_format(),
        }
    }

    /// Lay out `event` as it stands at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Time`] if the event's target is not a valid
    /// timestamp.
    pub fn compose_at(
        &self,
        event: &EventRecord,
        theme: Theme,
        typeface: Typeface,
        now: DateTime<Utc>,
    ) -> Result<Scene, ExportError> {
        let target = event.target()?;
        let remaining = timekeeping::remaining_at(target, now);
        let label = format_local(target, &self.datetime_format);
        Ok(compose(event, &remaining, theme, typeface, &label, &self.watermark))
    }

    /// Render `event` to JPEG bytes as it stands at `now`.
    pub fn render_at(
        &mut self,
        event: &EventRecord,
        theme: Theme,
        typeface: Typeface,
        now: DateTime<Utc>,
    ) -> Result<Vec<u8>, ExportError> {
        let scene = self.compose_at(event, theme, typeface, now)?;
        let pixmap = self.rasterizer.paint(&scene)?;
        encode_jpeg(&pixmap, self.quality)
    }

    /// Render `event` to JPEG bytes against the system clock.
    pub fn render(&mut self, event: &EventRecord, theme: Theme, typeface: Typeface) -> Result<Vec<u8>, ExportError> {
        self.render_at(event, theme, typeface, Utc::now())
    }

    /// Render and write `<sanitized title>.jpg` into `dir`. Returns the file path.
    pub fn export_to_dir(
        &mut self,
        event: &EventRecord,
        theme: Theme,
        typeface: Typeface,
        dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let bytes = self.render(event, theme, typeface)?;
        let path = dir.join(export_filename(&event.title));
        std::fs::write(&path, bytes).map_err(|source| ExportError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), %theme, %typeface, "countdown exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn exam() -> EventRecord {
        EventRecord {
            id: "a".into(),
            title: "Final Exam".into(),
            time: "2099-01-01T00:00:00Z".into(),
            description: String::new(),
        }
    }

    fn exporter() -> Exporter {
        Exporter::new(&ExportConfig::default(), &DisplayConfig::default())
    }

    #[test]
    fn compose_at_switches_to_banner_after_target() {
        let ex = exporter();
        let before = Utc.with_ymd_and_hms(2098, 12, 31, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2099, 1, 2, 0, 0, 0).unwrap();

        let running = ex.compose_at(&exam(), Theme::Indigo, Typeface::Modern, before).unwrap();
        assert!(running.texts().any(|t| t == "DAYS"));

        let done = ex.compose_at(&exam(), Theme::Indigo, Typeface::Modern, after).unwrap();
        assert!(done.texts().any(|t| t == "COMPLETED"));
        assert!(done.texts().any(|t| t.starts_with("TARGET: ")));
    }

    #[test]
    fn compose_rejects_bad_target() {
        let mut event = exam();
        event.time = "someday".into();
        let err = exporter()
            .compose_at(&event, Theme::Indigo, Typeface::Modern, Utc::now())
            .unwrap_err();
        assert!(matches!(err, ExportError::Time(_)));
    }

    #[test]
    fn painted_card_is_lighter_than_background() {
        let ex = exporter();
        let now = Utc.with_ymd_and_hms(2098, 12, 31, 0, 0, 0).unwrap();
        let scene = ex.compose_at(&exam(), Theme::Indigo, Typeface::Modern, now).unwrap();
        let pixmap = Rasterizer::new().paint(&scene).unwrap();

        let bg = pixmap.pixel(20, 20).unwrap().demultiply();
        assert_eq!((bg.red(), bg.green(), bg.blue()), (0x4f, 0x46, 0xe5));

        let card = pixmap.pixel(110, 460).unwrap().demultiply();
        assert!(card.red() > bg.red());
        assert!(card.green() > bg.green());
    }

    #[test]
    fn export_writes_jpeg_of_canvas_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = exporter()
            .export_to_dir(&exam(), Theme::White, Typeface::Classic, dir.path())
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "Final_Exam.jpg");

        let bytes = std::fs::read(&path).unwrap();
        let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg).unwrap();
        assert_eq!((img.width(), img.height()), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }

    #[test]
    fn export_with_very_long_title_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let mut event = exam();
        event.title = "a".repeat(300);
        let path = exporter()
            .export_to_dir(&event, Theme::Indigo, Typeface::Modern, dir.path())
            .unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap().len(), MAX_STEM_BYTES + ".jpg".len());
    }
}
