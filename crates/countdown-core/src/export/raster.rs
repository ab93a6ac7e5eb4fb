//! Scene rasterizing: tiny-skia for shapes, cosmic-text for glyphs, image
//! for JPEG encoding.

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, Weight};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::layout::{clamp_radius, DrawOp, FontWeight, Outline, Scene};
use super::theme::{GenericFamily, Rgba, Typeface};
use crate::error::ExportError;

/// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_75;

/// Owns the font database and glyph cache so repeated exports skip the
/// system font scan.
pub struct Rasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
        }
    }

    /// Replay a scene onto a fresh pixmap.
    pub fn paint(&mut self, scene: &Scene) -> Result<Pixmap, ExportError> {
        let mut pixmap = Pixmap::new(scene.width, scene.height).ok_or(ExportError::Canvas {
            width: scene.width,
            height: scene.height,
        })?;
        let family = self.resolve_family(scene.typeface);

        for op in &scene.ops {
            match op {
                DrawOp::Background(color) => pixmap.fill(skia_color(*color)),
                DrawOp::RoundRect {
                    x,
                    y,
                    width,
                    height,
                    radius,
                    fill,
                    outline,
                } => {
                    let Some(path) = rounded_rect_path(*x, *y, *width, *height, *radius) else {
                        continue;
                    };
                    pixmap.fill_path(&path, &paint_for(*fill), FillRule::Winding, Transform::identity(), None);
                    if let Some(Outline { color, width }) = outline {
                        let stroke = Stroke {
                            width: *width,
                            ..Stroke::default()
                        };
                        pixmap.stroke_path(&path, &paint_for(*color), &stroke, Transform::identity(), None);
                    }
                }
                DrawOp::Text {
                    text,
                    center_x,
                    baseline_y,
                    size,
                    weight,
                    color,
                    opacity,
                } => {
                    let attrs = Attrs::new().family(family).weight(cosmic_weight(*weight));
                    self.draw_text(&mut pixmap, text, attrs, *center_x, *baseline_y, *size, *color, *opacity);
                }
            }
        }

        Ok(pixmap)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        pixmap: &mut Pixmap,
        text: &str,
        attrs: Attrs<'_>,
        center_x: f32,
        baseline_y: f32,
        size: f32,
        color: Rgba,
        opacity: f32,
    ) {
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(size, size * 1.2));
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let Some((line_w, line_y)) = buffer.layout_runs().next().map(|run| (run.line_w, run.line_y)) else {
            return;
        };
        let dx = center_x - line_w / 2.0;
        let dy = baseline_y - line_y;
        let alpha = color.a * opacity;
        let base = cosmic_text::Color::rgb(color.r, color.g, color.b);

        let mut paint = Paint::default();
        paint.anti_alias = false;
        buffer.draw(&mut self.font_system, &mut self.swash_cache, base, |x, y, w, h, c| {
            let a = (c.a() as f32 * alpha).round() as u8;
            if a == 0 {
                return;
            }
            paint.set_color_rgba8(c.r(), c.g(), c.b(), a);
            if let Some(rect) = Rect::from_xywh(dx + x as f32, dy + y as f32, w as f32, h as f32) {
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        });
    }

    /// The typeface's named family when installed, its generic family otherwise.
    fn resolve_family(&self, typeface: Typeface) -> Family<'static> {
        if let Some(name) = typeface.family() {
            let installed = self
                .font_system
                .db()
                .faces()
                .any(|face| face.families.iter().any(|(family, _)| family.eq_ignore_ascii_case(name)));
            if installed {
                return Family::Name(name);
            }
            tracing::debug!(family = name, "font not installed, using generic family");
        }
        match typeface.generic() {
            GenericFamily::SansSerif => Family::SansSerif,
            GenericFamily::Serif => Family::Serif,
            GenericFamily::Monospace => Family::Monospace,
        }
    }
}

/// Closed rounded-rectangle path. The radius is clamped first so narrow
/// boxes never produce self-intersecting corners.
pub fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<Path> {
    let r = clamp_radius(w, h, radius);
    let k = r * KAPPA;
    let (right, bottom) = (x + w, y + h);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Flatten to RGB and encode as baseline JPEG.
pub fn encode_jpeg(pixmap: &Pixmap, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut rgb = Vec::with_capacity(pixmap.width() as usize * pixmap.height() as usize * 3);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgb.extend_from_slice(&[c.red(), c.green(), c.blue()]);
    }

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    encoder.encode(&rgb, pixmap.width(), pixmap.height(), ExtendedColorType::Rgb8)?;
    Ok(out)
}

fn skia_color(c: Rgba) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.alpha_u8())
}

fn paint_for(c: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(c.r, c.g, c.b, c.alpha_u8());
    paint.anti_alias = true;
    paint
}

fn cosmic_weight(weight: FontWeight) -> Weight {
    match weight {
        FontWeight::Normal => Weight::NORMAL,
        FontWeight::Medium => Weight::MEDIUM,
        FontWeight::Bold => Weight::BOLD,
        FontWeight::Black => Weight::BLACK,
    }
}
