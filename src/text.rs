//! Text measurement and rasterization.
//!
//! The tile builder only needs two things from a font stack: the tight ink
//! bounds of a single line of text, and that ink drawn into a small RGBA
//! layer. [`TextShaper`] captures both; [`FontShaper`] implements them with
//! `ab_glyph` on top of a TrueType/OpenType font.
//!
//! # Example
//!
//! ```
//! use kamon::text::{FontShaper, TextShaper};
//!
//! let shaper = FontShaper::embedded().unwrap();
//! let bounds = shaper.measure("Confidential", 24.0);
//! assert!(bounds.width() > 0);
//! assert!(bounds.top < 0); // ink above the baseline
//! ```

use crate::color::Color;
use crate::error::TileError;
use ab_glyph::{point, Font, FontArc, Glyph, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Embedded font (DejaVu Sans Mono, Bitstream Vera license).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

/// Tight ink bounds of a line of text, relative to the pen origin on the
/// baseline. `top` is negative for ink above the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// `high - low` in pixels, clamped to `0..=u32::MAX`.
fn span(low: i32, high: i32) -> u32 {
    (high as i64 - low as i64).clamp(0, u32::MAX as i64) as u32
}

impl TextBounds {
    pub fn width(&self) -> u32 {
        span(self.left, self.right)
    }

    pub fn height(&self) -> u32 {
        span(self.top, self.bottom)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Distance from the top of the ink box down to the baseline.
    pub fn baseline_offset(&self) -> i32 {
        self.top.saturating_neg()
    }
}

/// Text measurement and drawing collaborator.
pub trait TextShaper {
    /// Tight ink bounds of `text` at `size_px`.
    ///
    /// Implementations return an empty box for a non-finite or non-positive
    /// size. Text without ink (e.g. only spaces) yields a zero-height box
    /// spanning its advance width.
    fn measure(&self, text: &str, size_px: f32) -> TextBounds;

    /// Draw `text` into a transparent `bounds.width() x bounds.height()`
    /// layer, with the pen at `(-bounds.left, -bounds.top)`.
    ///
    /// Each pixel carries `color` with its alpha scaled by glyph coverage.
    fn rasterize(&self, text: &str, size_px: f32, color: Color, bounds: &TextBounds) -> RgbaImage;
}

/// [`TextShaper`] backed by an `ab_glyph` font.
#[derive(Clone)]
pub struct FontShaper {
    font: FontArc,
}

impl std::fmt::Debug for FontShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontShaper")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontShaper {
    /// Shaper over the embedded DejaVu Sans Mono.
    pub fn embedded() -> Result<Self, TileError> {
        let font = FontArc::try_from_slice(EMBEDDED_FONT_DATA)
            .map_err(|e| TileError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Shaper over owned font bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, TileError> {
        let font = FontArc::try_from_vec(data).map_err(|e| TileError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Shaper over a font file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TileError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Lay out `text` on a single line, pen at `origin`, applying kerning.
    ///
    /// Returns the positioned glyphs and the final caret x.
    fn layout(&self, text: &str, size_px: f32, origin: (f32, f32)) -> (Vec<Glyph>, f32) {
        let scale = PxScale::from(size_px);
        let scaled_font = self.font.as_scaled(scale);

        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = origin.0;
        let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

        for c in text.chars() {
            let glyph_id = scaled_font.glyph_id(c);
            if let Some(prev) = prev_glyph {
                caret += scaled_font.kern(prev, glyph_id);
            }
            glyphs.push(glyph_id.with_scale_and_position(scale, point(caret, origin.1)));
            caret += scaled_font.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }

        (glyphs, caret)
    }
}

fn usable_size(size_px: f32) -> bool {
    size_px.is_finite() && size_px > 0.0
}

impl TextShaper for FontShaper {
    fn measure(&self, text: &str, size_px: f32) -> TextBounds {
        if text.is_empty() || !usable_size(size_px) {
            return TextBounds::default();
        }

        let (glyphs, advance) = self.layout(text, size_px, (0.0, 0.0));

        let mut ink: Option<TextBounds> = None;
        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let px = outlined.px_bounds();
            let glyph_bounds = TextBounds {
                left: px.min.x.floor() as i32,
                top: px.min.y.floor() as i32,
                right: px.max.x.ceil() as i32,
                bottom: px.max.y.ceil() as i32,
            };
            ink = Some(match ink {
                None => glyph_bounds,
                Some(acc) => TextBounds {
                    left: acc.left.min(glyph_bounds.left),
                    top: acc.top.min(glyph_bounds.top),
                    right: acc.right.max(glyph_bounds.right),
                    bottom: acc.bottom.max(glyph_bounds.bottom),
                },
            });
        }

        // No ink at all (whitespace): a flat box along the baseline.
        ink.unwrap_or(TextBounds {
            left: 0,
            top: 0,
            right: advance.ceil().max(0.0) as i32,
            bottom: 0,
        })
    }

    fn rasterize(&self, text: &str, size_px: f32, color: Color, bounds: &TextBounds) -> RgbaImage {
        let (width, height) = (bounds.width(), bounds.height());
        let mut layer = RgbaImage::new(width, height);
        if layer.is_empty() || !usable_size(size_px) {
            return layer;
        }

        let origin = (-bounds.left as f32, -bounds.top as f32);
        let (glyphs, _) = self.layout(text, size_px, origin);

        for glyph in glyphs {
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let px = outlined.px_bounds();
            let (min_x, min_y) = (px.min.x.floor() as i32, px.min.y.floor() as i32);

            outlined.draw(|gx, gy, coverage| {
                let x = gx as i32 + min_x;
                let y = gy as i32 + min_y;
                if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                    return;
                }

                // Overlapping glyph edges accumulate coverage.
                let pixel = layer.get_pixel_mut(x as u32, y as u32);
                let existing = pixel[3] as f32 / color.a.max(1) as f32;
                let total = (existing + coverage).clamp(0.0, 1.0);
                *pixel = Rgba([color.r, color.g, color.b, (total * color.a as f32).round() as u8]);
            });
        }

        layer
    }
}
