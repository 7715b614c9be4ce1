//! Tile construction.
//!
//! [`build_tile`] is a pure function of a [`WatermarkConfig`] and a
//! [`TextShaper`]: measure the text, rotate its box about its center, size a
//! raster to the rotated box plus margins, and draw the rotated text flush
//! against the margins. Tiling the result at its own size leaves exactly
//! `left + right` pixels between neighbours horizontally and
//! `top + bottom` vertically.
//!
//! ```text
//!  +-----------------------------+
//!  |          margin.top         |
//!  |   +---------------------+   |
//!  | l |   rotated text box  | r |
//!  |   +---------------------+   |
//!  |        margin.bottom        |
//!  +-----------------------------+
//! ```

use super::config::WatermarkConfig;
use crate::canvas::{allocate_raster, Canvas};
use crate::error::TileError;
use crate::geometry::{ceil_extent, Matrix, RectF};
use crate::pattern::Pattern;
use crate::text::{TextBounds, TextShaper};
use image::RgbaImage;

/// A built watermark tile: the raster, wrapped in its repeating pattern,
/// plus the geometry it was derived from.
#[derive(Debug, Clone)]
pub struct Tile {
    pattern: Pattern,
    text_bounds: TextBounds,
    rotated: RectF,
    extents: (u32, u32),
}

impl Tile {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn raster(&self) -> &RgbaImage {
        self.pattern.raster()
    }

    pub fn width(&self) -> u32 {
        self.pattern.width()
    }

    pub fn height(&self) -> u32 {
        self.pattern.height()
    }

    /// Measured ink box of the upright text.
    pub fn text_bounds(&self) -> TextBounds {
        self.text_bounds
    }

    /// The text box after rotation, in unrotated text coordinates.
    pub fn rotated_rect(&self) -> RectF {
        self.rotated
    }

    /// Whole-pixel size of the rotated text box (at least 1x1).
    pub fn rotated_extents(&self) -> (u32, u32) {
        self.extents
    }
}

/// Rotation of `degrees` about the center of a `width x height` box, and the
/// box's axis-aligned bounds after that rotation.
pub fn rotated_text_rect(width: u32, height: u32, degrees: f32) -> (Matrix, RectF) {
    let (w, h) = (width as f32, height as f32);
    let rotation = Matrix::rotation_about(degrees, w / 2.0, h / 2.0);
    let rotated = rotation.map_rect(&RectF::from_size(w, h));
    (rotation, rotated)
}

/// Build the tile for `config`.
///
/// Returns `Ok(None)` when there is no text to draw. Fails only when the
/// raster cannot be allocated within `max_pixels`.
pub fn build_tile(
    config: &WatermarkConfig,
    shaper: &dyn TextShaper,
    max_pixels: u64,
) -> Result<Option<Tile>, TileError> {
    let Some(text) = config.text() else {
        return Ok(None);
    };

    let text_bounds = shaper.measure(text, config.text_size_px);
    let (rotation, rotated) = rotated_text_rect(
        text_bounds.width(),
        text_bounds.height(),
        config.rotation_degrees,
    );

    // A degenerate text box still yields a drawable 1x1 extent.
    let extents = (
        ceil_extent(rotated.width()).max(1),
        ceil_extent(rotated.height()).max(1),
    );
    let margin = config.margin;
    let width = extents.0 as u64 + margin.horizontal();
    let height = extents.1 as u64 + margin.vertical();

    let mut raster = allocate_raster(width, height, max_pixels).map_err(|e| {
        tracing::warn!(width, height, max_pixels, "Watermark tile allocation failed");
        e
    })?;

    {
        let mut canvas = Canvas::new(&mut raster);
        canvas.save();
        canvas.translate(margin.left as f32, margin.top as f32);
        canvas.translate(-rotated.left, -rotated.top);
        canvas.concat(&rotation);
        canvas.draw_text(
            shaper,
            text,
            -text_bounds.left as f32,
            text_bounds.baseline_offset() as f32,
            config.text_size_px,
            config.text_color,
        );
        canvas.restore();
    }

    config.pixel_format.apply(&mut raster);

    tracing::debug!(
        width,
        height,
        text_width = text_bounds.width(),
        text_height = text_bounds.height(),
        rotation = config.rotation_degrees,
        "Built watermark tile"
    );

    Ok(Some(Tile {
        pattern: Pattern::repeating(raster),
        text_bounds,
        rotated,
        extents,
    }))
}
