//! Transform-aware drawing over an RGBA raster.
//!
//! [`Canvas`] keeps a current transform plus a save/restore stack, the
//! minimal drawing context the tile builder needs: translate, rotate,
//! concat, and draw a line of text on its baseline. Text is rasterized
//! upright by the [`TextShaper`] and then composited through the current
//! transform by inverse-mapping each destination pixel center and sampling
//! the layer bilinearly in premultiplied space.

use crate::color::Color;
use crate::error::TileError;
use crate::geometry::{IntRect, Matrix, RectF};
use crate::text::TextShaper;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Channel precision of a finished tile raster.
///
/// Storage is always `RgbaImage`; `Rgba4444` quantizes every channel to
/// 4 bits after drawing, trading color fidelity for a format that maps 1:1
/// onto 16-bit surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    #[default]
    Rgba8888,
    Rgba4444,
}

impl PixelFormat {
    pub fn bits_per_channel(&self) -> u8 {
        match self {
            PixelFormat::Rgba8888 => 8,
            PixelFormat::Rgba4444 => 4,
        }
    }

    /// Reduce `raster` to this format's precision in place.
    pub fn apply(&self, raster: &mut RgbaImage) {
        if let PixelFormat::Rgba4444 = self {
            for channel in raster.iter_mut() {
                let level = (*channel as u16 * 15 + 127) / 255;
                *channel = (level * 17) as u8;
            }
        }
    }
}

/// Allocate a fully transparent raster, failing instead of aborting when the
/// buffer is larger than `max_pixels` or the allocator refuses it.
pub fn allocate_raster(width: u64, height: u64, max_pixels: u64) -> Result<RgbaImage, TileError> {
    let fail = || TileError::AllocationFailed { width, height };

    let pixels = width.checked_mul(height).ok_or_else(fail)?;
    if pixels > max_pixels {
        return Err(fail());
    }
    let w = u32::try_from(width).map_err(|_| fail())?;
    let h = u32::try_from(height).map_err(|_| fail())?;
    let len = pixels
        .checked_mul(4)
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(fail)?;

    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| fail())?;
    buffer.resize(len, 0);

    RgbaImage::from_raw(w, h, buffer).ok_or_else(fail)
}

/// Drawing context over a borrowed raster.
pub struct Canvas<'a> {
    target: &'a mut RgbaImage,
    matrix: Matrix,
    stack: Vec<Matrix>,
}

impl<'a> Canvas<'a> {
    pub fn new(target: &'a mut RgbaImage) -> Self {
        Self {
            target,
            matrix: Matrix::identity(),
            stack: Vec::new(),
        }
    }

    /// Current transform (local coordinates to raster pixels).
    pub fn matrix(&self) -> Matrix {
        self.matrix
    }

    /// Push the current transform; returns the new stack depth.
    pub fn save(&mut self) -> usize {
        self.stack.push(self.matrix);
        self.stack.len()
    }

    /// Pop the last saved transform. Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        match self.stack.pop() {
            Some(matrix) => self.matrix = matrix,
            None => tracing::warn!("Canvas restore without matching save"),
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.concat(&Matrix::translation(dx, dy));
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.concat(&Matrix::rotation(degrees));
    }

    /// Pre-concatenate `matrix`: it applies to local coordinates before the
    /// transforms already on the canvas.
    pub fn concat(&mut self, matrix: &Matrix) {
        self.matrix = self.matrix.concat(matrix);
    }

    /// Draw `text` with its pen at `(x, baseline_y)` in local coordinates.
    pub fn draw_text(
        &mut self,
        shaper: &dyn TextShaper,
        text: &str,
        x: f32,
        baseline_y: f32,
        size_px: f32,
        color: Color,
    ) {
        let bounds = shaper.measure(text, size_px);
        if bounds.is_empty() {
            return;
        }
        let layer = shaper.rasterize(text, size_px, color, &bounds);
        self.draw_image(
            &layer,
            x + bounds.left as f32,
            baseline_y + bounds.top as f32,
        );
    }

    /// Composite `layer` with its top-left corner at local `(x, y)`.
    pub fn draw_image(&mut self, layer: &RgbaImage, x: f32, y: f32) {
        if layer.width() == 0 || layer.height() == 0 {
            return;
        }

        let to_raster = self.matrix.concat(&Matrix::translation(x, y));
        let Some(to_layer) = to_raster.invert() else {
            tracing::debug!("Skipping draw through a singular transform");
            return;
        };

        let footprint = to_raster
            .map_rect(&RectF::from_size(layer.width() as f32, layer.height() as f32))
            .round_out();
        let raster = IntRect::from_size(self.target.width(), self.target.height());
        let Some(region) = footprint.intersect(&raster) else {
            return;
        };

        for py in region.top..region.bottom {
            for px in region.left..region.right {
                let (u, v) = to_layer.map_point(px as f32 + 0.5, py as f32 + 0.5);
                let Some(src) = sample_bilinear(layer, u - 0.5, v - 0.5) else {
                    continue;
                };
                let dst = self.target.get_pixel_mut(px as u32, py as u32);
                *dst = blend_over(*dst, src, 1.0);
            }
        }
    }
}

/// Premultiplied channels of `layer` at integer `(x, y)`, zero outside.
fn fetch_premultiplied(layer: &RgbaImage, x: i64, y: i64) -> [f32; 4] {
    if x < 0 || y < 0 || x >= layer.width() as i64 || y >= layer.height() as i64 {
        return [0.0; 4];
    }
    let p = layer.get_pixel(x as u32, y as u32);
    let a = p[3] as f32 / 255.0;
    [p[0] as f32 * a, p[1] as f32 * a, p[2] as f32 * a, p[3] as f32]
}

/// Bilinear sample at continuous pixel coordinates (pixel centers at
/// integers). Returns `None` where the result is fully transparent.
fn sample_bilinear(layer: &RgbaImage, u: f32, v: f32) -> Option<Rgba<u8>> {
    if !u.is_finite() || !v.is_finite() {
        return None;
    }
    let x0 = u.floor();
    let y0 = v.floor();
    let fx = u - x0;
    let fy = v - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = fetch_premultiplied(layer, x0, y0);
    let p10 = fetch_premultiplied(layer, x0 + 1, y0);
    let p01 = fetch_premultiplied(layer, x0, y0 + 1);
    let p11 = fetch_premultiplied(layer, x0 + 1, y0 + 1);

    let mut out = [0.0f32; 4];
    for (c, value) in out.iter_mut().enumerate() {
        *value = p00[c] * (1.0 - fx) * (1.0 - fy)
            + p10[c] * fx * (1.0 - fy)
            + p01[c] * (1.0 - fx) * fy
            + p11[c] * fx * fy;
    }

    let alpha = out[3];
    if alpha < 0.5 {
        return None;
    }
    let unpremultiply = |c: f32| (c * 255.0 / alpha).round().clamp(0.0, 255.0) as u8;
    Some(Rgba([
        unpremultiply(out[0]),
        unpremultiply(out[1]),
        unpremultiply(out[2]),
        alpha.round().clamp(0.0, 255.0) as u8,
    ]))
}

/// Porter-Duff source-over of straight-alpha pixels, with an extra opacity
/// multiplier on the foreground.
pub(crate) fn blend_over(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);
    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
