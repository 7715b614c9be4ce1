//! Drawing surfaces and the watermark renderer.
//!
//! [`Surface`] is the paint target seam: a clip region and a rectangle fill
//! with a [`Paint`]. [`RasterSurface`] implements it over an in-memory
//! `RgbaImage` (used by the binary and the tests); a UI host implements it
//! over its own canvas. [`SurfaceRenderer`] ties a paint source to a surface.

pub mod renderer;

pub use renderer::{RedrawFlag, SurfaceRenderer};

use crate::canvas::{allocate_raster, blend_over};
use crate::color::Color;
use crate::constants::MAX_SURFACE_PIXELS;
use crate::error::TileError;
use crate::geometry::IntRect;
use crate::pattern::Pattern;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-pixel color transform applied to the pattern at fill time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "color", rename_all = "kebab-case")]
pub enum ColorFilter {
    /// Keep the pattern's shape, paint it in this color (alpha multiplies)
    SrcIn(Color),
    /// Multiply every channel by this color
    Modulate(Color),
}

impl ColorFilter {
    pub fn apply(&self, pixel: Rgba<u8>) -> Rgba<u8> {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16 + 127) / 255) as u8;
        match self {
            ColorFilter::SrcIn(c) => Rgba([c.r, c.g, c.b, mul(pixel[3], c.a)]),
            ColorFilter::Modulate(c) => Rgba([
                mul(pixel[0], c.r),
                mul(pixel[1], c.g),
                mul(pixel[2], c.b),
                mul(pixel[3], c.a),
            ]),
        }
    }
}

/// Fill style for [`Surface::fill_rect`].
#[derive(Debug, Clone, Copy)]
pub struct Paint<'a> {
    pub pattern: &'a Pattern,
    /// Extra opacity, multiplied with the pattern's own alpha
    pub alpha: u8,
    pub color_filter: Option<ColorFilter>,
}

impl Paint<'_> {
    /// Pattern color at surface pixel `(x, y)` after the color filter.
    /// Paint alpha is left to the compositing step.
    pub fn shade(&self, x: i32, y: i32) -> Rgba<u8> {
        let src = self.pattern.sample(x as i64, y as i64);
        match &self.color_filter {
            Some(filter) => filter.apply(src),
            None => src,
        }
    }
}

/// A paint target.
pub trait Surface {
    /// Region currently drawable; used when the renderer has no bounds.
    fn clip_bounds(&self) -> IntRect;

    /// Fill `rect` (clipped to the drawable region) with `paint`.
    fn fill_rect(&mut self, rect: IntRect, paint: &Paint<'_>);
}

/// In-memory surface over an RGBA raster.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
    clip: Option<IntRect>,
}

impl RasterSurface {
    /// Transparent surface of `width x height`.
    pub fn new(width: u32, height: u32) -> Result<Self, TileError> {
        let image = allocate_raster(width as u64, height as u64, MAX_SURFACE_PIXELS)?;
        Ok(Self::from_image(image))
    }

    /// Surface filled with `background`.
    pub fn with_background(width: u32, height: u32, background: Color) -> Result<Self, TileError> {
        let mut surface = Self::new(width, height)?;
        for pixel in surface.image.pixels_mut() {
            *pixel = background.to_rgba();
        }
        Ok(surface)
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image, clip: None }
    }

    /// Restrict drawing to `clip` (in surface pixels); `None` resets it.
    pub fn set_clip(&mut self, clip: Option<IntRect>) {
        self.clip = clip;
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn full_rect(&self) -> IntRect {
        IntRect::from_size(self.image.width(), self.image.height())
    }

    /// Encode the surface as PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), TileError> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(TileError::from)
    }
}

impl Surface for RasterSurface {
    fn clip_bounds(&self) -> IntRect {
        let full = self.full_rect();
        match self.clip {
            Some(clip) => clip.intersect(&full).unwrap_or_default(),
            None => full,
        }
    }

    fn fill_rect(&mut self, rect: IntRect, paint: &Paint<'_>) {
        let Some(region) = rect.intersect(&self.clip_bounds()) else {
            return;
        };
        let opacity = paint.alpha as f32 / 255.0;

        for y in region.top..region.bottom {
            for x in region.left..region.right {
                let src = paint.shade(x, y);
                if src[3] == 0 {
                    continue;
                }
                let dst = self.image.get_pixel_mut(x as u32, y as u32);
                *dst = blend_over(*dst, src, opacity);
            }
        }
    }
}
