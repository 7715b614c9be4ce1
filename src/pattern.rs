//! Repeat-tileable paint source over a raster.
//!
//! A [`Pattern`] owns a raster and answers "what color is at (x, y)" for any
//! integer coordinate, using an independent [`TileMode`] per axis. The
//! raster's top-left pixel sits at coordinate `(0, 0)`.

use image::{Rgba, RgbaImage};

/// How a pattern extends beyond its raster along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileMode {
    /// Repeat the raster edge-to-edge
    #[default]
    Repeat,
    /// Repeat, flipping every other copy
    Mirror,
    /// Extend the edge pixels
    Clamp,
}

impl TileMode {
    /// Map `coord` into `0..len`.
    fn resolve(self, coord: i64, len: u32) -> u32 {
        let len = len as i64;
        let idx = match self {
            TileMode::Repeat => coord.rem_euclid(len),
            TileMode::Mirror => {
                let period = coord.rem_euclid(2 * len);
                if period < len {
                    period
                } else {
                    2 * len - 1 - period
                }
            }
            TileMode::Clamp => coord.clamp(0, len - 1),
        };
        idx as u32
    }
}

/// Raster-backed paint source.
#[derive(Clone)]
pub struct Pattern {
    raster: RgbaImage,
    tile_x: TileMode,
    tile_y: TileMode,
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pattern")
            .field("dimensions", &self.raster.dimensions())
            .field("tile_x", &self.tile_x)
            .field("tile_y", &self.tile_y)
            .finish()
    }
}

impl Pattern {
    pub fn new(raster: RgbaImage, tile_x: TileMode, tile_y: TileMode) -> Self {
        Self {
            raster,
            tile_x,
            tile_y,
        }
    }

    /// Pattern repeating on both axes.
    pub fn repeating(raster: RgbaImage) -> Self {
        Self::new(raster, TileMode::Repeat, TileMode::Repeat)
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn tile_modes(&self) -> (TileMode, TileMode) {
        (self.tile_x, self.tile_y)
    }

    /// Color at `(x, y)` in pattern space. Transparent for an empty raster.
    pub fn sample(&self, x: i64, y: i64) -> Rgba<u8> {
        let (width, height) = self.raster.dimensions();
        if width == 0 || height == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let px = self.tile_x.resolve(x, width);
        let py = self.tile_y.resolve(y, height);
        *self.raster.get_pixel(px, py)
    }
}
