// Kamon watermark library
//
// Rotated-text watermark tiles, repeated over a drawing surface.

pub mod canvas;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod pattern;
pub mod surface;
pub mod text;
pub mod units;
pub mod watermark;

pub use error::TileError;
pub use surface::{RasterSurface, Surface, SurfaceRenderer};
pub use watermark::TileGenerator;
