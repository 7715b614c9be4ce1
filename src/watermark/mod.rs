//! Watermark tile generation.
//!
//! This module turns a line of text into a small raster tile containing the
//! rotated text plus margins, such that repeating the tile on both axes
//! produces an evenly spaced diagonal watermark over any surface size.
//!
//! - [`WatermarkConfig`]: immutable parameter snapshot
//! - [`build_tile`]: pure config-to-tile function
//! - [`TileGenerator`]: setters, invalidation and the lazily built cache
//! - [`PaintSource`] / [`RedrawScheduler`]: the seams towards the renderer

pub mod config;
pub mod generator;
pub mod tile;

pub use config::{Margin, WatermarkConfig};
pub use generator::{PaintSource, RedrawScheduler, TileGenerator};
pub use tile::{build_tile, rotated_text_rect, Tile};
