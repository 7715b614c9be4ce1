//! Lazily built, cached watermark tiles.
//!
//! [`TileGenerator`] owns the current [`WatermarkConfig`] and at most one
//! [`Tile`]. Setters that change an effective value drop the tile, bump the
//! config version and notify the installed [`RedrawScheduler`]; the next
//! [`TileGenerator::pattern`] call rebuilds it. Setters never build, so a
//! burst of changes costs a single rebuild at the next paint.
//!
//! # Example
//!
//! ```
//! use kamon::units::{DisplayMetrics, Unit};
//! use kamon::watermark::TileGenerator;
//!
//! let mut generator = TileGenerator::new(DisplayMetrics::with_density(2.0)).unwrap();
//! assert!(generator.pattern().unwrap().is_none()); // no text yet
//!
//! generator.set_text("CONFIDENTIAL");
//! generator.set_text_size(14.0, Unit::Sp);
//! generator.set_rotation(-20.0);
//! generator.set_margin(20, 20, 20, 20);
//!
//! let pattern = generator.pattern().unwrap().unwrap();
//! assert!(pattern.width() > 40 && pattern.height() > 40);
//! ```

use super::config::{approx_eq, sanitize_rotation, Margin, WatermarkConfig};
use super::tile::{build_tile, Tile};
use crate::canvas::PixelFormat;
use crate::color::Color;
use crate::constants::{DEFAULT_MAX_TILE_PIXELS, DEFAULT_TEXT_SIZE_DP};
use crate::error::TileError;
use crate::pattern::Pattern;
use crate::text::{FontShaper, TextShaper};
use crate::units::{DisplayMetrics, Unit};
use std::rc::Rc;

/// Receives "please repaint" notifications. Implementations must only record
/// the request; they are called from inside setters.
pub trait RedrawScheduler {
    fn schedule_redraw(&self);
}

/// Something that can hand out a repeat-tileable pattern to paint with.
pub trait PaintSource {
    /// The current pattern, building it if needed. `Ok(None)` means there
    /// is nothing to draw.
    fn pattern(&mut self) -> Result<Option<&Pattern>, TileError>;

    /// Install (or clear) the observer notified on every invalidation.
    fn set_redraw_scheduler(&mut self, scheduler: Option<Rc<dyn RedrawScheduler>>);
}

impl<P: PaintSource + ?Sized> PaintSource for &mut P {
    fn pattern(&mut self) -> Result<Option<&Pattern>, TileError> {
        (**self).pattern()
    }

    fn set_redraw_scheduler(&mut self, scheduler: Option<Rc<dyn RedrawScheduler>>) {
        (**self).set_redraw_scheduler(scheduler)
    }
}

/// Watermark tile generator with lazy, version-keyed caching.
pub struct TileGenerator {
    metrics: DisplayMetrics,
    shaper: Box<dyn TextShaper>,
    config: WatermarkConfig,
    version: u64,
    cache: Option<(u64, Tile)>,
    max_tile_pixels: u64,
    scheduler: Option<Rc<dyn RedrawScheduler>>,
}

impl std::fmt::Debug for TileGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileGenerator")
            .field("config", &self.config)
            .field("version", &self.version)
            .field("cached", &self.cache.is_some())
            .field("max_tile_pixels", &self.max_tile_pixels)
            .finish()
    }
}

impl TileGenerator {
    /// Generator drawing with the embedded font.
    pub fn new(metrics: DisplayMetrics) -> Result<Self, TileError> {
        Ok(Self::with_shaper(metrics, FontShaper::embedded()?))
    }

    /// Generator drawing with a custom text shaper.
    pub fn with_shaper(metrics: DisplayMetrics, shaper: impl TextShaper + 'static) -> Self {
        let config = WatermarkConfig::default()
            .with_text_size_px(metrics.apply_dimension(DEFAULT_TEXT_SIZE_DP, Unit::Dp));
        Self {
            metrics,
            shaper: Box::new(shaper),
            config,
            version: 0,
            cache: None,
            max_tile_pixels: DEFAULT_MAX_TILE_PIXELS,
            scheduler: None,
        }
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    pub fn display_metrics(&self) -> &DisplayMetrics {
        &self.metrics
    }

    /// Incremented by every invalidation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when the next [`pattern`](Self::pattern) call has to build.
    pub fn is_dirty(&self) -> bool {
        self.tile().is_none()
    }

    /// The cached tile, if it is current.
    pub fn tile(&self) -> Option<&Tile> {
        match &self.cache {
            Some((version, tile)) if *version == self.version => Some(tile),
            _ => None,
        }
    }

    /// Cap on the tile raster size; larger tiles fail with
    /// [`TileError::AllocationFailed`].
    pub fn set_max_tile_pixels(&mut self, max_pixels: u64) {
        self.max_tile_pixels = max_pixels;
    }

    /// Set the watermark text. Empty text is ignored.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.is_empty() {
            tracing::debug!("Ignoring empty watermark text");
            return false;
        }
        if self.config.text() == Some(text.as_str()) {
            return false;
        }
        self.commit(self.config.clone().with_text(text))
    }

    /// Set the text size in `unit`, converted with the display metrics.
    pub fn set_text_size(&mut self, value: f32, unit: Unit) -> bool {
        let size_px = self.metrics.apply_dimension(value, unit);
        if approx_eq(self.config.text_size_px, size_px) {
            return false;
        }
        if !(size_px.is_finite() && size_px > 0.0) {
            tracing::warn!(size_px, "Degenerate watermark text size, tile will be blank");
        }
        self.commit(self.config.clone().with_text_size_px(size_px))
    }

    /// Set the text size in scale-independent pixels.
    pub fn set_text_size_sp(&mut self, value: f32) -> bool {
        self.set_text_size(value, Unit::Sp)
    }

    pub fn set_text_color(&mut self, color: Color) -> bool {
        if self.config.text_color == color {
            return false;
        }
        self.commit(self.config.clone().with_text_color(color))
    }

    /// Set the gaps baked into the tile edges. Always invalidates.
    pub fn set_margin(&mut self, left: u32, top: u32, right: u32, bottom: u32) -> bool {
        let margin = Margin::new(left, top, right, bottom);
        self.commit(self.config.clone().with_margin(margin))
    }

    /// Set the clockwise rotation. Non-finite values mean upright.
    pub fn set_rotation(&mut self, degrees: f32) -> bool {
        let degrees = sanitize_rotation(degrees);
        if approx_eq(self.config.rotation_degrees, degrees) {
            return false;
        }
        self.commit(self.config.clone().with_rotation(degrees))
    }

    pub fn set_pixel_format(&mut self, format: PixelFormat) -> bool {
        if self.config.pixel_format == format {
            return false;
        }
        self.commit(self.config.clone().with_pixel_format(format))
    }

    /// Swap in a new snapshot and invalidate.
    fn commit(&mut self, config: WatermarkConfig) -> bool {
        self.config = config;
        self.invalidate();
        true
    }

    /// Drop the cached tile and request a redraw.
    pub fn invalidate(&mut self) {
        if let Some((version, tile)) = self.cache.take() {
            tracing::debug!(
                version,
                width = tile.width(),
                height = tile.height(),
                "Released watermark tile"
            );
        }
        self.version += 1;
        if let Some(scheduler) = &self.scheduler {
            scheduler.schedule_redraw();
        }
    }

    /// The repeating pattern for the current config, built on first use
    /// after an invalidation.
    ///
    /// On allocation failure the error is returned and the cache stays as it
    /// was (empty), so the next call retries.
    pub fn pattern(&mut self) -> Result<Option<&Pattern>, TileError> {
        if self.tile().is_none() {
            let Some(tile) = build_tile(&self.config, self.shaper.as_ref(), self.max_tile_pixels)?
            else {
                return Ok(None);
            };
            self.cache = Some((self.version, tile));
        }
        Ok(self.tile().map(Tile::pattern))
    }
}

impl PaintSource for TileGenerator {
    fn pattern(&mut self) -> Result<Option<&Pattern>, TileError> {
        TileGenerator::pattern(self)
    }

    fn set_redraw_scheduler(&mut self, scheduler: Option<Rc<dyn RedrawScheduler>>) {
        self.scheduler = scheduler;
    }
}
