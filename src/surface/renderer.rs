//! Binds a paint source to a surface.
//!
//! [`SurfaceRenderer`] asks its source for a pattern on every draw (which
//! rebuilds the tile only if it was invalidated) and fills its bounds with
//! it. It installs a [`RedrawFlag`] on the source, so any effective setter
//! on the generator marks the renderer as needing a repaint; the host polls
//! [`SurfaceRenderer::take_redraw_request`] or passes its own scheduler to
//! be forwarded to.

use super::{ColorFilter, Paint, Surface};
use crate::constants::DEFAULT_PAINT_ALPHA;
use crate::error::TileError;
use crate::geometry::IntRect;
use crate::watermark::{PaintSource, RedrawScheduler, TileGenerator};
use std::cell::Cell;
use std::rc::Rc;

/// Pending-repaint marker shared between a renderer and its paint source.
#[derive(Clone, Default)]
pub struct RedrawFlag {
    pending: Rc<Cell<bool>>,
    requests: Rc<Cell<u64>>,
    host: Option<Rc<dyn RedrawScheduler>>,
}

impl std::fmt::Debug for RedrawFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedrawFlag")
            .field("pending", &self.pending.get())
            .field("requests", &self.requests.get())
            .field("forwards", &self.host.is_some())
            .finish()
    }
}

impl RedrawFlag {
    /// Flag that also forwards every request to `host`.
    pub fn forwarding_to(host: Rc<dyn RedrawScheduler>) -> Self {
        Self {
            host: Some(host),
            ..Self::default()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Total requests received.
    pub fn request_count(&self) -> u64 {
        self.requests.get()
    }

    /// Clear the flag, returning whether a redraw was pending.
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }
}

impl RedrawScheduler for RedrawFlag {
    fn schedule_redraw(&self) {
        self.pending.set(true);
        self.requests.set(self.requests.get() + 1);
        if let Some(host) = &self.host {
            host.schedule_redraw();
        }
    }
}

/// Fills a rectangle of a [`Surface`] with a paint source's pattern.
pub struct SurfaceRenderer<S: PaintSource = TileGenerator> {
    source: S,
    bounds: IntRect,
    alpha: u8,
    color_filter: Option<ColorFilter>,
    redraw: RedrawFlag,
}

impl<S: PaintSource> SurfaceRenderer<S> {
    pub fn new(source: S) -> Self {
        Self::with_redraw_flag(source, RedrawFlag::default())
    }

    /// Renderer forwarding redraw requests to the host's scheduler.
    pub fn with_host_scheduler(source: S, host: Rc<dyn RedrawScheduler>) -> Self {
        Self::with_redraw_flag(source, RedrawFlag::forwarding_to(host))
    }

    fn with_redraw_flag(mut source: S, redraw: RedrawFlag) -> Self {
        source.set_redraw_scheduler(Some(Rc::new(redraw.clone())));
        Self {
            source,
            bounds: IntRect::default(),
            alpha: DEFAULT_PAINT_ALPHA,
            color_filter: None,
            redraw,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the paint source; its setters schedule redraws.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Detach from the source and hand it back.
    pub fn into_source(mut self) -> S {
        self.source.set_redraw_scheduler(None);
        self.source
    }

    /// Region to fill; an empty rect means "the surface's clip bounds".
    pub fn set_bounds(&mut self, bounds: IntRect) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.redraw.schedule_redraw();
        }
    }

    pub fn bounds(&self) -> IntRect {
        self.bounds
    }

    /// Fill-time opacity; does not touch the tile.
    pub fn set_alpha(&mut self, alpha: u8) {
        if self.alpha != alpha {
            self.alpha = alpha;
            self.redraw.schedule_redraw();
        }
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Fill-time color filter; does not touch the tile.
    pub fn set_color_filter(&mut self, filter: Option<ColorFilter>) {
        if self.color_filter != filter {
            self.color_filter = filter;
            self.redraw.schedule_redraw();
        }
    }

    pub fn color_filter(&self) -> Option<ColorFilter> {
        self.color_filter
    }

    pub fn is_redraw_pending(&self) -> bool {
        self.redraw.is_pending()
    }

    /// Consume a pending redraw request.
    pub fn take_redraw_request(&self) -> bool {
        self.redraw.take()
    }

    /// Paint the watermark onto `surface`.
    ///
    /// Returns `Ok(false)` when the source has nothing to draw (no text);
    /// the surface is left untouched in that case. On error the pending
    /// redraw request is kept.
    pub fn draw<T: Surface + ?Sized>(&mut self, surface: &mut T) -> Result<bool, TileError> {
        // A failed build keeps the request pending so the host retries.
        let pattern = self.source.pattern()?;
        self.redraw.take();

        let Some(pattern) = pattern else {
            return Ok(false);
        };
        let rect = if self.bounds.is_empty() {
            surface.clip_bounds()
        } else {
            self.bounds
        };

        let paint = Paint {
            pattern,
            alpha: self.alpha,
            color_filter: self.color_filter,
        };
        surface.fill_rect(rect, &paint);

        tracing::trace!(
            left = rect.left,
            top = rect.top,
            right = rect.right,
            bottom = rect.bottom,
            alpha = self.alpha,
            "Filled watermark"
        );
        Ok(true)
    }
}

impl<S: PaintSource + std::fmt::Debug> std::fmt::Debug for SurfaceRenderer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceRenderer")
            .field("source", &self.source)
            .field("bounds", &self.bounds)
            .field("alpha", &self.alpha)
            .field("color_filter", &self.color_filter)
            .field("redraw", &self.redraw)
            .finish()
    }
}
