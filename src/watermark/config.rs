//! Watermark configuration snapshot.
//!
//! A [`WatermarkConfig`] is never edited in place by the generator: every
//! effective setter builds a new snapshot and swaps it in, so a tile is
//! always derived from one consistent set of parameters.

use crate::canvas::PixelFormat;
use crate::color::Color;
use crate::constants::{
    DEFAULT_ROTATION_DEGREES, DEFAULT_TEXT_COLOR, DEFAULT_TEXT_SIZE_DP, FLOAT_TOLERANCE,
};
use serde::{Deserialize, Serialize};

/// Empty space baked into each tile edge, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Margin {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Margin {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same margin on all four edges.
    pub const fn uniform(value: u32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Gap between horizontally adjacent watermark instances.
    pub fn horizontal(&self) -> u64 {
        self.left as u64 + self.right as u64
    }

    /// Gap between vertically adjacent watermark instances.
    pub fn vertical(&self) -> u64 {
        self.top as u64 + self.bottom as u64
    }
}

/// Everything a tile is derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    /// Watermark text; `None` until a non-empty text is set
    pub text: Option<String>,
    pub text_color: Color,
    /// Text size in device pixels
    pub text_size_px: f32,
    /// Clockwise rotation in degrees
    pub rotation_degrees: f32,
    pub margin: Margin,
    pub pixel_format: PixelFormat,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: None,
            text_color: Color::from_argb(DEFAULT_TEXT_COLOR),
            text_size_px: DEFAULT_TEXT_SIZE_DP,
            rotation_degrees: DEFAULT_ROTATION_DEGREES,
            margin: Margin::default(),
            pixel_format: PixelFormat::default(),
        }
    }
}

impl WatermarkConfig {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.is_empty()).then_some(text);
        self
    }

    pub fn with_text_size_px(mut self, size: f32) -> Self {
        self.text_size_px = size;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_degrees = sanitize_rotation(degrees);
        self
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    /// Text to draw, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Non-finite rotations draw upright.
pub(crate) fn sanitize_rotation(degrees: f32) -> f32 {
    if degrees.is_finite() {
        degrees
    } else {
        0.0
    }
}

/// Float equality with [`FLOAT_TOLERANCE`]. NaN only equals NaN, so
/// repeatedly setting NaN is not an effective change.
pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    a == b || (a - b).abs() <= FLOAT_TOLERANCE
}
