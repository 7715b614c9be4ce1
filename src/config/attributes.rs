//! Styling attributes mapped onto a [`TileGenerator`].
//!
//! This is the surface a styling/layout layer fills in: each attribute maps
//! 1:1 onto a generator setter.
//!
//! ```yaml
//! text: "CONFIDENTIAL"
//! text_size: 14sp
//! text_color: "#40999999"
//! degrees: -20
//! margin_left: 10dp
//! margin_top: 10dp
//! margin_right: 10dp
//! margin_bottom: 10dp
//! ```

use crate::color::Color;
use crate::constants::DEFAULT_TEXT_COLOR;
use crate::units::{Dimension, Unit};
use crate::watermark::TileGenerator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    pub degrees: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<Dimension>,
}

impl WatermarkAttributes {
    /// Push every attribute into `generator`.
    ///
    /// Missing text and non-positive sizes leave the generator's values
    /// alone; margins convert as pixel offsets and never go negative.
    pub fn apply_to(&self, generator: &mut TileGenerator) {
        let metrics = *generator.display_metrics();

        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            generator.set_text(text);
        }

        if let Some(size) = self.text_size {
            let px = size.to_pixel_size(&metrics);
            if px > 0 {
                generator.set_text_size(px as f32, Unit::Px);
            } else {
                tracing::warn!(text_size = %size, "Ignoring non-positive watermark text size");
            }
        }

        generator.set_text_color(
            self.text_color
                .unwrap_or_else(|| Color::from_argb(DEFAULT_TEXT_COLOR)),
        );
        generator.set_rotation(self.degrees);

        let offset = |dim: Option<Dimension>| -> u32 {
            dim.map(|d| d.to_pixel_offset(&metrics).max(0) as u32)
                .unwrap_or(0)
        };
        generator.set_margin(
            offset(self.margin_left),
            offset(self.margin_top),
            offset(self.margin_right),
            offset(self.margin_bottom),
        );
    }
}
