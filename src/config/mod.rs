// Configuration module
//
// YAML render configuration for the `kamon` binary and for hosts that want
// to describe a watermark declaratively.

pub mod attributes;

pub use attributes::WatermarkAttributes;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::canvas::PixelFormat;
use crate::color::Color;
use crate::constants::{DEFAULT_PAINT_ALPHA, MAX_SURFACE_PIXELS};
use crate::error::TileError;
use crate::surface::ColorFilter;
use crate::text::FontShaper;
use crate::units::{Dimension, DisplayMetrics};
use crate::watermark::TileGenerator;

fn default_alpha() -> u8 {
    DEFAULT_PAINT_ALPHA
}

/// Size and background of the surface to render onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub width: Dimension,
    pub height: Dimension,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub display: DisplayMetrics,
    pub surface: SurfaceConfig,
    /// Paint alpha applied at fill time (0-255)
    #[serde(default = "default_alpha")]
    pub alpha: u8,
    #[serde(default)]
    pub pixel_format: PixelFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_filter: Option<ColorFilter>,
    /// Font file to draw with instead of the embedded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
    #[serde(default)]
    pub watermark: WatermarkAttributes,
}

impl RenderConfig {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, TileError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| TileError::Config(e.to_string()))?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                TileError::Config(format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                ))
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| TileError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TileError> {
        let yaml = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TileError::Config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), TileError> {
        let display = &self.display;
        for (name, value) in [
            ("density", display.density),
            ("scaled_density", display.scaled_density),
            ("xdpi", display.xdpi),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TileError::Config(format!(
                    "display.{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let (width, height) = self.surface_size();
        if width == 0 || height == 0 {
            return Err(TileError::Config(format!(
                "Surface must be at least 1x1 pixels, got {}x{}",
                width, height
            )));
        }
        if width as u64 * height as u64 > MAX_SURFACE_PIXELS {
            return Err(TileError::Config(format!(
                "Surface {}x{} exceeds the {} pixel limit",
                width, height, MAX_SURFACE_PIXELS
            )));
        }

        if self.watermark.text.as_deref().map_or(true, str::is_empty) {
            tracing::warn!("No watermark text configured, output will be blank");
        }

        Ok(())
    }

    /// Surface size in device pixels (negative sizes clamp to 0).
    pub fn surface_size(&self) -> (u32, u32) {
        let px = |d: &Dimension| d.to_pixel_size(&self.display).max(0) as u32;
        (px(&self.surface.width), px(&self.surface.height))
    }

    /// A generator configured from this file.
    pub fn build_generator(&self) -> Result<TileGenerator, TileError> {
        let mut generator = match &self.font {
            Some(path) => TileGenerator::with_shaper(self.display, FontShaper::from_file(path)?),
            None => TileGenerator::new(self.display)?,
        };
        generator.set_pixel_format(self.pixel_format);
        self.watermark.apply_to(&mut generator);
        Ok(generator)
    }
}
