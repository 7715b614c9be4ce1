//! Dimension units and display metrics.
//!
//! Configuration values such as text size and margins are written with a
//! unit (`10dp`, `12sp`, `4px`) and converted to device pixels with the
//! host's [`DisplayMetrics`].

use crate::constants::{DEFAULT_DENSITY, DEFAULT_XDPI};
use crate::error::TileError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Unit of a dimension value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Device pixels
    Px,
    /// Density-independent pixels
    Dp,
    /// Scale-independent pixels (density times the user's font scale)
    Sp,
    /// Points, 1/72 inch
    Pt,
    /// Inches
    In,
    /// Millimeters
    Mm,
}

impl Unit {
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Dp => "dp",
            Unit::Sp => "sp",
            Unit::Pt => "pt",
            Unit::In => "in",
            Unit::Mm => "mm",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" | "px" => Some(Unit::Px),
            "dp" | "dip" => Some(Unit::Dp),
            "sp" => Some(Unit::Sp),
            "pt" => Some(Unit::Pt),
            "in" => Some(Unit::In),
            "mm" => Some(Unit::Mm),
            _ => None,
        }
    }
}

/// Screen density information supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    /// Pixels per dp
    #[serde(default = "default_density")]
    pub density: f32,
    /// Pixels per sp (density times font scale)
    #[serde(default = "default_density")]
    pub scaled_density: f32,
    /// Physical pixels per inch along x
    #[serde(default = "default_xdpi")]
    pub xdpi: f32,
}

fn default_density() -> f32 {
    DEFAULT_DENSITY
}

fn default_xdpi() -> f32 {
    DEFAULT_XDPI
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            scaled_density: DEFAULT_DENSITY,
            xdpi: DEFAULT_XDPI,
        }
    }
}

impl DisplayMetrics {
    /// Metrics for a display with the given density and no font scaling.
    pub fn with_density(density: f32) -> Self {
        Self {
            density,
            scaled_density: density,
            xdpi: DEFAULT_XDPI * density,
        }
    }

    /// Convert `value` in `unit` to device pixels.
    pub fn apply_dimension(&self, value: f32, unit: Unit) -> f32 {
        match unit {
            Unit::Px => value,
            Unit::Dp => value * self.density,
            Unit::Sp => value * self.scaled_density,
            Unit::Pt => value * self.xdpi / 72.0,
            Unit::In => value * self.xdpi,
            Unit::Mm => value * self.xdpi / 25.4,
        }
    }
}

/// A number with a unit, e.g. `10dp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub value: f32,
    pub unit: Unit,
}

impl Dimension {
    pub const fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn px(value: f32) -> Self {
        Self::new(value, Unit::Px)
    }

    pub const fn dp(value: f32) -> Self {
        Self::new(value, Unit::Dp)
    }

    /// Exact pixel value.
    pub fn to_px(&self, metrics: &DisplayMetrics) -> f32 {
        metrics.apply_dimension(self.value, self.unit)
    }

    /// Pixel offset: truncated toward zero.
    pub fn to_pixel_offset(&self, metrics: &DisplayMetrics) -> i32 {
        self.to_px(metrics) as i32
    }

    /// Pixel size: rounded, and never collapsed to zero for a non-zero value.
    pub fn to_pixel_size(&self, metrics: &DisplayMetrics) -> i32 {
        let px = self.to_px(metrics);
        let rounded = px.round() as i32;
        if rounded == 0 && px > 0.0 {
            1
        } else if rounded == 0 && px < 0.0 {
            -1
        } else {
            rounded
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for Dimension {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);

        let value: f32 = number
            .trim()
            .parse()
            .map_err(|_| TileError::Config(format!("Invalid dimension value '{}'", s)))?;
        if !value.is_finite() {
            return Err(TileError::Config(format!(
                "Dimension '{}' must be a finite number",
                s
            )));
        }
        let unit = Unit::from_suffix(&suffix.to_ascii_lowercase())
            .ok_or_else(|| TileError::Config(format!("Unknown dimension unit '{}'", suffix)))?;

        Ok(Self { value, unit })
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // YAML gives bare numbers as numbers; those are pixels.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(Dimension::px(value)),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
