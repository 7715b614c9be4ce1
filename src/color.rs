//! RGBA colors and hex color parsing.
//!
//! Colors are straight (non-premultiplied) RGBA with 8 bits per channel.
//! Hex strings follow the `#AARRGGBB` convention used by styling layers,
//! so alpha comes first when present.
//!
//! # Example
//!
//! ```
//! use kamon::color::{parse_hex_color, Color};
//!
//! let grey = parse_hex_color("#999999").unwrap();
//! assert_eq!(grey, Color::rgb(0x99, 0x99, 0x99));
//!
//! let faded = parse_hex_color("#80FF0000").unwrap();
//! assert_eq!(faded, Color::new(255, 0, 0, 0x80));
//! ```

use crate::error::TileError;
use image::Rgba;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Unpack a `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Self::new(
            (argb >> 16) as u8,
            (argb >> 8) as u8,
            argb as u8,
            (argb >> 24) as u8,
        )
    }

    /// Pack into `0xAARRGGBB`.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08X}", self.to_argb())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_hex_color(&raw).map_err(serde::de::Error::custom)
    }
}

fn hex_digit_error() -> TileError {
    TileError::Config("Invalid hex digit in color".to_string())
}

/// Parse a hex color string.
///
/// Supports `#RGB`, `#ARGB`, `#RRGGBB` and `#AARRGGBB`. Short forms double
/// each digit (`#F80` == `#FF8800`). Forms without alpha are opaque.
pub fn parse_hex_color(hex: &str) -> Result<Color, TileError> {
    let hex = hex
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| TileError::Config("Color must start with '#'".to_string()))?;

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(hex_digit_error());
    }

    let nibble = |i: usize| -> Result<u8, TileError> {
        u8::from_str_radix(&hex[i..i + 1], 16)
            .map(|v| v * 17)
            .map_err(|_| hex_digit_error())
    };
    let byte = |i: usize| -> Result<u8, TileError> {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| hex_digit_error())
    };

    match hex.len() {
        3 => Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Ok(Color::new(nibble(1)?, nibble(2)?, nibble(3)?, nibble(0)?)),
        6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Ok(Color::new(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
        n => Err(TileError::Config(format!(
            "Color must be #RGB, #ARGB, #RRGGBB or #AARRGGBB, got {} digits",
            n
        ))),
    }
}
