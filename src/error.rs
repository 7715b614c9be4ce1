// Error types module

use thiserror::Error;

/// Errors surfaced by tile generation, configuration and the raster adapters.
///
/// Bad watermark parameters are never errors: they degrade into an empty or
/// minimal tile. Only resource exhaustion, font loading and configuration
/// problems reach the caller.
#[derive(Error, Debug)]
pub enum TileError {
    /// The tile raster could not be allocated (too large or out of memory)
    #[error("Failed to allocate {width}x{height} tile raster")]
    AllocationFailed { width: u64, height: u64 },

    /// Font data could not be parsed
    #[error("Failed to load font: {0}")]
    Font(String),

    /// Invalid configuration (bad dimension, color, missing env var, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl TileError {
    /// Whether the error reports resource exhaustion.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, TileError::AllocationFailed { .. })
    }
}
