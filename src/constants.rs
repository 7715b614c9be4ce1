// Constants module - centralized default values
//
// Defaults for the watermark generator, the renderer and the raster limits
// live here so the setters, the YAML surface and the binary agree.

// =============================================================================
// Watermark defaults
// =============================================================================

/// Default watermark text size, in density-independent pixels
pub const DEFAULT_TEXT_SIZE_DP: f32 = 10.0;

/// Default watermark text color (`#999999`, opaque)
pub const DEFAULT_TEXT_COLOR: u32 = 0xFF99_9999;

/// Default rotation in degrees
pub const DEFAULT_ROTATION_DEGREES: f32 = 0.0;

/// Default paint alpha applied by the renderer (fully opaque)
pub const DEFAULT_PAINT_ALPHA: u8 = 255;

// =============================================================================
// Numeric tolerances
// =============================================================================

/// Two text sizes or rotations closer than this are treated as equal
pub const FLOAT_TOLERANCE: f32 = 1e-4;

/// Slack subtracted before rounding rotated extents up, so that
/// trigonometric noise (e.g. cos(90°) != 0) never adds a whole pixel
pub const EXTENT_ROUNDING_EPSILON: f32 = 1e-3;

// =============================================================================
// Display metrics defaults
// =============================================================================

/// Baseline density: 1dp == 1px
pub const DEFAULT_DENSITY: f32 = 1.0;

/// Baseline dots per inch used for pt/in/mm conversions
pub const DEFAULT_XDPI: f32 = 160.0;

// =============================================================================
// Raster limits
// =============================================================================

/// Largest tile raster the generator will try to allocate (64 megapixels)
pub const DEFAULT_MAX_TILE_PIXELS: u64 = 64 * 1024 * 1024;

/// Largest surface the raster surface adapter accepts (256 megapixels)
pub const MAX_SURFACE_PIXELS: u64 = 256 * 1024 * 1024;
