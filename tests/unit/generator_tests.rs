// TileGenerator tests: geometry, caching and invalidation

use super::support::{box_generator, has_ink_in_rows, BoxShaper};
use kamon::canvas::PixelFormat;
use kamon::color::Color;
use kamon::geometry::IntRect;
use kamon::surface::{Paint, RasterSurface, Surface};
use kamon::units::{DisplayMetrics, Unit};
use kamon::watermark::{build_tile, Margin, TileGenerator, WatermarkConfig};
use rstest::rstest;

fn abcd_generator() -> TileGenerator {
    let mut generator = box_generator();
    generator.set_text("abcd");
    generator.set_text_size(20.0, Unit::Px);
    generator
}

#[rstest]
#[case::upright(0.0, 40, 20)]
#[case::quarter_turn(90.0, 20, 40)]
#[case::negative_quarter_turn(-90.0, 20, 40)]
#[case::half_turn(180.0, 40, 20)]
#[case::diagonal(45.0, 43, 43)]
#[case::thirty(30.0, 45, 38)]
#[case::full_turn(360.0, 40, 20)]
fn test_tile_fits_rotated_box(#[case] degrees: f32, #[case] width: u32, #[case] height: u32) {
    let mut generator = abcd_generator();
    generator.set_rotation(degrees);

    let pattern = generator.pattern().unwrap().unwrap();
    assert_eq!((pattern.width(), pattern.height()), (width, height));
}

#[rstest]
#[case(Margin::new(3, 5, 7, 11), 50, 36)]
#[case(Margin::uniform(20), 80, 60)]
#[case(Margin::new(0, 0, 9, 0), 49, 20)]
fn test_margins_add_to_extents(#[case] margin: Margin, #[case] width: u32, #[case] height: u32) {
    let mut generator = abcd_generator();
    generator.set_margin(margin.left, margin.top, margin.right, margin.bottom);

    let tile = generator.pattern().unwrap().unwrap();
    assert_eq!((tile.width(), tile.height()), (width, height));
}

#[test]
fn test_text_sits_inside_margins() {
    let mut generator = abcd_generator();
    generator.set_margin(2, 3, 4, 5);
    let raster = generator.pattern().unwrap().unwrap().raster().clone();
    assert_eq!(raster.dimensions(), (46, 28));

    for (x, y, pixel) in raster.enumerate_pixels() {
        let inside = (2..42).contains(&x) && (3..23).contains(&y);
        let expected = if inside { 255 } else { 0 };
        assert_eq!(pixel[3], expected, "pixel ({}, {})", x, y);
    }
}

#[test]
fn test_repeated_tiles_keep_margin_spacing() {
    let mut generator = abcd_generator();
    generator.set_margin(2, 3, 4, 5);
    let pattern = generator.pattern().unwrap().unwrap();

    let mut surface = RasterSurface::new(pattern.width() * 3, pattern.height() * 3).unwrap();
    let paint = Paint {
        pattern,
        alpha: 255,
        color_filter: None,
    };
    surface.fill_rect(surface.clip_bounds(), &paint);
    let image = surface.image();

    // Ink of the first tile ends at x = 41, the next one starts at 46 + 2.
    let row: Vec<u8> = (40..50).map(|x| image.get_pixel(x, 10)[3]).collect();
    assert_eq!(row, vec![255, 255, 0, 0, 0, 0, 0, 0, 255, 255]);

    // Vertically: ink rows 3..23, next tile's ink starts at 28 + 3.
    let column: Vec<u8> = (22..32).map(|y| image.get_pixel(10, y)[3]).collect();
    assert_eq!(column, vec![255, 0, 0, 0, 0, 0, 0, 0, 0, 255]);
}

#[test]
fn test_fill_rect_outside_surface_is_ignored() {
    let mut generator = abcd_generator();
    let pattern = generator.pattern().unwrap().unwrap();
    let mut surface = RasterSurface::new(8, 8).unwrap();
    let paint = Paint {
        pattern,
        alpha: 255,
        color_filter: None,
    };
    surface.fill_rect(IntRect::new(20, 20, 40, 40), &paint);
    assert!(!has_ink_in_rows(surface.image(), 0, 8));
}

#[test]
fn test_rebuild_is_deterministic() {
    let mut generator = abcd_generator();
    generator.set_rotation(-20.0);
    generator.set_margin(4, 4, 4, 4);

    let first = generator.pattern().unwrap().unwrap().raster().clone();
    generator.invalidate();
    assert!(generator.is_dirty());
    let second = generator.pattern().unwrap().unwrap().raster().clone();
    assert_eq!(first, second);
}

#[test]
fn test_generator_matches_pure_builder() {
    let mut generator = abcd_generator();
    generator.set_rotation(15.0);
    generator.set_margin(1, 2, 3, 4);
    let from_generator = generator.pattern().unwrap().unwrap().raster().clone();

    let config = WatermarkConfig::default()
        .with_text("abcd")
        .with_text_size_px(20.0)
        .with_text_color(Color::black())
        .with_rotation(15.0)
        .with_margin(Margin::new(1, 2, 3, 4));
    assert_eq!(generator.config(), &config);

    let tile = build_tile(&config, &BoxShaper, u64::MAX).unwrap().unwrap();
    assert_eq!(tile.raster(), &from_generator);
}

#[test]
fn test_burst_of_setters_builds_once() {
    let mut generator = abcd_generator();
    generator.pattern().unwrap();
    let start = generator.version();

    generator.set_text("wxyz");
    generator.set_rotation(10.0);
    generator.set_margin(1, 1, 1, 1);
    assert!(generator.tile().is_none());
    assert_eq!(generator.version(), start + 3);

    generator.pattern().unwrap();
    assert!(!generator.is_dirty());
    assert_eq!(generator.version(), start + 3);
}

#[test]
fn test_text_size_units() {
    let mut generator = TileGenerator::with_shaper(DisplayMetrics::with_density(3.0), BoxShaper);
    assert_eq!(generator.config().text_size_px, 30.0);

    generator.set_text_size_sp(12.0);
    assert_eq!(generator.config().text_size_px, 36.0);

    generator.set_text_size(7.0, Unit::Px);
    assert_eq!(generator.config().text_size_px, 7.0);
}

#[test]
fn test_rgba4444_quantizes_tile() {
    let mut generator = abcd_generator();
    generator.set_text_color(Color::new(0x12, 0x34, 0x56, 0x78));
    generator.set_pixel_format(PixelFormat::Rgba4444);

    let raster = generator.pattern().unwrap().unwrap().raster();
    for channel in raster.iter() {
        assert_eq!(channel % 17, 0, "channel {} is not a 4-bit level", channel);
    }
}

#[test]
fn test_whitespace_only_text_builds_minimal_tile() {
    let mut generator = TileGenerator::new(DisplayMetrics::default()).unwrap();
    generator.set_text("   ");
    generator.set_margin(1, 1, 1, 1);

    let pattern = generator.pattern().unwrap().unwrap();
    assert!(pattern.height() >= 3);
    assert!(pattern.raster().pixels().all(|p| p[3] == 0));
}

#[test]
fn test_rotated_font_watermark_repeats_over_surface() {
    let mut generator = TileGenerator::new(DisplayMetrics::with_density(2.0)).unwrap();
    generator.set_text("123        456");
    generator.set_text_size(10.0, Unit::Dp);
    generator.set_margin(20, 20, 20, 20);
    generator.set_rotation(-20.0);

    let pattern = generator.pattern().unwrap().unwrap();
    let (tile_width, tile_height) = (pattern.width(), pattern.height());
    assert!(tile_width > 40, "tile width {}", tile_width);
    assert!(tile_height > 40, "tile height {}", tile_height);
    assert!(pattern.raster().pixels().any(|p| p[3] > 0));

    let mut surface = RasterSurface::new(192, 192).unwrap();
    let paint = Paint {
        pattern,
        alpha: 255,
        color_filter: None,
    };
    surface.fill_rect(surface.clip_bounds(), &paint);

    let image = surface.image();
    assert!(has_ink_in_rows(image, 0, tile_height));
    assert!(tile_height < 192, "tile height {} leaves no room to repeat", tile_height);
    assert!(
        has_ink_in_rows(image, tile_height, 192),
        "second row of tiles has no ink"
    );
}
