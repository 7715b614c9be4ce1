// Shared helpers for the unit tests

use image::RgbaImage;
use kamon::color::Color;
use kamon::text::{TextBounds, TextShaper};
use kamon::units::DisplayMetrics;
use kamon::watermark::TileGenerator;

/// Shaper drawing every string as a solid box: `size / 2` pixels per char
/// wide and `size` pixels tall, sitting on the baseline.
pub struct BoxShaper;

impl TextShaper for BoxShaper {
    fn measure(&self, text: &str, size_px: f32) -> TextBounds {
        if size_px.is_nan() || size_px <= 0.0 {
            return TextBounds::default();
        }
        let size = size_px as i32;
        TextBounds {
            left: 0,
            top: -size,
            right: (size / 2) * text.chars().count() as i32,
            bottom: 0,
        }
    }

    fn rasterize(&self, _text: &str, _size_px: f32, color: Color, bounds: &TextBounds) -> RgbaImage {
        RgbaImage::from_pixel(bounds.width(), bounds.height(), color.to_rgba())
    }
}

/// Generator at density 1 drawing opaque black boxes.
pub fn box_generator() -> TileGenerator {
    let mut generator = TileGenerator::with_shaper(DisplayMetrics::default(), BoxShaper);
    generator.set_text_color(Color::black());
    generator
}

/// Whether any pixel in rows `top..bottom` has non-zero alpha.
pub fn has_ink_in_rows(image: &RgbaImage, top: u32, bottom: u32) -> bool {
    (top..bottom.min(image.height()))
        .any(|y| (0..image.width()).any(|x| image.get_pixel(x, y)[3] > 0))
}
