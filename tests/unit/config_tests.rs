// Render configuration tests: loading from disk and rendering end to end

use kamon::color::Color;
use kamon::config::RenderConfig;
use kamon::surface::{RasterSurface, SurfaceRenderer};
use kamon::units::Dimension;
use rstest::rstest;
use std::io::Write;

const CONFIG: &str = r##"
display:
  density: 2.0
surface:
  width: 96dp
  height: 96dp
  background: "#FFFFFFFF"
alpha: 200
watermark:
  text: "123        456"
  text_size: 10dp
  text_color: "#FF000000"
  degrees: -20
  margin_left: 10dp
  margin_top: 10dp
  margin_right: 10dp
  margin_bottom: 10dp
"##;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_load_config_from_file() {
    let file = write_config(CONFIG);
    let config = RenderConfig::from_file(file.path()).expect("Failed to load config");

    config.validate().unwrap();
    assert_eq!(config.surface_size(), (192, 192));
    assert_eq!(config.alpha, 200);
    assert_eq!(config.surface.background, Some(Color::white()));
    assert_eq!(config.watermark.margin_left, Some(Dimension::dp(10.0)));
}

#[test]
fn test_render_from_config_to_png() {
    let file = write_config(CONFIG);
    let config = RenderConfig::from_file(file.path()).unwrap();

    let mut renderer = SurfaceRenderer::new(config.build_generator().unwrap());
    renderer.set_alpha(config.alpha);
    let (width, height) = config.surface_size();
    let mut surface =
        RasterSurface::with_background(width, height, Color::white()).unwrap();
    assert!(renderer.draw(&mut surface).unwrap());

    let tile = renderer.source().tile().unwrap();
    assert_eq!(renderer.source().config().margin.left, 20);
    assert!(tile.width() > 40 && tile.height() > 40);

    // Some pixels darkened by text, background otherwise untouched.
    let image = surface.image();
    assert!(image.pixels().any(|p| p[0] < 200));
    assert!(image.pixels().all(|p| p[3] == 255));

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("watermark.png");
    surface.save_png(&out).unwrap();
    let decoded = image::open(&out).unwrap().to_rgba8();
    assert_eq!(&decoded, image);
}

#[rstest]
#[case::zero_width("surface: { width: 0, height: 10 }\n")]
#[case::negative_height("surface: { width: 10, height: -5dp }\n")]
#[case::zero_density("display: { density: 0 }\nsurface: { width: 10, height: 10 }\n")]
#[case::negative_xdpi("display: { xdpi: -1 }\nsurface: { width: 1in, height: 1in }\n")]
fn test_invalid_configs_rejected(#[case] yaml: &str) {
    let config = RenderConfig::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().is_err());
}

#[rstest]
#[case::bad_unit("surface: { width: 10furlong, height: 10 }\n")]
#[case::bad_color("surface: { width: 1, height: 1 }\nwatermark: { text_color: \"#12345\" }\n")]
#[case::bad_pixel_format("surface: { width: 1, height: 1 }\npixel_format: rgb565\n")]
#[case::missing_surface("alpha: 10\n")]
fn test_malformed_configs_fail_to_parse(#[case] yaml: &str) {
    assert!(RenderConfig::from_yaml_with_env(yaml).is_err());
}

#[test]
fn test_custom_font_file() {
    let font = std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/src/fonts/DejaVuSansMono.ttf"
    ))
    .unwrap();
    let mut font_file = tempfile::NamedTempFile::new().unwrap();
    font_file.write_all(&font).unwrap();

    let yaml = format!(
        "surface: {{ width: 64, height: 64 }}\nfont: \"{}\"\nwatermark: {{ text: \"x\" }}\n",
        font_file.path().display()
    );
    let config = RenderConfig::from_yaml_with_env(&yaml).unwrap();
    let mut generator = config.build_generator().unwrap();
    assert!(generator.pattern().unwrap().is_some());
}
