// SurfaceRenderer tests: drawing through a generator and redraw scheduling

use super::support::{box_generator, has_ink_in_rows};
use image::Rgba;
use kamon::color::Color;
use kamon::geometry::IntRect;
use kamon::surface::{ColorFilter, RasterSurface, SurfaceRenderer};
use kamon::units::Unit;
use kamon::watermark::{RedrawScheduler, TileGenerator};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct Host {
    requests: Cell<u32>,
}

impl RedrawScheduler for Host {
    fn schedule_redraw(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

fn renderer() -> SurfaceRenderer {
    let mut generator = box_generator();
    generator.set_text("ab");
    generator.set_text_size(10.0, Unit::Px);
    generator.set_margin(0, 0, 0, 0);
    SurfaceRenderer::new(generator)
}

#[test]
fn test_draw_without_text_is_noop() {
    let mut renderer = SurfaceRenderer::new(box_generator());
    let mut surface = RasterSurface::with_background(4, 4, Color::white()).unwrap();
    assert!(!renderer.draw(&mut surface).unwrap());
    assert!(surface.image().pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
}

#[test]
fn test_draw_covers_whole_surface() {
    let mut renderer = renderer();
    let mut surface = RasterSurface::new(25, 25).unwrap();
    assert!(renderer.draw(&mut surface).unwrap());

    // 10x10 ink box, no margins: the whole surface is covered.
    assert!(surface.image().pixels().all(|p| p[3] == 255));
    assert_eq!(renderer.source().tile().unwrap().width(), 10);
}

#[test]
fn test_generator_setters_request_redraw() {
    let mut renderer = renderer();
    let mut surface = RasterSurface::new(10, 10).unwrap();
    renderer.draw(&mut surface).unwrap();
    assert!(!renderer.is_redraw_pending());

    assert!(!renderer.source_mut().set_text("ab"));
    assert!(!renderer.is_redraw_pending());

    assert!(renderer.source_mut().set_rotation(90.0));
    assert!(renderer.is_redraw_pending());
    assert!(renderer.source().is_dirty());

    renderer.draw(&mut surface).unwrap();
    assert!(!renderer.is_redraw_pending());
    assert!(!renderer.source().is_dirty());
}

#[test]
fn test_alpha_and_filter_keep_cached_tile() {
    let mut renderer = renderer();
    let mut surface = RasterSurface::new(10, 10).unwrap();
    renderer.draw(&mut surface).unwrap();
    let version = renderer.source().version();
    let raster = renderer.source().tile().unwrap().raster().as_ptr();

    renderer.set_alpha(128);
    renderer.set_color_filter(Some(ColorFilter::SrcIn(Color::rgb(255, 0, 0))));
    assert!(renderer.take_redraw_request());

    let mut surface = RasterSurface::new(10, 10).unwrap();
    renderer.draw(&mut surface).unwrap();
    assert_eq!(renderer.source().version(), version);
    assert_eq!(renderer.source().tile().unwrap().raster().as_ptr(), raster);

    let pixel = surface.image().get_pixel(5, 5);
    assert_eq!((pixel[0], pixel[1], pixel[2]), (255, 0, 0));
    assert!((126..=130).contains(&pixel[3]), "alpha {}", pixel[3]);
}

#[test]
fn test_bounds_restrict_fill() {
    let mut renderer = renderer();
    renderer.set_bounds(IntRect::new(0, 0, 20, 5));
    assert!(renderer.take_redraw_request());

    let mut surface = RasterSurface::new(20, 20).unwrap();
    renderer.draw(&mut surface).unwrap();
    assert!(has_ink_in_rows(surface.image(), 0, 5));
    assert!(!has_ink_in_rows(surface.image(), 5, 20));
}

#[test]
fn test_host_scheduler_sees_every_request() {
    let host = Rc::new(Host::default());
    let mut generator = box_generator();
    generator.set_text("ab");
    let mut renderer = SurfaceRenderer::with_host_scheduler(generator, host.clone());

    renderer.source_mut().set_text("abc");
    renderer.source_mut().set_text("abc");
    renderer.set_alpha(7);
    assert_eq!(host.requests.get(), 2);
    assert!(renderer.is_redraw_pending());
}

#[test]
fn test_borrowed_generator_keeps_its_cache() {
    let mut generator: TileGenerator = box_generator();
    generator.set_text("ab");
    {
        let mut renderer = SurfaceRenderer::new(&mut generator);
        let mut surface = RasterSurface::new(8, 8).unwrap();
        assert!(renderer.draw(&mut surface).unwrap());
        renderer.into_source();
    }
    assert!(!generator.is_dirty());
    assert!(generator.tile().is_some());
}

#[test]
fn test_into_source_stops_notifications() {
    let host = Rc::new(Host::default());
    let renderer = SurfaceRenderer::with_host_scheduler(box_generator(), host.clone());
    let mut generator = renderer.into_source();

    assert!(generator.set_text("changed"));
    assert_eq!(host.requests.get(), 0);
}

#[test]
fn test_failed_build_keeps_redraw_pending() {
    let mut renderer = SurfaceRenderer::new(box_generator());
    renderer.source_mut().set_max_tile_pixels(1);
    renderer.source_mut().set_text("ab");
    assert!(renderer.is_redraw_pending());

    let mut surface = RasterSurface::new(8, 8).unwrap();
    let err = renderer.draw(&mut surface).unwrap_err();
    assert!(err.is_allocation_failure());
    assert!(renderer.is_redraw_pending());
    assert!(renderer.source().is_dirty());

    renderer.source_mut().set_max_tile_pixels(u64::from(u32::MAX));
    assert!(renderer.draw(&mut surface).unwrap());
    assert!(!renderer.is_redraw_pending());
    assert!(!renderer.source().is_dirty());
}
