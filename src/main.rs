use anyhow::Context;
use clap::Parser;
use kamon::config::RenderConfig;
use kamon::logging::LogFormat;
use kamon::surface::{RasterSurface, SurfaceRenderer};
use kamon::units::Dimension;
use std::path::PathBuf;

/// Kamon - render a repeating rotated-text watermark to a PNG
#[derive(Parser, Debug)]
#[command(name = "kamon")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "watermark.yaml")]
    config: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "watermark.png")]
    output: PathBuf,

    /// Override surface width (e.g. 360dp or 720)
    #[arg(long)]
    width: Option<Dimension>,

    /// Override surface height
    #[arg(long)]
    height: Option<Dimension>,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// Log output format (text or json)
    #[arg(long, default_value = "text")]
    log_format: LogFormat,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    kamon::logging::init_subscriber(args.log_format)
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize logging subsystem")?;

    let mut config = RenderConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    if let Some(width) = args.width {
        config.surface.width = width;
    }
    if let Some(height) = args.height {
        config.surface.height = height;
    }
    config.validate().context("Invalid configuration")?;

    let (width, height) = config.surface_size();
    tracing::info!(
        config_file = %args.config.display(),
        width,
        height,
        density = config.display.density,
        text = config.watermark.text.as_deref().unwrap_or(""),
        "Configuration loaded successfully"
    );

    if args.test {
        tracing::info!("Configuration test successful");
        return Ok(());
    }

    let generator = config.build_generator()?;
    let mut renderer = SurfaceRenderer::new(generator);
    renderer.set_alpha(config.alpha);
    renderer.set_color_filter(config.color_filter);

    let mut surface = match config.surface.background {
        Some(background) => RasterSurface::with_background(width, height, background)?,
        None => RasterSurface::new(width, height)?,
    };

    let drawn = renderer.draw(&mut surface).context("Failed to draw watermark")?;
    if !drawn {
        tracing::warn!("Nothing to draw, writing an empty surface");
    }
    if let Some(tile) = renderer.source().tile() {
        let (rotated_width, rotated_height) = tile.rotated_extents();
        tracing::info!(
            tile_width = tile.width(),
            tile_height = tile.height(),
            rotated_width,
            rotated_height,
            "Watermark tile built"
        );
    }

    surface
        .save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    tracing::info!(output = %args.output.display(), "Watermark written");
    Ok(())
}
