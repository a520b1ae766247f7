//! ember - offline Monte Carlo path tracer.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use ember_renderer::{render, Framebuffer, Passthrough, ProgressBarReporter, RenderConfig};
use log::LevelFilter;
use std::path::PathBuf;

mod scenes;

/// Built-in demo scenes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SceneKind {
    /// Five colored quads
    Quads,
    /// Bouncing-spheres cover scene with depth of field
    Cover,
    /// Cornell box with glass sphere and metal box
    Cornell,
}

/// Log levels exposed on the command line.
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "An offline Monte Carlo path tracer")]
struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "cover")]
    scene: SceneKind,

    /// Image width in pixels (height follows the scene's aspect ratio)
    #[arg(long)]
    width: Option<u32>,

    /// Samples for the albedo/normal aux pass
    #[arg(long, short = 's', default_value_t = 10)]
    samples: u32,

    /// Adaptive sampling floor (non-black samples per pixel)
    #[arg(long, default_value_t = 10)]
    min_samples: u32,

    /// Adaptive sampling ceiling (radiance samples per pixel)
    #[arg(long, default_value_t = 100)]
    max_samples: u32,

    /// Maximum ray bounce depth
    #[arg(long, short = 'd', default_value_t = 50)]
    depth: u32,

    /// Render seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// OBJ mesh to place in the Cornell scene
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Uniform scale applied to the OBJ mesh
    #[arg(long, default_value_t = 1.0)]
    obj_scale: f32,

    /// Output image path
    #[arg(short, long, default_value = "image.png")]
    output: PathBuf,

    /// Logging level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.clone().into())
        .init();

    let scenes::Scene { world, mut camera } = match args.scene {
        SceneKind::Quads => scenes::quads(),
        SceneKind::Cover => scenes::cover(args.seed),
        SceneKind::Cornell => scenes::cornell(args.obj.as_deref(), args.obj_scale),
    };

    if let Some(width) = args.width {
        camera.image_width = width;
    }
    camera.samples_per_pixel = args.samples;
    camera.min_samples_per_pixel = args.min_samples;
    camera.max_samples_per_pixel = args.max_samples.max(args.min_samples);
    camera.max_depth = args.depth;

    let config = RenderConfig { seed: args.seed };

    camera.initialize();
    let progress = ProgressBarReporter::new(camera.image_height());

    let mut fb = render(&mut camera, &world, &config, &progress);

    // External denoisers plug in here; the passthrough keeps the buffer
    fb.denoise_color(&Passthrough);

    write_png(&args.output, &fb);

    Ok(())
}

/// Encode the color plane as an 8-bit PNG.
///
/// An encoding failure is reported and the process continues; there is
/// nothing else to salvage at this point.
fn write_png(path: &std::path::Path, fb: &Framebuffer) {
    let bytes = Framebuffer::to_rgb8(&fb.color);

    match image::RgbImage::from_raw(fb.width, fb.height, bytes) {
        Some(img) => match img.save(path) {
            Ok(()) => log::info!("wrote {}", path.display()),
            Err(e) => log::error!("failed to write {}: {e}", path.display()),
        },
        None => log::error!("framebuffer size mismatch while encoding PNG"),
    }
}
