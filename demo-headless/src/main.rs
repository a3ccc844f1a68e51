use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wireframe_core::{DirectorySource, Engine, MapSource, RenderConfig};

/// Render a heightmap as an isometric wireframe PNG
#[derive(Parser, Debug)]
#[command(name = "fdf")]
#[command(about = "Wireframe heightmap renderer", long_about = None)]
struct Args {
    /// Map file name inside the maps directory (default: first map)
    map: Option<String>,

    /// Directory holding the map files
    #[arg(short, long, default_value = "maps")]
    maps_dir: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "fdf.png")]
    output: PathBuf,

    /// Screen width the drawing is fitted to
    #[arg(long)]
    width: Option<u32>,

    /// Screen height the drawing is fitted to
    #[arg(long)]
    height: Option<u32>,

    /// Multiplier applied to every height
    #[arg(long)]
    height_factor: Option<f64>,

    /// JSON render settings; command-line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List available maps and exit
    #[arg(short, long)]
    list: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(args: &Args) -> Result<RenderConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    if let Some(width) = args.width {
        config.screen_width = width;
    }
    if let Some(height) = args.height {
        config.screen_height = height;
    }
    if let Some(factor) = args.height_factor {
        config.height_factor = factor;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(args)?;
    let source = DirectorySource::new(&args.maps_dir);
    let maps = source.list();

    if args.list {
        for name in &maps {
            println!("{name}");
        }
        return Ok(());
    }

    let map = match &args.map {
        Some(name) => name.clone(),
        None => maps
            .first()
            .cloned()
            .ok_or_else(|| format!("no maps in {}", args.maps_dir.display()))?,
    };

    let (width, height) = (config.screen_width, config.screen_height);
    let mut engine = Engine::new(source, &map, config)?;
    let bounds = engine.auto_isometric(width, height)?;
    info!(
        "Fitted {:?} to {}x{} at scale {}",
        map,
        width,
        height,
        engine.projection().scale()
    );

    let buffer = engine.draw();
    let (w, h) = (buffer.width(), buffer.height());
    let image = image::RgbaImage::from_raw(w, h, buffer.into_raw())
        .ok_or("pixel buffer does not match its bounds")?;
    image.save(&args.output)?;

    info!(
        "Wrote {} ({}x{}, bounds {:?})",
        args.output.display(),
        w,
        h,
        bounds
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
