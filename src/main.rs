use std::fs;
use std::io::{self, Read};
use std::time::Instant;

use clap::{Parser, ValueEnum};
use image::RgbImage;
use log::{info, LevelFilter};

use sdfmarch::config::{validate_config, IncomingConfig};
use sdfmarch::presets;
use sdfmarch::renderer;
use sdfmarch::scene::DebugProperties;

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

/// Command line arguments.
#[derive(Parser)]
#[command(name = "sdfmarch")]
#[command(about = "Render SDF/CSG scenes by sphere tracing")]
struct Args {
    /// Frame configuration JSON; "-" reads from stdin
    #[arg(short, long, default_value = "-")]
    config: String,

    /// Logging level
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let raw = if args.config == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(&args.config)?
    };

    let incoming: IncomingConfig = serde_json::from_str(&raw)?;
    let frames = incoming.into_frames();
    if frames.is_empty() {
        return Err("frames array must not be empty".into());
    }

    let total = frames.len();
    for (index, frame) in frames.iter().enumerate() {
        validate_config(frame)?;

        let mut scene = presets::build_scene(&frame.scene, frame.width).map_err(|error| {
            format!("{error} (known scenes: {})", presets::SCENE_IDS.join(", "))
        })?;

        if let Some(max_depth) = frame.max_depth {
            let mut properties = *scene.properties();
            properties.max_depth = max_depth;
            scene.set_properties(properties);
        }
        if frame.debug_normals || frame.debug_depth {
            scene.set_debug_properties(DebugProperties {
                normals: frame.debug_normals,
                depth: frame.debug_depth,
            });
        }

        let started = Instant::now();
        let mut image = RgbImage::new(frame.width, frame.height);
        renderer::render(&mut scene, frame.width, frame.height, &mut image)?;
        image.save(&frame.output_path)?;

        info!(
            "[{}/{}] rendered '{}' in {} ms: {}",
            index + 1,
            total,
            frame.scene,
            started.elapsed().as_millis(),
            frame.output_path
        );
    }

    Ok(())
}
