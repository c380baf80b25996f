//! Radar loop CLI.
//!
//! Runs ffmpeg over a directory of `img_NNN.png` frames.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use radar_common::ZenityChooser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use radar_loop::encoder::{DEFAULT_FPS, DEFAULT_OUTPUT};
use radar_loop::{FfmpegEncoder, FrameLooper, LoopTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "radar-loop")]
#[command(about = "Loop radar frames img_NNN.png into a video")]
struct Args {
    /// Frame directory (empty or omitted: choose it in a dialog)
    directory: Option<String>,

    /// Output video file name, written inside the frame directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: String,

    /// Frames per second
    #[arg(long, default_value = DEFAULT_FPS)]
    fps: String,

    /// Encoder program
    #[arg(long, default_value = "ffmpeg", env = "RADAR_LOOP_ENCODER")]
    encoder: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format)?;

    if let Err(e) = run(args) {
        error!(error = %format!("{:#}", e), "radar-loop failed");
        return Err(e);
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let target = match args.directory.as_deref() {
        Some(dir) if !dir.trim().is_empty() => {
            let expanded = shellexpand::full(dir)
                .with_context(|| format!("Failed to expand path {:?}", dir))?;
            LoopTarget::Directory(Path::new(expanded.as_ref()).to_path_buf())
        }
        other => LoopTarget::from_arg(other),
    };

    let chooser = ZenityChooser::new();
    let encoder = FfmpegEncoder::new(args.encoder);
    let looper = FrameLooper::new(&chooser, &encoder);

    match looper.run(&target, &args.fps, &args.output)? {
        Some(outcome) => info!(output = %outcome.output.display(), "radar-loop completed"),
        None => info!("Nothing to do"),
    }
    Ok(())
}

fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    match format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
    }
    Ok(())
}
