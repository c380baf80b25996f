//! Radar plot CLI.
//!
//! Reads NEXRAD Level-2 archives and draws one multi-panel figure per file,
//! either shown in a viewer or saved as `img_NNN.png` frames.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use radar_common::{ExtentRequest, RadarField, RadarError, RangeOverrides, Span, ZenityChooser};
use renderer::{FigureOptions, FigureRenderer, OverlayLayer, TextRenderer};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use volume_io::ToolkitReader;

use radar_plot::config::expand_path;
use radar_plot::request::{parse_colormap_overrides, parse_sweep_overrides};
use radar_plot::{DirectorySink, FileSpec, PlotConfig, PlotPipeline, PlotRequest, ViewerSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "radar-plot")]
#[command(about = "Plot NEXRAD Level-2 radar files on a map")]
struct Args {
    /// Level-2 archives to plot, or `pick` to choose them in a dialog
    #[arg(required_unless_present = "pick")]
    files: Vec<String>,

    /// Choose the files in a dialog
    #[arg(long)]
    pick: bool,

    /// Field to plot, repeat for more panels
    #[arg(short, long = "field", required = true)]
    fields: Vec<RadarField>,

    /// Map center as LAT,LON (default: the radar site)
    #[arg(long, value_parser = parse_center, allow_hyphen_values = true)]
    center: Option<(f64, f64)>,

    /// Latitude bounds as MIN,MAX (default: center ±1.75°)
    #[arg(long, allow_hyphen_values = true)]
    lat_range: Option<Span>,

    /// Longitude bounds as MIN,MAX (default: center ±2.25°)
    #[arg(long, allow_hyphen_values = true)]
    lon_range: Option<Span>,

    /// Reflectivity range as MIN,MAX
    #[arg(long, allow_hyphen_values = true)]
    dbz_range: Option<Span>,

    /// Velocity range as MIN,MAX
    #[arg(long, allow_hyphen_values = true)]
    vel_range: Option<Span>,

    /// Differential reflectivity range as MIN,MAX
    #[arg(long, allow_hyphen_values = true)]
    zdr_range: Option<Span>,

    /// Correlation coefficient range as MIN,MAX
    #[arg(long, allow_hyphen_values = true)]
    cc_range: Option<Span>,

    /// Differential phase range as MIN,MAX
    #[arg(long, allow_hyphen_values = true)]
    phidp_range: Option<Span>,

    /// Spectrum width range as MIN,MAX
    #[arg(long, allow_hyphen_values = true)]
    sw_range: Option<Span>,

    /// 0 shows each figure, 1 saves numbered frames
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    save: u8,

    /// Directory for saved frames
    #[arg(long, env = "RADAR_PLOT_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Sweep override as FIELD=INDEX
    #[arg(long)]
    sweep: Vec<String>,

    /// Colormap override as FIELD=NAME
    #[arg(long)]
    colormap: Vec<String>,

    /// Viewer used when not saving. It must block until closed (default: display)
    #[arg(long, env = "RADAR_PLOT_VIEWER")]
    viewer: Option<String>,

    /// TrueType font for figure text
    #[arg(long, env = "RADAR_PLOT_FONT")]
    font: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "RADAR_PLOT_CONFIG")]
    config: Option<PathBuf>,

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
        error!(error = %format!("{:#}", e), "radar-plot failed");
        return Err(e);
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let mut config = PlotConfig::load(args.config.as_deref())?;
    if let Some(dir) = &args.output_dir {
        config.output_dir = expand_path(dir)?;
    }
    if let Some(viewer) = args.viewer {
        config.viewer = viewer;
    }
    if let Some(font) = &args.font {
        config.font_path = Some(expand_path(font)?);
    }

    let mut request = PlotRequest::new(args.fields);
    request.ranges = RangeOverrides {
        dbz: args.dbz_range,
        vel: args.vel_range,
        zdr: args.zdr_range,
        cc: args.cc_range,
        phidp: args.phidp_range,
        sw: args.sw_range,
    };
    request.extent = ExtentRequest {
        center: args.center,
        lon_range: args.lon_range,
        lat_range: args.lat_range,
    };
    request.sweeps = parse_sweep_overrides(&args.sweep)?;
    request.colormaps = config.colormap_overrides()?;
    request.colormaps.extend(parse_colormap_overrides(&args.colormap)?);

    let overlays = config
        .overlays
        .iter()
        .map(OverlayLayer::load)
        .collect::<Result<Vec<_>, _>>()?;
    let options = FigureOptions {
        panel_width: config.panel_width,
        panel_height: config.panel_height,
        ..FigureOptions::default()
    };
    let text = TextRenderer::load(config.font_path.as_deref())?;
    let renderer = FigureRenderer::new(options, text).with_overlays(overlays);

    let reader = ToolkitReader::new(config.converter.clone());
    let chooser = ZenityChooser::new();
    let pipeline =
        PlotPipeline::new(&reader, &chooser, renderer).with_landmarks(config.landmark_table());
    let files = FileSpec::from_args(args.files, args.pick);

    let summary = if args.save == 1 {
        let mut sink = DirectorySink::new(&config.output_dir)?;
        pipeline.run(&files, &request, &mut sink)?
    } else {
        let mut sink = ViewerSink::new(config.viewer.clone());
        pipeline.run(&files, &request, &mut sink)?
    };

    info!(
        processed = summary.processed,
        frames = summary.frames.len(),
        "radar-plot completed"
    );
    Ok(())
}

/// Parse `LAT,LON`.
fn parse_center(s: &str) -> Result<(f64, f64), RadarError> {
    let span: Span = s.parse().map_err(|_| RadarError::InvalidParameter {
        param: "center".to_string(),
        message: format!("'{}' is not LAT,LON", s),
    })?;
    Ok((span.min, span.max))
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
