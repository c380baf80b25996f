//! Plot configuration loading and types.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! environment variables and command line flags (applied by `main`). The
//! YAML text supports `$VAR`, `${VAR}` and `${VAR:-default}` substitution,
//! and every path additionally expands a leading `~`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use radar_common::{LandmarkTable, RadarField};
use renderer::{Colormap, OverlaySpec, PANEL_HEIGHT, PANEL_WIDTH};
use serde::{Deserialize, Serialize};
use tracing::info;
use volume_io::ConverterCommand;

use crate::emitter::DEFAULT_VIEWER;

/// Top-level plot configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Where numbered frames are written in save mode
    pub output_dir: PathBuf,

    /// Program that opens a preview image in display mode. It should stay in
    /// the foreground until the image is dismissed.
    pub viewer: String,

    /// TrueType font for figure text (built-in DejaVu Sans when unset)
    pub font_path: Option<PathBuf>,

    /// Panel size in pixels
    pub panel_width: u32,
    pub panel_height: u32,

    /// GeoJSON layers drawn under the sweep (counties, states, coastlines)
    pub overlays: Vec<OverlaySpec>,

    /// Extra landmarks per radar site, added to the built-in ones
    pub landmarks: LandmarkTable,

    /// Level-2 to CF/Radial converter
    pub converter: ConverterCommand,

    /// Colormap name per field name
    pub colormaps: HashMap<String, String>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            viewer: DEFAULT_VIEWER.to_string(),
            font_path: None,
            panel_width: PANEL_WIDTH,
            panel_height: PANEL_HEIGHT,
            overlays: Vec::new(),
            landmarks: LandmarkTable::default(),
            converter: ConverterCommand::default(),
            colormaps: HashMap::new(),
        }
    }
}

impl PlotConfig {
    /// Load from `path`, or return the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;

        info!(
            config = %path.display(),
            overlays = config.overlays.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse YAML text, substituting environment variables first.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let expanded = shellexpand::env(content).context("Environment variable substitution failed")?;
        let mut config: Self =
            serde_yaml::from_str(&expanded).context("Failed to parse config YAML")?;
        config.expand_paths()?;
        Ok(config)
    }

    /// Expand `~` and environment variables in every path.
    pub fn expand_paths(&mut self) -> Result<()> {
        self.output_dir = expand_path(&self.output_dir)?;
        if let Some(font) = &self.font_path {
            self.font_path = Some(expand_path(font)?);
        }
        for overlay in &mut self.overlays {
            overlay.path = expand_path(&overlay.path)?;
        }
        Ok(())
    }

    /// Built-in landmarks plus the configured ones.
    pub fn landmark_table(&self) -> LandmarkTable {
        let mut table = LandmarkTable::builtin();
        table.merge(self.landmarks.clone());
        table
    }

    /// Configured colormaps keyed by field.
    pub fn colormap_overrides(&self) -> Result<HashMap<RadarField, Colormap>> {
        self.colormaps
            .iter()
            .map(|(field, name)| {
                let field: RadarField = field
                    .parse()
                    .with_context(|| format!("Invalid colormaps entry '{}'", field))?;
                let colormap = Colormap::named(name)
                    .with_context(|| format!("Invalid colormap for {}", field))?;
                Ok((field, colormap))
            })
            .collect()
    }
}

/// Expand `~` and `$VAR` in a path.
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path {:?}", path))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
