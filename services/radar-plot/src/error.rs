//! Error types for the plot pipeline.

use radar_common::RadarError;
use renderer::RenderError;
use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    Radar(#[from] RadarError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Invalid assignment '{0}': expected FIELD=VALUE")]
    InvalidAssignment(String),

    #[error("No fields requested")]
    NoFields,

    #[error("Viewer '{program}' not found on PATH")]
    ViewerNotFound { program: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
