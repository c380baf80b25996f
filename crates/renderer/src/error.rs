//! Error types for figure rendering.

use radar_common::RadarError;
use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Radar(#[from] RadarError),

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid figure: {0}")]
    InvalidFigure(String),

    #[error("Overlay {path}: {message}")]
    Overlay { path: String, message: String },

    #[error("Font {path}: {message}")]
    Font { path: String, message: String },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
