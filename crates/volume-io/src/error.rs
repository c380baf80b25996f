//! Error types for volume decoding.

use std::path::PathBuf;

use radar_common::RadarError;
use thiserror::Error;

/// Result type for volume-io operations.
pub type VolumeIoResult<T> = Result<T, VolumeIoError>;

/// Error types for converting and reading radar volumes.
#[derive(Error, Debug)]
pub enum VolumeIoError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input archive does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The converter program could not be started
    #[error("Converter '{program}' not found on PATH")]
    ConverterNotFound { program: String },

    /// The converter ran but did not produce a CF/Radial file
    #[error("Conversion of {input} failed ({status}): {stderr}")]
    Conversion {
        input: String,
        status: String,
        stderr: String,
    },

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Built without a CF/Radial backend
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl From<VolumeIoError> for RadarError {
    fn from(err: VolumeIoError) -> Self {
        match err {
            VolumeIoError::Io(e) => RadarError::Io(e),
            other => RadarError::VolumeReadError(other.to_string()),
        }
    }
}
