//! Error types for the radar plotting tools.

use thiserror::Error;

/// Result type alias using RadarError.
pub type RadarResult<T> = Result<T, RadarError>;

/// Primary error type for volume, parameter and dialog operations.
#[derive(Debug, Error)]
pub enum RadarError {
    // === Parameter Errors ===
    #[error("Unknown radar field: {0}")]
    UnknownField(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid range '{0}': expected MIN,MAX")]
    InvalidSpan(String),

    // === Volume Errors ===
    #[error("Invalid time units '{0}': expected '<unit> since YYYY-MM-DDThh:mm:ssZ'")]
    InvalidTimeUnits(String),

    #[error("Field '{field}' is not present in the volume")]
    MissingMoment { field: String },

    #[error("Sweep {sweep} out of range (volume has {available} sweeps)")]
    SweepOutOfRange { sweep: usize, available: usize },

    #[error("Malformed volume: {0}")]
    MalformedVolume(String),

    #[error("Failed to read volume: {0}")]
    VolumeReadError(String),

    // === Dialog Errors ===
    #[error("File chooser failed: {0}")]
    ChooserError(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RadarError {
    /// Whether the error came from user input rather than from data or I/O.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            RadarError::UnknownField(_)
                | RadarError::InvalidParameter { .. }
                | RadarError::InvalidSpan(_)
        )
    }
}
