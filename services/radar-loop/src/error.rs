//! Error types for frame looping.

use std::path::PathBuf;

use radar_common::RadarError;
use thiserror::Error;

pub type LoopResult<T> = Result<T, LoopError>;

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("Encoder '{program}' not found on PATH")]
    EncoderNotFound { program: String },

    #[error("Encoder '{program}' failed with {}", exit_description(.code))]
    EncoderFailed { program: String, code: Option<i32> },

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error(transparent)]
    Radar(#[from] RadarError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}
