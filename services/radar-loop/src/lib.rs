//! Radar loop library.
//!
//! Stitches the numbered frames written by `radar-plot` into a video.

pub mod encoder;
pub mod error;
pub mod looper;

pub use encoder::{count_frames, EncodeOutcome, EncoderInvocation, FfmpegEncoder, FrameEncoder};
pub use error::{LoopError, LoopResult};
pub use looper::{FrameLooper, LoopTarget};
