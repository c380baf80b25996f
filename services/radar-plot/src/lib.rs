//! Radar plot library.
//!
//! Turns NEXRAD Level-2 archives into multi-panel PPI figures, either shown
//! in a viewer or saved as numbered frames for the looper.

pub mod config;
pub mod emitter;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod request;

pub use config::PlotConfig;
pub use emitter::{frame_name, DirectorySink, FrameSink, ViewerSink};
pub use error::{PlotError, PlotResult};
pub use input::{resolve_inputs, FileSpec};
pub use pipeline::{PlotPipeline, PlotSummary};
pub use request::PlotRequest;
