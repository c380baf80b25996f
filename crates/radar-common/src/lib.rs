//! Common types and utilities shared by the radar plotting tools.

pub mod chooser;
pub mod error;
pub mod extent;
pub mod field;
pub mod params;
pub mod site;
pub mod time;
pub mod volume;

pub use chooser::{Chooser, ChooserSession, FileFilter, FileRequest, ZenityChooser};
pub use error::{RadarError, RadarResult};
pub use extent::{ExtentRequest, MapExtent};
pub use field::{FieldSpec, RadarField, Span};
pub use params::{DisplayRanges, RangeOverrides};
pub use site::{site_id, Landmark, LandmarkTable};
pub use time::ScanTime;
pub use volume::{RadarVolume, SweepRays, SweepView, VolumeReader};
