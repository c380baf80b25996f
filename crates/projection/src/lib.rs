//! Map projections for radar plots.
//!
//! Implemented from scratch on a spherical earth:
//! - [`LambertConformal`] for the map panels
//! - [`RadarGeometry`] for locating radar gates on the ground

pub mod lambert;
pub mod polar;

pub use lambert::LambertConformal;
pub use polar::{AzimuthalEquidistant, BeamGeometry, RadarGeometry};
