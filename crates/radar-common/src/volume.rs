//! Decoded radar volume model.
//!
//! The layout mirrors CF/Radial: every ray of every sweep is one row of a
//! rays × gates matrix, and sweeps are contiguous runs of rays.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{RadarError, RadarResult};
use crate::field::RadarField;

/// First and last ray (inclusive) of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepRays {
    pub start_ray: usize,
    pub end_ray: usize,
}

impl SweepRays {
    pub fn ray_count(&self) -> usize {
        self.end_ray + 1 - self.start_ray
    }
}

/// One decoded volume scan.
#[derive(Debug, Clone, Default)]
pub struct RadarVolume {
    /// CF units of the time coordinate; its epoch is the scan start.
    pub time_units: String,
    /// Site latitude in degrees.
    pub latitude: f64,
    /// Site longitude in degrees.
    pub longitude: f64,
    /// Site altitude in metres.
    pub altitude: f64,
    /// Distance from the antenna to the center of each gate, in metres.
    pub ranges: Vec<f32>,
    /// Azimuth of each ray in degrees clockwise from north.
    pub azimuths: Vec<f32>,
    /// Elevation of each ray in degrees.
    pub elevations: Vec<f32>,
    pub sweeps: Vec<SweepRays>,
    /// Row-major rays × gates values; NaN marks missing data.
    pub moments: HashMap<RadarField, Vec<f32>>,
}

/// Borrowed view of one moment on one sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepView<'a> {
    pub field: RadarField,
    pub sweep: usize,
    pub azimuths: &'a [f32],
    pub ranges: &'a [f32],
    /// Mean elevation angle of the sweep in degrees.
    pub elevation: f32,
    /// Row-major rays × gates values for this sweep only.
    pub values: &'a [f32],
}

impl<'a> SweepView<'a> {
    pub fn ray_count(&self) -> usize {
        self.azimuths.len()
    }

    pub fn gate_count(&self) -> usize {
        self.ranges.len()
    }

    /// Value at a ray/gate pair, NaN when out of bounds.
    pub fn value(&self, ray: usize, gate: usize) -> f32 {
        if ray >= self.ray_count() || gate >= self.gate_count() {
            return f32::NAN;
        }
        self.values[ray * self.gate_count() + gate]
    }
}

impl RadarVolume {
    pub fn ray_count(&self) -> usize {
        self.azimuths.len()
    }

    pub fn gate_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn has_moment(&self, field: RadarField) -> bool {
        self.moments.contains_key(&field)
    }

    /// Check that coordinates, sweeps and moments agree in shape.
    pub fn validate(&self) -> RadarResult<()> {
        let rays = self.ray_count();
        let gates = self.gate_count();

        if self.elevations.len() != rays {
            return Err(RadarError::MalformedVolume(format!(
                "{} elevations for {} rays",
                self.elevations.len(),
                rays
            )));
        }

        for (i, sweep) in self.sweeps.iter().enumerate() {
            if sweep.start_ray > sweep.end_ray || sweep.end_ray >= rays {
                return Err(RadarError::MalformedVolume(format!(
                    "sweep {} spans rays {}..={} of {}",
                    i, sweep.start_ray, sweep.end_ray, rays
                )));
            }
        }

        for (field, data) in &self.moments {
            if data.len() != rays * gates {
                return Err(RadarError::MalformedVolume(format!(
                    "{} has {} values, expected {} x {}",
                    field,
                    data.len(),
                    rays,
                    gates
                )));
            }
        }

        Ok(())
    }

    /// View of `field` on sweep `index`.
    pub fn sweep(&self, field: RadarField, index: usize) -> RadarResult<SweepView<'_>> {
        let rays = self.sweeps.get(index).ok_or(RadarError::SweepOutOfRange {
            sweep: index,
            available: self.sweeps.len(),
        })?;
        let data = self.moments.get(&field).ok_or_else(|| RadarError::MissingMoment {
            field: field.name().to_string(),
        })?;

        let gates = self.gate_count();
        let ray_range = rays.start_ray..rays.end_ray.saturating_add(1);
        let malformed = || {
            RadarError::MalformedVolume(format!(
                "sweep {} spans rays {}..={} of {}",
                index,
                rays.start_ray,
                rays.end_ray,
                self.ray_count()
            ))
        };
        let elevations = self.elevations.get(ray_range.clone()).ok_or_else(malformed)?;
        let azimuths = self.azimuths.get(ray_range.clone()).ok_or_else(malformed)?;
        let values = data
            .get(ray_range.start * gates..ray_range.end * gates)
            .ok_or_else(malformed)?;
        let elevation = if elevations.is_empty() {
            0.0
        } else {
            elevations.iter().sum::<f32>() / elevations.len() as f32
        };

        Ok(SweepView {
            field,
            sweep: index,
            azimuths,
            ranges: &self.ranges,
            elevation,
            values,
        })
    }
}

/// Source of decoded volumes.
///
/// Decoding is delegated to an external radar toolkit; implementations
/// adapt that toolkit's output into a [`RadarVolume`].
pub trait VolumeReader {
    fn read(&self, path: &Path) -> RadarResult<RadarVolume>;
}
