//! Synthetic radar volume generators.
//!
//! Volumes are small but shaped like real Level-2 scans: sweeps of evenly
//! spaced rays, a fixed gate spacing and a moment matrix per field.

use std::collections::HashMap;

use radar_common::{RadarField, RadarVolume, SweepRays};

use crate::fixtures::kiwx;

/// Builder for a synthetic [`RadarVolume`].
///
/// # Example
///
/// ```
/// use radar_common::RadarField;
/// use test_utils::VolumeBuilder;
///
/// let volume = VolumeBuilder::new()
///     .sweeps(&[0.5, 0.9])
///     .moment(RadarField::Reflectivity, |_, _, gate, _| gate as f32)
///     .build();
/// assert_eq!(volume.sweeps.len(), 2);
/// ```
pub struct VolumeBuilder {
    latitude: f64,
    longitude: f64,
    time_units: String,
    elevations: Vec<f32>,
    rays_per_sweep: usize,
    gates: usize,
    first_gate: f32,
    gate_spacing: f32,
    moments: Vec<(RadarField, Box<dyn Fn(usize, f32, usize, f32) -> f32>)>,
}

impl Default for VolumeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeBuilder {
    /// KIWX, two sweeps (0.5 and 0.9 degrees), 360 rays, 400 gates of 250 m.
    pub fn new() -> Self {
        Self {
            latitude: kiwx::LAT,
            longitude: kiwx::LON,
            time_units: kiwx::TIME_UNITS.to_string(),
            elevations: vec![0.5, 0.9],
            rays_per_sweep: 360,
            gates: 400,
            first_gate: 2125.0,
            gate_spacing: 250.0,
            moments: Vec::new(),
        }
    }

    pub fn site(mut self, lat: f64, lon: f64) -> Self {
        self.latitude = lat;
        self.longitude = lon;
        self
    }

    pub fn time_units(mut self, units: &str) -> Self {
        self.time_units = units.to_string();
        self
    }

    /// One sweep per elevation angle.
    pub fn sweeps(mut self, elevations: &[f32]) -> Self {
        self.elevations = elevations.to_vec();
        self
    }

    pub fn rays_per_sweep(mut self, rays: usize) -> Self {
        self.rays_per_sweep = rays;
        self
    }

    pub fn gates(mut self, gates: usize, first_gate: f32, spacing: f32) -> Self {
        self.gates = gates;
        self.first_gate = first_gate;
        self.gate_spacing = spacing;
        self
    }

    /// Add a moment whose value is `f(sweep, azimuth, gate, range)`.
    pub fn moment<F>(mut self, field: RadarField, f: F) -> Self
    where
        F: Fn(usize, f32, usize, f32) -> f32 + 'static,
    {
        self.moments.push((field, Box::new(f)));
        self
    }

    /// Add a moment with the same value everywhere.
    pub fn uniform(self, field: RadarField, value: f32) -> Self {
        self.moment(field, move |_, _, _, _| value)
    }

    pub fn build(self) -> RadarVolume {
        let ranges: Vec<f32> = (0..self.gates)
            .map(|g| self.first_gate + g as f32 * self.gate_spacing)
            .collect();

        let mut azimuths = Vec::new();
        let mut elevations = Vec::new();
        let mut sweeps = Vec::new();
        let mut sweep_of_ray = Vec::new();
        for (s, &el) in self.elevations.iter().enumerate() {
            let start = azimuths.len();
            for r in 0..self.rays_per_sweep {
                azimuths.push((r as f32 + 0.5) * 360.0 / self.rays_per_sweep as f32);
                elevations.push(el);
                sweep_of_ray.push(s);
            }
            if self.rays_per_sweep > 0 {
                sweeps.push(SweepRays {
                    start_ray: start,
                    end_ray: azimuths.len() - 1,
                });
            }
        }

        let mut moments = HashMap::new();
        for (field, f) in &self.moments {
            let mut data = Vec::with_capacity(azimuths.len() * ranges.len());
            for (ray, &az) in azimuths.iter().enumerate() {
                for (gate, &range) in ranges.iter().enumerate() {
                    data.push(f(sweep_of_ray[ray], az, gate, range));
                }
            }
            moments.insert(*field, data);
        }

        RadarVolume {
            time_units: self.time_units,
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: kiwx::ALT,
            ranges,
            azimuths,
            elevations,
            sweeps,
            moments,
        }
    }
}

/// KIWX volume with every field present.
///
/// Reflectivity grows with range, velocity is positive east of the radar and
/// negative west of it, the other fields are constant.
pub fn create_test_volume() -> RadarVolume {
    VolumeBuilder::new()
        .rays_per_sweep(72)
        .gates(120, 2125.0, 1000.0)
        .moment(RadarField::Reflectivity, |_, _, gate, _| gate as f32 * 0.5)
        .moment(RadarField::Velocity, |_, az, _, _| {
            15.0 * az.to_radians().sin()
        })
        .uniform(RadarField::DifferentialReflectivity, 1.5)
        .uniform(RadarField::CrossCorrelationRatio, 0.98)
        .uniform(RadarField::SpectrumWidth, 4.0)
        .uniform(RadarField::DifferentialPhase, 90.0)
        .build()
}

/// Small volume with a single moment at a constant value.
pub fn create_uniform_volume(field: RadarField, value: f32) -> RadarVolume {
    VolumeBuilder::new()
        .rays_per_sweep(36)
        .gates(60, 2125.0, 2000.0)
        .uniform(field, value)
        .build()
}

/// RGBA test pixels: a horizontal gray gradient with 16 levels.
pub fn create_test_rgba_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for _ in 0..height {
        for x in 0..width {
            let level = ((x * 16 / width.max(1)) * 16) as u8;
            pixels.extend_from_slice(&[level, level, level, 255]);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_shapes() {
        let vol = VolumeBuilder::new()
            .sweeps(&[0.5, 0.9, 1.3])
            .rays_per_sweep(10)
            .gates(5, 1000.0, 500.0)
            .uniform(RadarField::Velocity, 2.0)
            .build();

        assert_eq!(vol.ray_count(), 30);
        assert_eq!(vol.gate_count(), 5);
        assert_eq!(vol.sweeps[2].start_ray, 20);
        assert_eq!(vol.sweeps[2].end_ray, 29);
        assert_eq!(vol.ranges[4], 3000.0);
        assert!(vol.validate().is_ok());
    }

    #[test]
    fn test_test_volume_has_every_field() {
        let vol = create_test_volume();
        for field in RadarField::ALL {
            assert!(vol.has_moment(field), "{} missing", field);
        }
        assert!(vol.validate().is_ok());
    }
}
