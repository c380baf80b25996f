//! Plan position indicator rendering.
//!
//! Every map pixel is traced back to the radar: pixel -> projected metres ->
//! lat/lon -> slant range and azimuth on the sweep's elevation. The nearest
//! ray and gate supply the value, which is colored through the panel's ramp.
//! Pixels with no data stay transparent so the basemap shows through.

use image::RgbaImage;
use projection::RadarGeometry;
use radar_common::{Span, SweepView};
use rayon::prelude::*;
use tracing::debug;

use crate::colormap::Colormap;
use crate::error::{RenderError, RenderResult};
use crate::viewport::MapViewport;

/// Nearest-neighbour lookup of sweep values by range and azimuth.
#[derive(Debug, Clone)]
pub struct SweepSampler<'a> {
    view: SweepView<'a>,
    /// (azimuth in 0..360, ray index), sorted by azimuth
    rays_by_azimuth: Vec<(f32, usize)>,
    max_azimuth_gap: f32,
    half_gate: f32,
}

impl<'a> SweepSampler<'a> {
    pub fn new(view: SweepView<'a>) -> Self {
        let mut rays_by_azimuth: Vec<(f32, usize)> = view
            .azimuths
            .iter()
            .enumerate()
            .filter(|(_, az)| az.is_finite())
            .map(|(i, az)| (az.rem_euclid(360.0), i))
            .collect();
        rays_by_azimuth.sort_by(|a, b| a.0.total_cmp(&b.0));

        let max_azimuth_gap = if rays_by_azimuth.is_empty() {
            0.0
        } else {
            (360.0 / rays_by_azimuth.len() as f32 * 1.5).max(0.5)
        };

        let ranges = view.ranges;
        let half_gate = if ranges.len() >= 2 {
            (ranges[ranges.len() - 1] - ranges[0]) / (ranges.len() - 1) as f32 / 2.0
        } else {
            125.0
        };

        Self {
            view,
            rays_by_azimuth,
            max_azimuth_gap,
            half_gate,
        }
    }

    /// Ray whose azimuth is closest to `azimuth`, if within the beam spacing.
    pub fn nearest_ray(&self, azimuth: f32) -> Option<usize> {
        let n = self.rays_by_azimuth.len();
        if n == 0 {
            return None;
        }
        let az = azimuth.rem_euclid(360.0);
        let i = self.rays_by_azimuth.partition_point(|&(a, _)| a < az);

        let after = self.rays_by_azimuth[i % n];
        let before = self.rays_by_azimuth[(i + n - 1) % n];
        let (best_az, best_ray) = if angular_distance(after.0, az) <= angular_distance(before.0, az) {
            after
        } else {
            before
        };

        (angular_distance(best_az, az) <= self.max_azimuth_gap).then_some(best_ray)
    }

    /// Gate whose center is closest to `range`, if inside the swept range.
    pub fn nearest_gate(&self, range: f32) -> Option<usize> {
        let ranges = self.view.ranges;
        let (first, last) = (*ranges.first()?, *ranges.last()?);
        if !range.is_finite() || range < first - self.half_gate || range > last + self.half_gate {
            return None;
        }

        let i = ranges.partition_point(|&g| g < range);
        if i == 0 {
            return Some(0);
        }
        if i >= ranges.len() {
            return Some(ranges.len() - 1);
        }
        if (ranges[i] - range).abs() < (range - ranges[i - 1]).abs() {
            Some(i)
        } else {
            Some(i - 1)
        }
    }

    /// Value at slant `range` (metres) and `azimuth` (degrees). NaN when no gate covers it.
    pub fn sample(&self, range: f32, azimuth: f32) -> f32 {
        match (self.nearest_ray(azimuth), self.nearest_gate(range)) {
            (Some(ray), Some(gate)) => self.view.value(ray, gate),
            _ => f32::NAN,
        }
    }
}

fn angular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}

/// Rasterize one sweep over `viewport`.
///
/// Values are clipped to `span` before coloring; the returned image has the
/// viewport's size and is transparent where there is no data.
pub fn render_ppi(
    view: SweepView<'_>,
    site: (f64, f64),
    viewport: &MapViewport,
    span: Span,
    colormap: &Colormap,
) -> RenderResult<RgbaImage> {
    let width = viewport.width() as usize;
    let height = viewport.height() as usize;
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidFigure(format!(
            "map area is {}x{} pixels",
            width, height
        )));
    }

    let geometry = RadarGeometry::new(site.0, site.1);
    let sampler = SweepSampler::new(view);
    let elevation = view.elevation as f64;

    debug!(
        field = %view.field,
        sweep = view.sweep,
        rays = view.ray_count(),
        gates = view.gate_count(),
        elevation,
        "Rendering PPI"
    );

    let mut pixels = vec![0u8; width * height * 4];
    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(row, line)| {
            let py = row as f64 + 0.5;
            for (col, px_out) in line.chunks_exact_mut(4).enumerate() {
                let px = col as f64 + 0.5;
                if !viewport.contains_pixel(px, py) {
                    continue;
                }
                let (lat, lon) = viewport.to_geo(px, py);
                let (range, azimuth) = geometry.locate(lat, lon, elevation);
                let value = sampler.sample(range as f32, azimuth as f32);
                let color = colormap.color_for(value, span);
                px_out.copy_from_slice(&[color.r, color.g, color.b, color.a]);
            }
        });

    RgbaImage::from_raw(width as u32, height as u32, pixels)
        .ok_or_else(|| RenderError::InvalidFigure("PPI buffer size mismatch".to_string()))
}
