//! Pixel <-> geographic mapping for one map panel.

use projection::LambertConformal;
use radar_common::MapExtent;

/// A map area of `width` x `height` pixels showing a [`MapExtent`] in a
/// Lambert conformal projection centered on the extent's `lat_0`/`lon_0`.
///
/// The projected rectangle spans the projected lower-left and upper-right
/// corners of the extent. It is scaled uniformly to fit the pixel area and
/// centered, so the map keeps its aspect ratio.
#[derive(Debug, Clone)]
pub struct MapViewport {
    proj: LambertConformal,
    width: u32,
    height: u32,
    x_min: f64,
    y_max: f64,
    /// Metres per pixel
    scale: f64,
    /// Pixel offset of the map rectangle inside the area
    offset_x: f64,
    offset_y: f64,
    map_width: f64,
    map_height: f64,
}

impl MapViewport {
    pub fn new(extent: &MapExtent, width: u32, height: u32) -> Self {
        let proj = LambertConformal::centered(extent.lat_0, extent.lon_0);
        let ((ll_lat, ll_lon), (ur_lat, ur_lon)) = extent.corners();
        let (x0, y0) = proj.project(ll_lat, ll_lon);
        let (x1, y1) = proj.project(ur_lat, ur_lon);

        let x_min = x0.min(x1);
        let x_max = x0.max(x1);
        let y_min = y0.min(y1);
        let y_max = y0.max(y1);

        let span_x = (x_max - x_min).max(1.0);
        let span_y = (y_max - y_min).max(1.0);
        let w = width.max(1) as f64;
        let h = height.max(1) as f64;
        let scale = (span_x / w).max(span_y / h);

        let map_width = span_x / scale;
        let map_height = span_y / scale;

        Self {
            proj,
            width,
            height,
            x_min,
            y_max,
            scale,
            offset_x: (w - map_width) / 2.0,
            offset_y: (h - map_height) / 2.0,
            map_width,
            map_height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel rectangle actually covered by the map: (x, y, width, height).
    pub fn map_rect(&self) -> (f64, f64, f64, f64) {
        (self.offset_x, self.offset_y, self.map_width, self.map_height)
    }

    /// Whether a pixel position falls inside the map rectangle.
    pub fn contains_pixel(&self, px: f64, py: f64) -> bool {
        px >= self.offset_x
            && px <= self.offset_x + self.map_width
            && py >= self.offset_y
            && py <= self.offset_y + self.map_height
    }

    /// Geographic point to pixel position (may fall outside the area).
    pub fn to_pixel(&self, lat: f64, lon: f64) -> (f64, f64) {
        let (x, y) = self.proj.project(lat, lon);
        (
            self.offset_x + (x - self.x_min) / self.scale,
            self.offset_y + (self.y_max - y) / self.scale,
        )
    }

    /// Pixel position to (lat, lon).
    pub fn to_geo(&self, px: f64, py: f64) -> (f64, f64) {
        let x = self.x_min + (px - self.offset_x) * self.scale;
        let y = self.y_max - (py - self.offset_y) * self.scale;
        self.proj.unproject(x, y)
    }
}
