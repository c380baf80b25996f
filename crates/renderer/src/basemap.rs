//! Map background: land fill and vector overlays.
//!
//! Overlays (county lines, state borders, coastlines...) come from GeoJSON
//! files. Lines and polygon rings are both drawn as polylines; nothing is
//! filled except the land color behind the whole map.

use image::RgbaImage;
use imageproc::drawing::draw_line_segment_mut;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::colormap::Color;
use crate::error::{RenderError, RenderResult};
use crate::viewport::MapViewport;

/// Land color painted behind the radar data.
pub const LAND_COLOR: Color = Color::new(0xFA, 0xFA, 0xFA, 255);

fn default_overlay_color() -> String {
    "#404040".to_string()
}

fn default_overlay_width() -> u32 {
    1
}

/// Overlay file and how to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    pub path: PathBuf,
    #[serde(default = "default_overlay_color")]
    pub color: String,
    #[serde(default = "default_overlay_width")]
    pub width: u32,
}

/// A parsed overlay: polylines in (lon, lat) degrees.
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    pub name: String,
    pub lines: Vec<Vec<(f64, f64)>>,
    pub color: Color,
    pub width: u32,
}

impl OverlayLayer {
    /// Read and parse the GeoJSON file named by `spec`.
    pub fn load(spec: &OverlaySpec) -> RenderResult<Self> {
        let content = std::fs::read_to_string(&spec.path).map_err(|e| RenderError::Overlay {
            path: spec.path.display().to_string(),
            message: e.to_string(),
        })?;
        let color = Color::from_hex(&spec.color)?;
        let name = layer_name(&spec.path);

        let layer = Self::from_geojson(&name, &content, color, spec.width).map_err(|e| match e {
            RenderError::Overlay { message, .. } => RenderError::Overlay {
                path: spec.path.display().to_string(),
                message,
            },
            other => other,
        })?;

        info!(
            overlay = %layer.name,
            lines = layer.lines.len(),
            "Loaded map overlay"
        );
        Ok(layer)
    }

    /// Parse a GeoJSON document (FeatureCollection, Feature or bare geometry).
    pub fn from_geojson(name: &str, json: &str, color: Color, width: u32) -> RenderResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| RenderError::Overlay {
            path: name.to_string(),
            message: e.to_string(),
        })?;

        let mut lines = Vec::new();
        collect_lines(&value, &mut lines);

        Ok(Self {
            name: name.to_string(),
            lines,
            color,
            width: width.max(1),
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn collect_lines(value: &Value, out: &mut Vec<Vec<(f64, f64)>>) {
    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        return;
    };
    let coords = value.get("coordinates");

    match kind {
        "FeatureCollection" => {
            if let Some(features) = value.get("features").and_then(Value::as_array) {
                for feature in features {
                    collect_lines(feature, out);
                }
            }
        }
        "Feature" => {
            if let Some(geometry) = value.get("geometry") {
                collect_lines(geometry, out);
            }
        }
        "GeometryCollection" => {
            if let Some(geometries) = value.get("geometries").and_then(Value::as_array) {
                for geometry in geometries {
                    collect_lines(geometry, out);
                }
            }
        }
        "LineString" => out.extend(coords.and_then(parse_line)),
        "MultiLineString" | "Polygon" => {
            if let Some(rings) = coords.and_then(Value::as_array) {
                out.extend(rings.iter().filter_map(parse_line));
            }
        }
        "MultiPolygon" => {
            if let Some(polygons) = coords.and_then(Value::as_array) {
                for polygon in polygons.iter().filter_map(Value::as_array) {
                    out.extend(polygon.iter().filter_map(parse_line));
                }
            }
        }
        // points have nothing to draw as a line
        _ => {}
    }
}

fn parse_line(value: &Value) -> Option<Vec<(f64, f64)>> {
    let line: Vec<(f64, f64)> = value
        .as_array()?
        .iter()
        .filter_map(|p| {
            let p = p.as_array()?;
            Some((p.first()?.as_f64()?, p.get(1)?.as_f64()?))
        })
        .collect();
    (line.len() >= 2).then_some(line)
}

/// Paint the map rectangle with `color`.
pub fn fill_background(img: &mut RgbaImage, viewport: &MapViewport, color: Color) {
    let (x, y, w, h) = viewport.map_rect();
    let x0 = x.floor().max(0.0) as u32;
    let y0 = y.floor().max(0.0) as u32;
    let x1 = ((x + w).ceil() as u32).min(img.width());
    let y1 = ((y + h).ceil() as u32).min(img.height());

    let rgba = color.to_rgba();
    for py in y0..y1 {
        for px in x0..x1 {
            img.put_pixel(px, py, rgba);
        }
    }
}

/// Draw an overlay's polylines, clipped to the map rectangle.
pub fn draw_overlay(img: &mut RgbaImage, layer: &OverlayLayer, viewport: &MapViewport) {
    let rect = viewport.map_rect();
    let color = layer.color.to_rgba();
    let mut drawn = 0usize;

    for line in &layer.lines {
        let pixels: Vec<(f64, f64)> = line
            .iter()
            .map(|&(lon, lat)| viewport.to_pixel(lat, lon))
            .collect();

        for pair in pixels.windows(2) {
            let Some((a, b)) = clip_segment(pair[0], pair[1], rect) else {
                continue;
            };
            draw_thick_segment(img, a, b, layer.width, color);
            drawn += 1;
        }
    }

    debug!(overlay = %layer.name, segments = drawn, "Drew overlay");
}

fn draw_thick_segment(
    img: &mut RgbaImage,
    a: (f64, f64),
    b: (f64, f64),
    width: u32,
    color: image::Rgba<u8>,
) {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if len > 0.0 { (-dy / len, dx / len) } else { (0.0, 0.0) };

    let half = (width as i32 - 1) / 2;
    for k in -half..=(width as i32 - 1 - half) {
        let off = k as f64;
        draw_line_segment_mut(
            img,
            ((a.0 + nx * off) as f32, (a.1 + ny * off) as f32),
            ((b.0 + nx * off) as f32, (b.1 + ny * off) as f32),
            color,
        );
    }
}

/// Liang-Barsky clip of segment `a`-`b` against rect (x, y, w, h).
pub fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    rect: (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if !(a.0.is_finite() && a.1.is_finite() && b.0.is_finite() && b.1.is_finite()) {
        return None;
    }
    let (rx, ry, rw, rh) = rect;
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    for (p, q) in [
        (-dx, a.0 - rx),
        (dx, rx + rw - a.0),
        (-dy, a.1 - ry),
        (dy, ry + rh - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}
