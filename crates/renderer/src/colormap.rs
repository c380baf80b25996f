//! Color ramps for radar moments.
//!
//! A [`Colormap`] is a list of colors spaced evenly over `0.0..=1.0`. Values
//! are normalized against the resolved display [`Span`] before lookup, so the
//! same ramp serves any range.

use image::Rgba;
use radar_common::{RadarField, Span};

use crate::error::{RenderError, RenderResult};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Parse `#RRGGBB` (the `#` is optional).
    pub fn from_hex(hex: &str) -> RenderResult<Self> {
        hex_to_rgb(hex)
            .map(|(r, g, b)| Self::new(r, g, b, 255))
            .ok_or_else(|| RenderError::InvalidColor(hex.to_string()))
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

// ============================================================================
// Built-in ramps
// ============================================================================

const NWS_REFLECTIVITY: &[&str] = &[
    "#00ECEC", "#01A0F6", "#0000F6", "#00FF00", "#00C800", "#009000", "#FFFF00", "#E7C000",
    "#FF9000", "#FF0000", "#D60000", "#C00000", "#FF00FF", "#9955C9",
];

// Inbound (negative) velocities green, outbound red.
const VELOCITY: &[&str] = &[
    "#00E000", "#00A000", "#005000", "#B0B0B0", "#500000", "#A00000", "#E00000",
];

const DIVERGING: &[&str] = &["#2040C0", "#80A0F0", "#F0F0F0", "#F0A080", "#C02020"];

const RAINBOW: &[&str] = &[
    "#6A00A8", "#0000FF", "#00BFFF", "#00FF00", "#FFFF00", "#FF8000", "#FF0000",
];

const VIRIDIS: &[&str] = &["#440154", "#3B528B", "#21918C", "#5EC962", "#FDE725"];

const GRAYSCALE: &[&str] = &["#000000", "#FFFFFF"];

fn builtin(name: &str) -> Option<(&'static str, &'static [&'static str])> {
    let table: (&'static str, &'static [&'static str]) = match name.to_ascii_lowercase().as_str() {
        "nws_reflectivity" => ("nws_reflectivity", NWS_REFLECTIVITY),
        "velocity" => ("velocity", VELOCITY),
        "diverging" => ("diverging", DIVERGING),
        "rainbow" => ("rainbow", RAINBOW),
        "viridis" => ("viridis", VIRIDIS),
        "grayscale" | "greyscale" => ("grayscale", GRAYSCALE),
        _ => return None,
    };
    Some(table)
}

/// A color ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    colors: Vec<Color>,
}

impl Colormap {
    /// Names accepted by [`Colormap::named`].
    pub const NAMES: &'static [&'static str] = &[
        "nws_reflectivity",
        "velocity",
        "diverging",
        "rainbow",
        "viridis",
        "grayscale",
    ];

    /// Look up a built-in ramp (case-insensitive).
    pub fn named(name: &str) -> RenderResult<Self> {
        builtin(name)
            .map(|(canonical, hexes)| Self::from_table(canonical, hexes))
            .ok_or_else(|| RenderError::UnknownColormap(name.to_string()))
    }

    /// The ramp a field is drawn with unless overridden.
    pub fn default_for(field: RadarField) -> Self {
        let (name, hexes) = match field {
            RadarField::Reflectivity => ("nws_reflectivity", NWS_REFLECTIVITY),
            RadarField::Velocity => ("velocity", VELOCITY),
            RadarField::DifferentialReflectivity => ("diverging", DIVERGING),
            RadarField::CrossCorrelationRatio => ("rainbow", RAINBOW),
            RadarField::SpectrumWidth => ("viridis", VIRIDIS),
            RadarField::DifferentialPhase => ("rainbow", RAINBOW),
        };
        Self::from_table(name, hexes)
    }

    /// Build a ramp from user supplied hex colors.
    pub fn from_hex(name: impl Into<String>, hexes: &[&str]) -> RenderResult<Self> {
        if hexes.is_empty() {
            return Err(RenderError::InvalidColor("empty color list".to_string()));
        }
        let colors = hexes
            .iter()
            .map(|h| Color::from_hex(h))
            .collect::<RenderResult<Vec<_>>>()?;
        Ok(Self {
            name: name.into(),
            colors,
        })
    }

    fn from_table(name: &str, hexes: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            colors: hexes.iter().filter_map(|h| Color::from_hex(h).ok()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color at position `t` in `0.0..=1.0`; out-of-range positions saturate.
    pub fn sample(&self, t: f32) -> Color {
        match self.colors.len() {
            0 => Color::transparent(),
            1 => self.colors[0],
            n => {
                let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
                let lower = (scaled.floor() as usize).min(n - 2);
                interpolate_color(self.colors[lower], self.colors[lower + 1], scaled - lower as f32)
            }
        }
    }

    /// Color for a data value displayed over `span`. NaN is transparent.
    pub fn color_for(&self, value: f32, span: Span) -> Color {
        if value.is_nan() {
            return Color::transparent();
        }
        self.sample(span.normalize(value as f64) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FAFAFA"), Some((250, 250, 250)));
        assert_eq!(hex_to_rgb("00ff80"), Some((0, 255, 128)));
        assert_eq!(hex_to_rgb("#FFF"), None);
        assert_eq!(hex_to_rgb("#GG0000"), None);
    }

    #[test]
    fn test_grayscale_endpoints() {
        let cmap = Colormap::named("grayscale").unwrap();
        assert_eq!(cmap.sample(0.0), Color::new(0, 0, 0, 255));
        assert_eq!(cmap.sample(1.0), Color::new(255, 255, 255, 255));
        assert_eq!(cmap.sample(0.5), Color::new(128, 128, 128, 255));
    }

    #[test]
    fn test_values_are_clipped_to_span() {
        let cmap = Colormap::named("grayscale").unwrap();
        let span = Span::new(0.0, 64.0);
        assert_eq!(cmap.color_for(-30.0, span), cmap.sample(0.0));
        assert_eq!(cmap.color_for(90.0, span), cmap.sample(1.0));
    }

    #[test]
    fn test_nan_is_transparent() {
        let cmap = Colormap::default_for(RadarField::Reflectivity);
        assert_eq!(cmap.color_for(f32::NAN, Span::new(0.0, 64.0)).a, 0);
    }

    #[test]
    fn test_named_is_case_insensitive() {
        assert_eq!(Colormap::named("GreyScale").unwrap().name(), "grayscale");
        assert!(matches!(
            Colormap::named("jet"),
            Err(RenderError::UnknownColormap(_))
        ));
    }

    #[test]
    fn test_every_builtin_parses() {
        for name in Colormap::NAMES {
            let cmap = Colormap::named(name).unwrap();
            assert!(cmap.colors.len() >= 2, "{} has too few colors", name);
        }
        for field in RadarField::ALL {
            assert!(!Colormap::default_for(field).colors.is_empty());
        }
    }
}
