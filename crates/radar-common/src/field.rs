//! Radar moments and their fixed display properties.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RadarError;

/// A `(min, max)` pair used for value ranges and lat/lon bounds.
///
/// No ordering is enforced: `min > max` is carried through as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the span (negative when min > max).
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Clip a value into the span, saturating at the ends.
    pub fn clip(&self, value: f64) -> f64 {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        value.max(lo).min(hi)
    }

    /// Position of a value within the span, 0.0 at `min` and 1.0 at `max`.
    pub fn normalize(&self, value: f64) -> f64 {
        let width = self.width();
        if width.abs() < f64::EPSILON {
            return 0.0;
        }
        ((value - self.min) / width).clamp(0.0, 1.0)
    }
}

impl FromStr for Span {
    type Err = RadarError;

    /// Parse `"min,max"` (whitespace around either number is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(RadarError::InvalidSpan(s.to_string()));
        }

        let min = parts[0]
            .parse()
            .map_err(|_| RadarError::InvalidSpan(s.to_string()))?;
        let max = parts[1]
            .parse()
            .map_err(|_| RadarError::InvalidSpan(s.to_string()))?;

        Ok(Self { min, max })
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.min, self.max)
    }
}

/// The radar moments this tool knows how to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadarField {
    Reflectivity,
    Velocity,
    DifferentialReflectivity,
    CrossCorrelationRatio,
    SpectrumWidth,
    DifferentialPhase,
}

/// Fixed display properties of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Sweep index the moment is taken from. NEXRAD split cuts record
    /// velocity and spectrum width on the second sweep of the lowest tilt.
    pub sweep: usize,
    /// Colorbar label.
    pub units: &'static str,
    /// Value range used when the caller gives none.
    pub default_range: Span,
}

impl RadarField {
    pub const ALL: [RadarField; 6] = [
        RadarField::Reflectivity,
        RadarField::Velocity,
        RadarField::DifferentialReflectivity,
        RadarField::CrossCorrelationRatio,
        RadarField::SpectrumWidth,
        RadarField::DifferentialPhase,
    ];

    /// Canonical field name, as used on the command line and in panel titles.
    pub fn name(&self) -> &'static str {
        match self {
            RadarField::Reflectivity => "reflectivity",
            RadarField::Velocity => "velocity",
            RadarField::DifferentialReflectivity => "differential_reflectivity",
            RadarField::CrossCorrelationRatio => "cross_correlation_ratio",
            RadarField::SpectrumWidth => "spectrum_width",
            RadarField::DifferentialPhase => "differential_phase",
        }
    }

    /// Fixed sweep, unit label and default range for this field.
    pub fn spec(&self) -> FieldSpec {
        match self {
            RadarField::Reflectivity => FieldSpec {
                sweep: 0,
                units: "Z (dBZ)",
                default_range: Span::new(0.0, 64.0),
            },
            RadarField::Velocity => FieldSpec {
                sweep: 1,
                units: "Vr (m/s)",
                default_range: Span::new(-20.0, 20.0),
            },
            RadarField::DifferentialReflectivity => FieldSpec {
                sweep: 0,
                units: "Zdr (dB)",
                default_range: Span::new(-8.0, 8.0),
            },
            RadarField::CrossCorrelationRatio => FieldSpec {
                sweep: 0,
                units: "RhoHV (ratio)",
                default_range: Span::new(0.5, 1.0),
            },
            RadarField::SpectrumWidth => FieldSpec {
                sweep: 1,
                units: "Knots",
                default_range: Span::new(0.0, 20.0),
            },
            RadarField::DifferentialPhase => FieldSpec {
                sweep: 0,
                units: "PhiDP (deg)",
                default_range: Span::new(0.0, 360.0),
            },
        }
    }

    /// Variable names this moment goes by in CF/Radial files.
    ///
    /// The first entry is the Py-ART name, the rest are Radx/NEXRAD short names.
    pub fn cfradial_names(&self) -> &'static [&'static str] {
        match self {
            RadarField::Reflectivity => &["reflectivity", "REF", "DBZ"],
            RadarField::Velocity => &["velocity", "VEL"],
            RadarField::DifferentialReflectivity => &["differential_reflectivity", "ZDR"],
            RadarField::CrossCorrelationRatio => &["cross_correlation_ratio", "RHO", "RHOHV"],
            RadarField::SpectrumWidth => &["spectrum_width", "SW", "WIDTH"],
            RadarField::DifferentialPhase => &["differential_phase", "PHI", "PHIDP"],
        }
    }
}

impl FromStr for RadarField {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        RadarField::ALL
            .into_iter()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| RadarError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for RadarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
