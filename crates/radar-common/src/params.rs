//! Display range resolution.

use serde::{Deserialize, Serialize};

use crate::field::{RadarField, Span};

/// Caller-supplied value ranges. `None` means "use the default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeOverrides {
    pub dbz: Option<Span>,
    pub vel: Option<Span>,
    pub zdr: Option<Span>,
    pub cc: Option<Span>,
    pub phidp: Option<Span>,
    pub sw: Option<Span>,
}

impl RangeOverrides {
    /// Override slot for a field.
    pub fn get(&self, field: RadarField) -> Option<Span> {
        match field {
            RadarField::Reflectivity => self.dbz,
            RadarField::Velocity => self.vel,
            RadarField::DifferentialReflectivity => self.zdr,
            RadarField::CrossCorrelationRatio => self.cc,
            RadarField::SpectrumWidth => self.sw,
            RadarField::DifferentialPhase => self.phidp,
        }
    }
}

/// Effective value range per field for one invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRanges {
    pub reflectivity: Span,
    pub velocity: Span,
    pub differential_reflectivity: Span,
    pub cross_correlation_ratio: Span,
    pub spectrum_width: Span,
    pub differential_phase: Span,
}

impl DisplayRanges {
    /// Use each override verbatim, otherwise the field's default.
    ///
    /// Ranges are not validated or clamped; rendering saturates values
    /// against whatever range it is given.
    pub fn resolve(overrides: &RangeOverrides) -> Self {
        let pick = |field: RadarField| overrides.get(field).unwrap_or(field.spec().default_range);

        Self {
            reflectivity: pick(RadarField::Reflectivity),
            velocity: pick(RadarField::Velocity),
            differential_reflectivity: pick(RadarField::DifferentialReflectivity),
            cross_correlation_ratio: pick(RadarField::CrossCorrelationRatio),
            spectrum_width: pick(RadarField::SpectrumWidth),
            differential_phase: pick(RadarField::DifferentialPhase),
        }
    }

    pub fn get(&self, field: RadarField) -> Span {
        match field {
            RadarField::Reflectivity => self.reflectivity,
            RadarField::Velocity => self.velocity,
            RadarField::DifferentialReflectivity => self.differential_reflectivity,
            RadarField::CrossCorrelationRatio => self.cross_correlation_ratio,
            RadarField::SpectrumWidth => self.spectrum_width,
            RadarField::DifferentialPhase => self.differential_phase,
        }
    }
}

impl Default for DisplayRanges {
    fn default() -> Self {
        Self::resolve(&RangeOverrides::default())
    }
}
