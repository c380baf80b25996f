//! What to plot: fields, ranges, extent and per-field overrides.

use std::collections::HashMap;

use radar_common::{DisplayRanges, ExtentRequest, RadarError, RadarField, RangeOverrides};
use renderer::{Colormap, PanelSpec};

use crate::error::{PlotError, PlotResult};

/// Parameters shared by every file of one invocation.
#[derive(Debug, Clone, Default)]
pub struct PlotRequest {
    /// One panel per field, in this order
    pub fields: Vec<RadarField>,
    pub ranges: RangeOverrides,
    pub extent: ExtentRequest,
    /// Sweep index per field, replacing the field's fixed sweep
    pub sweeps: HashMap<RadarField, usize>,
    /// Colormap per field, replacing the field's default ramp
    pub colormaps: HashMap<RadarField, Colormap>,
}

impl PlotRequest {
    pub fn new(fields: Vec<RadarField>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Panel specs with resolved ranges and overrides applied.
    pub fn panels(&self) -> PlotResult<Vec<PanelSpec>> {
        if self.fields.is_empty() {
            return Err(PlotError::NoFields);
        }

        let ranges = DisplayRanges::resolve(&self.ranges);
        Ok(self
            .fields
            .iter()
            .map(|&field| {
                let mut panel = PanelSpec::new(field, ranges.get(field));
                if let Some(&sweep) = self.sweeps.get(&field) {
                    panel = panel.with_sweep(sweep);
                }
                if let Some(colormap) = self.colormaps.get(&field) {
                    panel = panel.with_colormap(colormap.clone());
                }
                panel
            })
            .collect())
    }
}

/// Split `FIELD=VALUE`, validating the field name.
pub fn parse_assignment(arg: &str) -> PlotResult<(RadarField, &str)> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| PlotError::InvalidAssignment(arg.to_string()))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(PlotError::InvalidAssignment(arg.to_string()));
    }
    Ok((field.parse()?, value))
}

/// Parse `--sweep velocity=3` style arguments.
pub fn parse_sweep_overrides(args: &[String]) -> PlotResult<HashMap<RadarField, usize>> {
    args.iter()
        .map(|arg| {
            let (field, value) = parse_assignment(arg)?;
            let sweep = value.parse().map_err(|_| RadarError::InvalidParameter {
                param: "sweep".to_string(),
                message: format!("'{}' is not a sweep index", value),
            })?;
            Ok((field, sweep))
        })
        .collect()
}

/// Parse `--colormap reflectivity=grayscale` style arguments.
pub fn parse_colormap_overrides(args: &[String]) -> PlotResult<HashMap<RadarField, Colormap>> {
    args.iter()
        .map(|arg| {
            let (field, name) = parse_assignment(arg)?;
            Ok((field, Colormap::named(name)?))
        })
        .collect()
}
