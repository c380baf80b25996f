//! Native CF/Radial reading using the netcdf library.
//!
//! CF/Radial stores every ray of every sweep as one row of a `time × range`
//! matrix. Sweeps are delimited by `sweep_start_ray_index` and
//! `sweep_end_ray_index`, both inclusive.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Once;

use radar_common::{RadarField, RadarVolume, SweepRays};
use tracing::{debug, info};

use crate::error::{VolumeIoError, VolumeIoResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// Probing optional attributes such as `_FillValue` makes the HDF5 C library
/// print diagnostics even though the miss is handled here. Only the first call
/// has an effect.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and null handlers are a
        // documented way to disable error output.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Read a CF/Radial file into a [`RadarVolume`].
pub fn read_cfradial(path: &Path) -> VolumeIoResult<RadarVolume> {
    silence_hdf5_errors();

    let file = netcdf::open(path)
        .map_err(|e| VolumeIoError::InvalidFormat(format!("Failed to open CF/Radial: {}", e)))?;

    let time_var = require_variable(&file, "time")?;
    let time_units = get_string_attr(&time_var, "units")
        .ok_or_else(|| VolumeIoError::MissingData("time:units attribute".to_string()))?;

    let latitude = read_scalar(&file, "latitude")?;
    let longitude = read_scalar(&file, "longitude")?;
    let altitude = read_scalar(&file, "altitude").unwrap_or(0.0);

    let ranges = read_f32(&file, "range")?;
    let azimuths = read_f32(&file, "azimuth")?;
    let elevations = read_f32(&file, "elevation")?;

    let starts = read_indices(&file, "sweep_start_ray_index")?;
    let ends = read_indices(&file, "sweep_end_ray_index")?;
    if starts.len() != ends.len() {
        return Err(VolumeIoError::InvalidFormat(format!(
            "{} sweep starts but {} sweep ends",
            starts.len(),
            ends.len()
        )));
    }
    let sweeps = starts
        .into_iter()
        .zip(ends)
        .map(|(start_ray, end_ray)| SweepRays { start_ray, end_ray })
        .collect();

    let mut moments = HashMap::new();
    for field in RadarField::ALL {
        let Some((name, var)) = field
            .cfradial_names()
            .iter()
            .find_map(|name| file.variable(name).map(|v| (*name, v)))
        else {
            debug!(field = %field, "Moment not present");
            continue;
        };
        let values = read_moment(&var, name)?;
        moments.insert(field, values);
    }

    let volume = RadarVolume {
        time_units,
        latitude,
        longitude,
        altitude,
        ranges,
        azimuths,
        elevations,
        sweeps,
        moments,
    };
    volume
        .validate()
        .map_err(|e| VolumeIoError::InvalidFormat(e.to_string()))?;

    info!(
        file = %path.display(),
        sweeps = volume.sweeps.len(),
        rays = volume.ray_count(),
        gates = volume.gate_count(),
        moments = volume.moments.len(),
        "Read CF/Radial volume"
    );
    Ok(volume)
}

// =============================================================================
// Internal helpers
// =============================================================================

fn require_variable<'f>(file: &'f netcdf::File, name: &str) -> VolumeIoResult<netcdf::Variable<'f>> {
    file.variable(name)
        .ok_or_else(|| VolumeIoError::MissingData(format!("{} variable", name)))
}

fn read_f32(file: &netcdf::File, name: &str) -> VolumeIoResult<Vec<f32>> {
    require_variable(file, name)?
        .get_values::<f32, _>(..)
        .map_err(|e| VolumeIoError::InvalidFormat(format!("Failed to read {}: {}", name, e)))
}

fn read_scalar(file: &netcdf::File, name: &str) -> VolumeIoResult<f64> {
    let values: Vec<f64> = require_variable(file, name)?
        .get_values(..)
        .map_err(|e| VolumeIoError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
    values
        .first()
        .copied()
        .ok_or_else(|| VolumeIoError::MissingData(format!("{} value", name)))
}

fn read_indices(file: &netcdf::File, name: &str) -> VolumeIoResult<Vec<usize>> {
    let values: Vec<i32> = require_variable(file, name)?
        .get_values(..)
        .map_err(|e| VolumeIoError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
    values
        .into_iter()
        .map(|v| {
            usize::try_from(v).map_err(|_| {
                VolumeIoError::InvalidFormat(format!("negative ray index {} in {}", v, name))
            })
        })
        .collect()
}

/// Read a moment, unpacking scale/offset and mapping fill values to NaN.
fn read_moment(var: &netcdf::Variable, name: &str) -> VolumeIoResult<Vec<f32>> {
    let raw: Vec<f32> = var
        .get_values(..)
        .map_err(|e| VolumeIoError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;

    let scale_factor = get_f32_attr(var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f32_attr(var, "add_offset").unwrap_or(0.0);
    let fill_value = get_f32_attr(var, "_FillValue").or_else(|| get_f32_attr(var, "missing_value"));

    Ok(unpack(&raw, scale_factor, add_offset, fill_value))
}

pub(crate) fn unpack(raw: &[f32], scale: f32, offset: f32, fill: Option<f32>) -> Vec<f32> {
    raw.iter()
        .map(|&val| {
            if fill == Some(val) || val.is_nan() {
                f32::NAN
            } else {
                val * scale + offset
            }
        })
        .collect()
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f32_attr(var: &netcdf::Variable, name: &str) -> Option<f32> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f32::try_from(attr_value).ok()
}

fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        netcdf::AttributeValue::Strs(mut s) if !s.is_empty() => Some(s.swap_remove(0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_applies_scale_offset_and_fill() {
        let values = unpack(&[10.0, -9999.0, 0.0], 0.5, 2.0, Some(-9999.0));
        assert_eq!(values[0], 7.0);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 2.0);
    }

    #[test]
    fn test_unpack_without_fill() {
        let values = unpack(&[1.0, f32::NAN], 1.0, 0.0, None);
        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan());
    }
}
