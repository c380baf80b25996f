//! Reading NEXRAD Level-2 archives into radar volumes.
//!
//! Decoding is done in two steps. An external radar toolkit converts the
//! archive into a CF/Radial file in a scratch directory, then the file is
//! read natively with the `netcdf` library.
//!
//! # Implementation Notes
//!
//! Native reading needs libnetcdf and libhdf5 on the build host. It is the
//! default `netcdf` cargo feature; a build with `--no-default-features`
//! compiles without those libraries, and [`ToolkitReader`] then reports
//! [`VolumeIoError::Unsupported`] instead of running the converter.

#[cfg(feature = "netcdf")]
pub mod cfradial;
pub mod convert;
pub mod error;

use std::path::{Path, PathBuf};

use radar_common::{RadarResult, RadarVolume, VolumeReader};
use tracing::info;

pub use convert::{scratch_dir, ConverterCommand, ScratchFile, PYART_SCRIPT};
pub use error::{VolumeIoError, VolumeIoResult};

/// Volume reader backed by an external converter and native CF/Radial reading.
#[derive(Debug, Clone)]
pub struct ToolkitReader {
    converter: ConverterCommand,
    scratch_dir: PathBuf,
}

impl Default for ToolkitReader {
    fn default() -> Self {
        Self::new(ConverterCommand::default())
    }
}

impl ToolkitReader {
    pub fn new(converter: ConverterCommand) -> Self {
        Self {
            converter,
            scratch_dir: scratch_dir(),
        }
    }

    /// Write converted volumes to `dir` instead of the default scratch directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn converter(&self) -> &ConverterCommand {
        &self.converter
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Whether `path` must go through the converter. CF/Radial files are read as is.
    pub fn needs_conversion(path: &Path) -> bool {
        !path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("nc"))
    }

    /// Decode one archive.
    pub fn read_volume(&self, path: &Path) -> VolumeIoResult<RadarVolume> {
        if !path.exists() {
            return Err(VolumeIoError::InputNotFound(path.to_path_buf()));
        }
        if !cfg!(feature = "netcdf") {
            return Err(VolumeIoError::Unsupported(
                "CF/Radial reading was compiled out, rebuild with the netcdf feature".to_string(),
            ));
        }

        info!(file = %path.display(), "Reading volume");
        if Self::needs_conversion(path) {
            let scratch = ScratchFile::new(&self.scratch_dir);
            self.converter.run(path, scratch.path())?;
            read_native(scratch.path())
        } else {
            read_native(path)
        }
    }
}

impl VolumeReader for ToolkitReader {
    fn read(&self, path: &Path) -> RadarResult<RadarVolume> {
        Ok(self.read_volume(path)?)
    }
}

#[cfg(feature = "netcdf")]
fn read_native(path: &Path) -> VolumeIoResult<RadarVolume> {
    cfradial::read_cfradial(path)
}

#[cfg(not(feature = "netcdf"))]
fn read_native(_path: &Path) -> VolumeIoResult<RadarVolume> {
    Err(VolumeIoError::Unsupported(
        "CF/Radial reading was compiled out, rebuild with the netcdf feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_conversion() {
        assert!(ToolkitReader::needs_conversion(Path::new("KIWX20161022_185819_V06")));
        assert!(ToolkitReader::needs_conversion(Path::new("KIWX20161022_185819_V06.gz")));
        assert!(!ToolkitReader::needs_conversion(Path::new("cfrad.20161022.nc")));
        assert!(!ToolkitReader::needs_conversion(Path::new("VOLUME.NC")));
    }

    #[test]
    fn test_missing_input() {
        let reader = ToolkitReader::default();
        let err = reader
            .read_volume(Path::new("/nonexistent/KIWX20161022_185819_V06"))
            .unwrap_err();
        assert!(matches!(err, VolumeIoError::InputNotFound(_)));
    }

    #[cfg(feature = "netcdf")]
    #[test]
    fn test_cfradial_input_is_read_natively() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cfrad.20161022_185819.KIWX.nc");
        std::fs::write(&input, b"not netcdf").unwrap();

        let err = ToolkitReader::default().read_volume(&input).unwrap_err();
        assert!(matches!(err, VolumeIoError::InvalidFormat(_)));
    }

    #[cfg(not(feature = "netcdf"))]
    #[test]
    fn test_reading_without_backend_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("KIWX20161022_185819_V06");
        std::fs::write(&archive, b"AR2V0006").unwrap();

        let err = ToolkitReader::default().read_volume(&archive).unwrap_err();
        assert!(matches!(err, VolumeIoError::Unsupported(_)));
    }
}
