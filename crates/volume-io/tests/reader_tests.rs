//! Tests for archive conversion and volume reading.

use std::path::Path;

use radar_common::{RadarError, VolumeReader};
use test_utils::temp_test_dir;
use volume_io::{ConverterCommand, ToolkitReader, VolumeIoError};

// ============================================================================
// Converter
// ============================================================================

#[cfg(unix)]
#[test]
fn test_converter_receives_input_and_output() {
    let dir = temp_test_dir();
    let input = dir.path().join("KIWX20161022_185819_V06");
    std::fs::write(&input, b"AR2V0006").unwrap();
    let output = dir.path().join("out.nc");

    // copies the archive so the output path is known to have been passed through
    let cmd = ConverterCommand::new(
        "sh",
        vec![
            "-c".to_string(),
            "cp \"$0\" \"$1\"".to_string(),
            "{input}".to_string(),
            "{output}".to_string(),
        ],
    );
    cmd.run(&input, &output).unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), b"AR2V0006");
}

#[cfg(unix)]
#[test]
fn test_converter_without_output_fails() {
    let dir = temp_test_dir();
    let cmd = ConverterCommand::new("true", vec![]);
    let err = cmd
        .run(Path::new("/in"), &dir.path().join("never.nc"))
        .unwrap_err();
    assert!(matches!(err, VolumeIoError::Conversion { .. }));
}

#[test]
fn test_converter_config_deserializes() {
    let json = r#"{"program": "RadxConvert", "args": ["-f", "{input}"]}"#;
    let cmd: ConverterCommand = serde_json::from_str(json).unwrap();
    assert_eq!(cmd.program, "RadxConvert");
    assert_eq!(cmd.args, vec!["-f", "{input}"]);

    let bare: ConverterCommand = serde_json::from_str(r#"{"program": "convert-l2"}"#).unwrap();
    assert!(bare.args.is_empty());
}

// ============================================================================
// Reader
// ============================================================================

#[test]
fn test_read_errors_become_radar_errors() {
    let reader = ToolkitReader::default();
    let err = reader
        .read(Path::new("/nonexistent/KIWX20161022_185819_V06"))
        .unwrap_err();
    assert!(matches!(err, RadarError::VolumeReadError(_)));
}

#[cfg(feature = "netcdf")]
#[test]
fn test_read_real_archive() {
    use radar_common::{RadarField, ScanTime};
    use test_utils::{assert_approx_eq, kiwx, require_test_file};

    let path = require_test_file!("KIWX20161022_185819_V06");
    let volume = ToolkitReader::default().read_volume(&path).unwrap();

    assert_approx_eq!(volume.latitude, kiwx::LAT, 0.01);
    assert_approx_eq!(volume.longitude, kiwx::LON, 0.01);
    assert!(volume.has_moment(RadarField::Reflectivity));
    assert!(volume.sweeps.len() > 1);

    let scan = ScanTime::from_units(&volume.time_units).unwrap();
    assert_eq!(scan.scan_id(), kiwx::SCAN_ID);
}
