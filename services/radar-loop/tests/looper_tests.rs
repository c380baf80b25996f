//! Tests for the frame looper and the ffmpeg encoder.

use std::path::PathBuf;
use std::sync::Mutex;

use radar_common::RadarError;
use radar_loop::{
    EncodeOutcome, EncoderInvocation, FrameEncoder, FrameLooper, LoopError, LoopResult, LoopTarget,
};
use test_utils::{
    temp_test_dir, temp_test_dir_with_prefix, write_numbered_frames, ChooserReply, ScriptedChooser,
};

// ============================================================================
// Helper functions
// ============================================================================

/// Encoder that records its invocations instead of running anything.
#[derive(Default)]
struct RecordingEncoder {
    calls: Mutex<Vec<EncoderInvocation>>,
}

impl RecordingEncoder {
    fn calls(&self) -> Vec<EncoderInvocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl FrameEncoder for RecordingEncoder {
    fn encode(&self, invocation: &EncoderInvocation) -> LoopResult<EncodeOutcome> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(EncodeOutcome {
            code: 0,
            output: invocation.output_path(),
        })
    }
}

/// Write an executable shell script standing in for ffmpeg.
#[cfg(unix)]
fn fake_encoder(dir: &std::path::Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ffmpeg");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

// ============================================================================
// Looper
// ============================================================================

#[test]
fn test_explicit_directory_is_encoded() {
    let frames = temp_test_dir();
    write_numbered_frames(frames.path(), 3);
    let chooser = ScriptedChooser::cancelling();
    let encoder = RecordingEncoder::default();

    let outcome = FrameLooper::new(&chooser, &encoder)
        .run(
            &LoopTarget::Directory(frames.path().to_path_buf()),
            "2",
            "clip.avi",
        )
        .unwrap()
        .unwrap();

    assert_eq!(outcome.output, frames.path().join("clip.avi"));
    assert_eq!(chooser.dialogs_opened(), 0);
    let calls = encoder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].dir, frames.path());
    assert_eq!(calls[0].fps, "2");
    assert_eq!(calls[0].output, "clip.avi");
}

#[test]
fn test_picked_directory_is_encoded() {
    let frames = temp_test_dir();
    let chooser =
        ScriptedChooser::new([ChooserReply::Directory(frames.path().to_path_buf())]);
    let encoder = RecordingEncoder::default();

    FrameLooper::new(&chooser, &encoder)
        .run(&LoopTarget::from_arg(Some("")), "1", "output.avi")
        .unwrap();

    assert_eq!(chooser.requests(), vec!["Select directory".to_string()]);
    assert_eq!(encoder.calls()[0].dir, frames.path());
}

#[test]
fn test_cancelled_dialog_does_nothing() {
    let chooser = ScriptedChooser::cancelling();
    let encoder = RecordingEncoder::default();

    let outcome = FrameLooper::new(&chooser, &encoder)
        .run(&LoopTarget::Pick, "1", "output.avi")
        .unwrap();

    assert_eq!(outcome, None);
    assert!(encoder.calls().is_empty());
}

#[test]
fn test_empty_directory_still_runs_the_encoder() {
    let frames = temp_test_dir();
    let chooser = ScriptedChooser::cancelling();
    let encoder = RecordingEncoder::default();

    FrameLooper::new(&chooser, &encoder)
        .run(&LoopTarget::Directory(frames.path().to_path_buf()), "1", "output.avi")
        .unwrap();
    assert_eq!(encoder.calls().len(), 1);
}

#[test]
fn test_missing_directory() {
    let chooser = ScriptedChooser::cancelling();
    let encoder = RecordingEncoder::default();

    let err = FrameLooper::new(&chooser, &encoder)
        .run(
            &LoopTarget::Directory(PathBuf::from("/nonexistent/frames")),
            "1",
            "output.avi",
        )
        .unwrap_err();
    assert!(matches!(err, LoopError::NotADirectory(_)));
    assert!(encoder.calls().is_empty());
}

#[test]
fn test_chooser_failure() {
    let chooser = ScriptedChooser::new([ChooserReply::Fail("no display".to_string())]);
    let encoder = RecordingEncoder::default();

    let err = FrameLooper::new(&chooser, &encoder)
        .run(&LoopTarget::Pick, "1", "output.avi")
        .unwrap_err();
    assert!(matches!(err, LoopError::Radar(RadarError::ChooserError(_))));
}

// ============================================================================
// ffmpeg process
// ============================================================================

#[cfg(unix)]
#[test]
fn test_encoder_runs_in_the_frame_directory() {
    use radar_loop::FfmpegEncoder;

    let frames = temp_test_dir();
    write_numbered_frames(frames.path(), 2);
    let bin = temp_test_dir_with_prefix("fake_ffmpeg_");
    let log = bin.path().join("calls.log");
    let script = fake_encoder(
        bin.path(),
        &format!("pwd > '{0}'\nprintf '%s\\n' \"$@\" >> '{0}'", log.display()),
    );

    let encoder = FfmpegEncoder::new(script.to_string_lossy());
    let outcome = encoder
        .encode(
            &EncoderInvocation::new(frames.path())
                .with_fps("2")
                .with_output("clip.avi"),
        )
        .unwrap();
    assert_eq!(outcome.code, 0);

    let recorded = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = recorded.lines().collect();
    assert_eq!(
        PathBuf::from(lines[0]).canonicalize().unwrap(),
        frames.path().canonicalize().unwrap()
    );
    assert_eq!(
        &lines[1..],
        &["-r", "2", "-f", "image2", "-start_number", "000", "-i", "img_%3d.png", "clip.avi"]
    );
}

#[cfg(unix)]
#[test]
fn test_encoder_failure_is_reported() {
    use radar_loop::FfmpegEncoder;

    let frames = temp_test_dir();
    let bin = temp_test_dir_with_prefix("fake_ffmpeg_");
    let script = fake_encoder(bin.path(), "exit 3");

    let err = FfmpegEncoder::new(script.to_string_lossy())
        .encode(&EncoderInvocation::new(frames.path()))
        .unwrap_err();
    match err {
        LoopError::EncoderFailed { code, .. } => assert_eq!(code, Some(3)),
        other => panic!("unexpected error: {other}"),
    }
}
