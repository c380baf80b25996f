//! Video encoding of numbered frames.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{LoopError, LoopResult};

/// Frame name pattern passed to the encoder, matching `img_000.png`...
pub const FRAME_PATTERN: &str = "img_%3d.png";
/// Number of the first frame.
pub const START_NUMBER: &str = "000";
pub const DEFAULT_OUTPUT: &str = "output.avi";
pub const DEFAULT_FPS: &str = "1";

/// One encoder run over a frame directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderInvocation {
    /// Frame directory, also the encoder's working directory
    pub dir: PathBuf,
    /// Frame rate, passed through as given
    pub fps: String,
    /// Output file name, relative to `dir` unless absolute
    pub output: String,
}

impl EncoderInvocation {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fps: DEFAULT_FPS.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
        }
    }

    pub fn with_fps(mut self, fps: impl Into<String>) -> Self {
        self.fps = fps.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// `-r <fps> -f image2 -start_number 000 -i img_%3d.png <output>`
    pub fn args(&self) -> Vec<String> {
        vec![
            "-r".to_string(),
            self.fps.clone(),
            "-f".to_string(),
            "image2".to_string(),
            "-start_number".to_string(),
            START_NUMBER.to_string(),
            "-i".to_string(),
            FRAME_PATTERN.to_string(),
            self.output.clone(),
        ]
    }

    /// Where the video ends up.
    pub fn output_path(&self) -> PathBuf {
        self.dir.join(&self.output)
    }
}

/// Result of a successful encoder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutcome {
    /// Exit code of the encoder process
    pub code: i32,
    pub output: PathBuf,
}

/// Something that turns a directory of numbered frames into a video.
pub trait FrameEncoder {
    fn encode(&self, invocation: &EncoderInvocation) -> LoopResult<EncodeOutcome>;
}

/// Runs `ffmpeg` (or a compatible program) and waits for it to finish.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: String,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl FrameEncoder for FfmpegEncoder {
    fn encode(&self, invocation: &EncoderInvocation) -> LoopResult<EncodeOutcome> {
        let args = invocation.args();
        debug!(program = %self.program, dir = %invocation.dir.display(), ?args, "Running encoder");

        let status = Command::new(&self.program)
            .args(&args)
            .current_dir(&invocation.dir)
            .status();
        let status = match status {
            Ok(status) => status,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LoopError::EncoderNotFound {
                    program: self.program.clone(),
                })
            }
            Err(e) => return Err(LoopError::Io(e)),
        };

        match status.code() {
            Some(0) => {
                let output = invocation.output_path();
                info!(output = %output.display(), "Encoded video");
                Ok(EncodeOutcome { code: 0, output })
            }
            code => Err(LoopError::EncoderFailed {
                program: self.program.clone(),
                code,
            }),
        }
    }
}

/// Count `img_NNN.png` files directly inside `dir`.
pub fn count_frames(dir: &Path) -> usize {
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_frame_name(&entry.file_name().to_string_lossy()))
        .count()
}

fn is_frame_name(name: &str) -> bool {
    name.strip_prefix("img_")
        .and_then(|rest| rest.strip_suffix(".png"))
        .is_some_and(|digits| digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_invocation() {
        let inv = EncoderInvocation::new("/frames");
        assert_eq!(
            inv.args(),
            vec!["-r", "1", "-f", "image2", "-start_number", "000", "-i", "img_%3d.png", "output.avi"]
        );
        assert_eq!(inv.output_path(), PathBuf::from("/frames/output.avi"));
    }

    #[test]
    fn test_frame_names() {
        assert!(is_frame_name("img_000.png"));
        assert!(is_frame_name("img_011.png"));
        assert!(!is_frame_name("img_0001.png"));
        assert!(!is_frame_name("img_abc.png"));
        assert!(!is_frame_name("KIWX_20161022_T185819.png"));
    }

    #[test]
    fn test_count_frames_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["img_000.png", "img_001.png", "notes.txt", "output.avi"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("img_002.png")).unwrap();
        assert_eq!(count_frames(dir.path()), 2);
    }

    #[test]
    fn test_missing_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let err = FfmpegEncoder::new("no-such-encoder-xyz")
            .encode(&EncoderInvocation::new(dir.path()))
            .unwrap_err();
        assert!(matches!(err, LoopError::EncoderNotFound { .. }));
    }
}
