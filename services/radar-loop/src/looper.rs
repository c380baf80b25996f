//! Frame looper: pick a frame directory and hand it to the encoder.

use std::path::PathBuf;

use radar_common::Chooser;
use tracing::{info, warn};

use crate::encoder::{count_frames, EncodeOutcome, EncoderInvocation, FrameEncoder};
use crate::error::{LoopError, LoopResult};

pub const DIRECTORY_DIALOG_TITLE: &str = "Select directory";

/// Which directory holds the frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopTarget {
    Directory(PathBuf),
    /// Ask the user with a directory dialog
    Pick,
}

impl LoopTarget {
    /// An empty argument opens the dialog.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some(dir) if !dir.trim().is_empty() => LoopTarget::Directory(PathBuf::from(dir)),
            _ => LoopTarget::Pick,
        }
    }
}

pub struct FrameLooper<'a> {
    chooser: &'a dyn Chooser,
    encoder: &'a dyn FrameEncoder,
}

impl<'a> FrameLooper<'a> {
    pub fn new(chooser: &'a dyn Chooser, encoder: &'a dyn FrameEncoder) -> Self {
        Self { chooser, encoder }
    }

    /// Encode the frames in `target`. Returns `None` when the dialog is cancelled.
    pub fn run(&self, target: &LoopTarget, fps: &str, output: &str) -> LoopResult<Option<EncodeOutcome>> {
        let dir = match target {
            LoopTarget::Directory(dir) => dir.clone(),
            LoopTarget::Pick => match self.chooser.pick_directory(DIRECTORY_DIALOG_TITLE)? {
                Some(dir) => dir,
                None => {
                    warn!("Directory selection cancelled, nothing to do");
                    return Ok(None);
                }
            },
        };
        if !dir.is_dir() {
            return Err(LoopError::NotADirectory(dir));
        }

        let frames = count_frames(&dir);
        if frames == 0 {
            warn!(dir = %dir.display(), "No img_NNN.png frames found");
        } else {
            info!(dir = %dir.display(), frames, "Looping frames");
        }

        let invocation = EncoderInvocation::new(dir)
            .with_fps(fps)
            .with_output(output);
        self.encoder.encode(&invocation).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_argument_picks() {
        assert_eq!(LoopTarget::from_arg(None), LoopTarget::Pick);
        assert_eq!(LoopTarget::from_arg(Some("")), LoopTarget::Pick);
        assert_eq!(
            LoopTarget::from_arg(Some("/frames")),
            LoopTarget::Directory(PathBuf::from("/frames"))
        );
    }
}
