//! Frame output: numbered PNG files or an interactive preview.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::RgbaImage;
use renderer::write_png;
use tracing::{info, warn};

use crate::error::{PlotError, PlotResult};

/// Viewer used in display mode. ImageMagick's `display` stays in the
/// foreground until its window is closed.
pub const DEFAULT_VIEWER: &str = "display";

/// File name of frame `index`: `img_000.png`, `img_001.png`, ...
pub fn frame_name(index: usize) -> String {
    format!("img_{:03}.png", index)
}

/// Destination for rendered figures.
pub trait FrameSink {
    /// Emit the figure for input `index`. `label` identifies the scan, e.g.
    /// `KIWX_20161022_T185819`. Returns the file written, if any.
    fn emit(&mut self, index: usize, label: &str, frame: &RgbaImage) -> PlotResult<Option<PathBuf>>;
}

/// Writes frames as `img_NNN.png` into a directory, ready for the looper.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `dir`, created if missing.
    pub fn new(dir: impl Into<PathBuf>) -> PlotResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FrameSink for DirectorySink {
    fn emit(&mut self, index: usize, label: &str, frame: &RgbaImage) -> PlotResult<Option<PathBuf>> {
        let path = self.dir.join(frame_name(index));
        write_png(&path, frame)?;
        info!(index, scan = label, file = %path.display(), "Saved frame");
        Ok(Some(path))
    }
}

/// Shows each frame in an external viewer and waits for it to exit.
///
/// The viewer must run in the foreground for this to pause between frames;
/// launchers such as `xdg-open` return immediately. Previews stay in the
/// preview directory so a detached viewer can still read them.
#[derive(Debug, Clone)]
pub struct ViewerSink {
    program: String,
    preview_dir: PathBuf,
}

impl ViewerSink {
    /// Previews go to `radar-plot/` under the system temp directory.
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_preview_dir(program, std::env::temp_dir().join("radar-plot"))
    }

    pub fn with_preview_dir(program: impl Into<String>, preview_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            preview_dir: preview_dir.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl FrameSink for ViewerSink {
    fn emit(&mut self, index: usize, label: &str, frame: &RgbaImage) -> PlotResult<Option<PathBuf>> {
        std::fs::create_dir_all(&self.preview_dir)?;
        let path = self.preview_dir.join(format!("{}.png", label));
        write_png(&path, frame)?;

        info!(index, scan = label, viewer = %self.program, "Showing figure");
        let status = match Command::new(&self.program).arg(&path).status() {
            Ok(status) => status,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PlotError::ViewerNotFound {
                    program: self.program.clone(),
                })
            }
            Err(e) => return Err(PlotError::Io(e)),
        };
        if !status.success() {
            warn!(viewer = %self.program, %status, "Viewer exited with an error");
        }
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn frame() -> RgbaImage {
        RgbaImage::from_pixel(8, 6, Rgba([10, 20, 30, 255]))
    }

    #[test]
    fn test_frame_names() {
        assert_eq!(frame_name(0), "img_000.png");
        assert_eq!(frame_name(11), "img_011.png");
        assert_eq!(frame_name(123), "img_123.png");
    }

    #[test]
    fn test_directory_sink_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("frames/kiwx");
        let mut sink = DirectorySink::new(&dir).unwrap();

        let path = sink.emit(3, "KIWX_20161022_T185819", &frame()).unwrap();
        assert_eq!(path, Some(dir.join("img_003.png")));
        assert!(dir.join("img_003.png").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_viewer_sink_writes_preview() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = ViewerSink::with_preview_dir("true", tmp.path());
        let preview = sink.emit(0, "KIWX_20161022_T185819", &frame()).unwrap();
        assert_eq!(preview, Some(tmp.path().join("KIWX_20161022_T185819.png")));
    }

    #[cfg(unix)]
    #[test]
    fn test_viewer_sink_waits_for_the_viewer() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let marker = tmp.path().join("closed");
        let viewer = tmp.path().join("slow-viewer");
        std::fs::write(
            &viewer,
            format!("#!/bin/sh\nsleep 0.3\necho \"$1\" > '{}'\n", marker.display()),
        )
        .unwrap();
        let mut perms = std::fs::metadata(&viewer).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&viewer, perms).unwrap();

        let mut sink =
            ViewerSink::with_preview_dir(viewer.to_string_lossy(), tmp.path().join("preview"));
        let preview = sink.emit(0, "KIWX_20161022_T185819", &frame()).unwrap().unwrap();

        let shown = std::fs::read_to_string(&marker).unwrap();
        assert_eq!(shown.trim(), preview.display().to_string());
    }

    #[test]
    fn test_missing_viewer() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = ViewerSink::with_preview_dir("no-such-viewer-xyz", tmp.path());
        let err = sink.emit(0, "scan", &frame()).unwrap_err();
        assert!(matches!(err, PlotError::ViewerNotFound { .. }));
    }
}
