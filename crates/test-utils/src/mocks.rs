//! Test doubles for the volume reader and the file chooser.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use radar_common::{
    Chooser, FileRequest, RadarError, RadarResult, RadarVolume, VolumeReader,
};

/// Reader that hands out clones of a fixed volume and records every path.
pub struct MockReader {
    volume: RadarVolume,
    overrides: HashMap<PathBuf, RadarVolume>,
    fail_on: Option<PathBuf>,
    reads: Mutex<Vec<PathBuf>>,
}

impl MockReader {
    pub fn new(volume: RadarVolume) -> Self {
        Self {
            volume,
            overrides: HashMap::new(),
            fail_on: None,
            reads: Mutex::new(Vec::new()),
        }
    }

    /// Return `volume` for `path` instead of the default one.
    pub fn with_volume_for(mut self, path: impl Into<PathBuf>, volume: RadarVolume) -> Self {
        self.overrides.insert(path.into(), volume);
        self
    }

    /// Fail with `VolumeReadError` when asked for `path`.
    pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_on = Some(path.into());
        self
    }

    /// Paths read so far, in order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl VolumeReader for MockReader {
    fn read(&self, path: &Path) -> RadarResult<RadarVolume> {
        if let Ok(mut reads) = self.reads.lock() {
            reads.push(path.to_path_buf());
        }
        if self.fail_on.as_deref() == Some(path) {
            return Err(RadarError::VolumeReadError(format!(
                "mock failure for {}",
                path.display()
            )));
        }
        Ok(self
            .overrides
            .get(path)
            .unwrap_or(&self.volume)
            .clone())
    }
}

/// One scripted dialog outcome.
#[derive(Debug, Clone)]
pub enum ChooserReply {
    Files(Vec<PathBuf>),
    Directory(PathBuf),
    Cancel,
    Fail(String),
}

/// Chooser that replays scripted replies and counts the dialogs opened.
#[derive(Default)]
pub struct ScriptedChooser {
    replies: Mutex<VecDeque<ChooserReply>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedChooser {
    pub fn new(replies: impl IntoIterator<Item = ChooserReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Chooser whose every dialog is cancelled.
    pub fn cancelling() -> Self {
        Self::new([ChooserReply::Cancel])
    }

    /// Titles of the dialogs opened so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn dialogs_opened(&self) -> usize {
        self.requests().len()
    }

    fn next(&self, title: &str) -> ChooserReply {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(title.to_string());
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .unwrap_or(ChooserReply::Cancel)
    }
}

impl Chooser for ScriptedChooser {
    fn pick_files(&self, request: &FileRequest) -> RadarResult<Vec<PathBuf>> {
        match self.next(&request.title) {
            ChooserReply::Files(files) => Ok(files),
            ChooserReply::Directory(dir) => Ok(vec![dir]),
            ChooserReply::Cancel => Ok(Vec::new()),
            ChooserReply::Fail(msg) => Err(RadarError::ChooserError(msg)),
        }
    }

    fn pick_directory(&self, title: &str) -> RadarResult<Option<PathBuf>> {
        match self.next(title) {
            ChooserReply::Directory(dir) => Ok(Some(dir)),
            ChooserReply::Files(files) => Ok(files.into_iter().next()),
            ChooserReply::Cancel => Ok(None),
            ChooserReply::Fail(msg) => Err(RadarError::ChooserError(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_uniform_volume;
    use radar_common::RadarField;

    #[test]
    fn test_mock_reader_records_paths() {
        let reader = MockReader::new(create_uniform_volume(RadarField::Reflectivity, 20.0))
            .failing_on("/bad");
        assert!(reader.read(Path::new("/a")).is_ok());
        assert!(reader.read(Path::new("/bad")).is_err());
        assert_eq!(reader.reads(), vec![PathBuf::from("/a"), PathBuf::from("/bad")]);
    }

    #[test]
    fn test_scripted_chooser_replays_then_cancels() {
        let chooser = ScriptedChooser::new([ChooserReply::Directory(PathBuf::from("/frames"))]);
        assert_eq!(
            chooser.pick_directory("Select directory").unwrap(),
            Some(PathBuf::from("/frames"))
        );
        assert_eq!(chooser.pick_directory("Select directory").unwrap(), None);
        assert_eq!(chooser.dialogs_opened(), 2);
    }
}
