//! Interactive file and directory selection.
//!
//! Dialogs run as a child process (`zenity` by default). The child is owned
//! by a [`ChooserSession`], which kills and reaps it when dropped, so a
//! dialog window never outlives the call that opened it.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::error::{RadarError, RadarResult};

/// Separator zenity puts between multiple selections.
const SELECTION_SEPARATOR: &str = "\n";

/// Filter hint shown in the dialog. Not enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFilter {
    pub label: String,
    pub patterns: Vec<String>,
}

impl FileFilter {
    pub fn new(label: impl Into<String>, patterns: &[&str]) -> Self {
        Self {
            label: label.into(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Parameters for a file selection dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRequest {
    pub title: String,
    pub initial_dir: PathBuf,
    pub filters: Vec<FileFilter>,
    pub multiple: bool,
}

impl FileRequest {
    /// Multi-select dialog for NEXRAD Level-2 archives.
    pub fn radar_archives() -> Self {
        Self {
            title: "Select file".to_string(),
            initial_dir: PathBuf::from("/"),
            filters: vec![
                FileFilter::new("radar files", &["*_V06"]),
                FileFilter::new("all files", &["*"]),
            ],
            multiple: true,
        }
    }
}

/// Something that can ask the user for files or a directory.
///
/// A cancelled dialog is not an error: `pick_files` returns an empty list
/// and `pick_directory` returns `None`.
pub trait Chooser {
    fn pick_files(&self, request: &FileRequest) -> RadarResult<Vec<PathBuf>>;
    fn pick_directory(&self, title: &str) -> RadarResult<Option<PathBuf>>;
}

/// A running dialog process.
pub struct ChooserSession {
    child: Option<Child>,
}

impl ChooserSession {
    /// Spawn the dialog with stdout captured.
    pub fn open(program: &str, args: &[String]) -> RadarResult<Self> {
        debug!(program, ?args, "Opening chooser dialog");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RadarError::ChooserError(format!("failed to start {}: {}", program, e)))?;

        Ok(Self { child: Some(child) })
    }

    /// Wait for the user. `None` means the dialog was cancelled.
    pub fn finish(mut self) -> RadarResult<Option<String>> {
        let child = self
            .child
            .take()
            .ok_or_else(|| RadarError::ChooserError("dialog already finished".to_string()))?;

        let output = child.wait_with_output()?;

        match output.status.code() {
            Some(0) => Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned())),
            // zenity: 1 = cancel or window closed, 5 = timeout
            Some(1) | Some(5) => Ok(None),
            _ => Err(RadarError::ChooserError(format!(
                "dialog exited with {}",
                output.status
            ))),
        }
    }
}

impl Drop for ChooserSession {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// GTK dialogs through the `zenity` command.
#[derive(Debug, Clone)]
pub struct ZenityChooser {
    program: String,
}

impl Default for ZenityChooser {
    fn default() -> Self {
        Self {
            program: "zenity".to_string(),
        }
    }
}

impl ZenityChooser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different dialog binary that speaks zenity's flags.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn file_args(request: &FileRequest) -> Vec<String> {
        let mut args = vec![
            "--file-selection".to_string(),
            format!("--title={}", request.title),
        ];

        let mut start = request.initial_dir.to_string_lossy().into_owned();
        if !start.ends_with('/') {
            start.push('/');
        }
        args.push(format!("--filename={}", start));

        if request.multiple {
            args.push("--multiple".to_string());
            args.push(format!("--separator={}", SELECTION_SEPARATOR));
        }

        for filter in &request.filters {
            args.push(format!(
                "--file-filter={} | {}",
                filter.label,
                filter.patterns.join(" ")
            ));
        }

        args
    }

    pub fn directory_args(title: &str) -> Vec<String> {
        vec![
            "--file-selection".to_string(),
            "--directory".to_string(),
            format!("--title={}", title),
            "--filename=/".to_string(),
        ]
    }
}

/// Split dialog output into paths, dropping blank entries.
fn parse_selection(output: &str) -> Vec<PathBuf> {
    output
        .split(SELECTION_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

impl Chooser for ZenityChooser {
    fn pick_files(&self, request: &FileRequest) -> RadarResult<Vec<PathBuf>> {
        let session = ChooserSession::open(&self.program, &Self::file_args(request))?;
        let selection = session.finish()?;
        Ok(selection.map(|s| parse_selection(&s)).unwrap_or_default())
    }

    fn pick_directory(&self, title: &str) -> RadarResult<Option<PathBuf>> {
        let session = ChooserSession::open(&self.program, &Self::directory_args(title))?;
        let selection = session.finish()?;
        Ok(selection.and_then(|s| parse_selection(&s).into_iter().next()))
    }
}
