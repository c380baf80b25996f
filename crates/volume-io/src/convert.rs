//! External Level-2 to CF/Radial conversion.
//!
//! NEXRAD archives are decoded by an external radar toolkit. The converter
//! is an ordinary command line whose arguments may contain the `{input}`
//! and `{output}` placeholders.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{VolumeIoError, VolumeIoResult};

/// Placeholder replaced by the archive path.
pub const INPUT_PLACEHOLDER: &str = "{input}";
/// Placeholder replaced by the CF/Radial output path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Py-ART script run by the default converter.
pub const PYART_SCRIPT: &str = "import sys, pyart
radar = pyart.io.read_nexrad_archive(sys.argv[1])
pyart.io.write_cfradial(sys.argv[2], radar)";

/// Converter program and its argument template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for ConverterCommand {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec![
                "-c".to_string(),
                PYART_SCRIPT.to_string(),
                INPUT_PLACEHOLDER.to_string(),
                OUTPUT_PLACEHOLDER.to_string(),
            ],
        }
    }
}

impl ConverterCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Arguments with the placeholders filled in.
    pub fn render_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }

    /// Convert `input` into a CF/Radial file at `output`, blocking until done.
    pub fn run(&self, input: &Path, output: &Path) -> VolumeIoResult<()> {
        let args = self.render_args(input, output);
        debug!(
            program = %self.program,
            input = %input.display(),
            output = %output.display(),
            "Running converter"
        );

        let result = Command::new(&self.program).args(&args).output();
        let result = match result {
            Ok(r) => r,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(VolumeIoError::ConverterNotFound {
                    program: self.program.clone(),
                })
            }
            Err(e) => return Err(VolumeIoError::Io(e)),
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(VolumeIoError::Conversion {
                input: input.display().to_string(),
                status: result.status.to_string(),
                stderr: last_lines(&stderr, 5),
            });
        }

        if !output.exists() {
            return Err(VolumeIoError::Conversion {
                input: input.display().to_string(),
                status: result.status.to_string(),
                stderr: format!("no output written to {}", output.display()),
            });
        }

        Ok(())
    }
}

/// Scratch file path that is removed on drop.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Reserve a unique `.nc` path in `dir`. The file itself is not created.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(generate_temp_filename()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove scratch file"),
        }
    }
}

/// Get the optimal temp directory for converted volumes.
///
/// On Linux, uses /dev/shm (memory-backed tmpfs) if available.
/// Falls back to the system temp directory otherwise.
pub fn scratch_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let shm_path = Path::new("/dev/shm");
        if shm_path.is_dir() {
            let test_path = shm_path.join(format!(".radar_test_{}", std::process::id()));
            if std::fs::write(&test_path, b"test").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return shm_path.to_path_buf();
            }
        }
    }

    std::env::temp_dir()
}

/// Unique temp file name from process ID, thread ID and a counter.
fn generate_temp_filename() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let pid = std::process::id();
    let tid = std::thread::current().id();
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("radar_volume_{}_{:?}_{}.nc", pid, tid, count)
        .replace(['(', ')'], "")
}

fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}
