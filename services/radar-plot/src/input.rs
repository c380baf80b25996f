//! Input file resolution.

use std::path::PathBuf;

use radar_common::{Chooser, FileRequest, RadarResult};
use tracing::{info, warn};

/// Argument that asks for the file chooser instead of explicit paths.
pub const PICK_SENTINEL: &str = "pick";

/// Which archives to plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSpec {
    /// Explicit paths, used as given and in order.
    Paths(Vec<PathBuf>),
    /// Ask the user with a multi-select dialog.
    Pick,
}

impl FileSpec {
    /// Interpret positional arguments. A lone `pick` or the `--pick` flag opens the chooser.
    pub fn from_args(files: Vec<String>, pick: bool) -> Self {
        if pick || (files.len() == 1 && files[0] == PICK_SENTINEL) {
            FileSpec::Pick
        } else {
            FileSpec::Paths(files.into_iter().map(PathBuf::from).collect())
        }
    }
}

/// Resolve to an ordered list of paths.
///
/// A cancelled dialog yields an empty list, which callers treat as "nothing to do".
pub fn resolve_inputs(spec: &FileSpec, chooser: &dyn Chooser) -> RadarResult<Vec<PathBuf>> {
    match spec {
        FileSpec::Paths(paths) => Ok(paths.clone()),
        FileSpec::Pick => {
            info!("Please pick a file in the pop up window");
            let files = chooser.pick_files(&FileRequest::radar_archives())?;
            if files.is_empty() {
                warn!("File selection cancelled");
            } else {
                info!(count = files.len(), "Selected files");
            }
            Ok(files)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_sentinel() {
        assert_eq!(FileSpec::from_args(vec!["pick".to_string()], false), FileSpec::Pick);
        assert_eq!(FileSpec::from_args(Vec::new(), true), FileSpec::Pick);
    }

    #[test]
    fn test_paths_keep_order() {
        let spec = FileSpec::from_args(vec!["b".to_string(), "a".to_string()], false);
        assert_eq!(
            spec,
            FileSpec::Paths(vec![PathBuf::from("b"), PathBuf::from("a")])
        );
    }

    #[test]
    fn test_pick_is_only_a_sentinel_when_alone() {
        let spec = FileSpec::from_args(vec!["pick".to_string(), "KIWX_V06".to_string()], false);
        assert!(matches!(spec, FileSpec::Paths(p) if p.len() == 2));
    }
}
