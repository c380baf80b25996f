//! Common test fixtures for radar-plot tests.

use std::fs;
use std::path::{Path, PathBuf};

/// KIWX (Northern Indiana) radar site.
pub mod kiwx {
    pub const SITE: &str = "KIWX";
    pub const LAT: f64 = 41.3586;
    pub const LON: f64 = -85.7000;
    pub const ALT: f64 = 293.0;

    /// CF time units of the first fixture scan.
    pub const TIME_UNITS: &str = "seconds since 2016-10-22T18:58:19Z";
    pub const SCAN_ID: &str = "20161022_T185819";
}

/// Fort Wayne as (name, lat, lon), one of the built-in KIWX landmarks.
pub const FORT_WAYNE: (&str, f64, f64) = ("Fort Wayne", 41.0799, -85.1386);

/// `count` archive names five minutes apart, starting at 18:58:19.
///
/// ```
/// let names = test_utils::archive_names(2);
/// assert_eq!(names[0], "KIWX20161022_185819_V06");
/// assert_eq!(names[1], "KIWX20161022_190319_V06");
/// ```
pub fn archive_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let minutes = 18 * 60 + 58 + 5 * i;
            format!(
                "{}20161022_{:02}{:02}19_V06",
                kiwx::SITE,
                (minutes / 60) % 24,
                minutes % 60
            )
        })
        .collect()
}

/// Create `count` empty archive files in `dir` and return their paths in order.
pub fn touch_archives(dir: &Path, count: usize) -> Vec<PathBuf> {
    archive_names(count)
        .into_iter()
        .map(|name| {
            let path = dir.join(name);
            fs::write(&path, b"").expect("Failed to create fixture archive");
            path
        })
        .collect()
}

/// Write `count` placeholder frames `img_000.png`.. into `dir`.
pub fn write_numbered_frames(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("img_{:03}.png", i));
            fs::write(&path, b"\x89PNG").expect("Failed to create fixture frame");
            path
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_names_roll_over_the_hour() {
        let names = archive_names(3);
        assert_eq!(
            names,
            vec![
                "KIWX20161022_185819_V06",
                "KIWX20161022_190319_V06",
                "KIWX20161022_190819_V06"
            ]
        );
    }

    #[test]
    fn test_touch_archives_creates_files() {
        let dir = crate::temp_test_dir();
        let paths = touch_archives(dir.path(), 4);
        assert_eq!(paths.len(), 4);
        assert!(paths.iter().all(|p| p.exists()));
    }
}
