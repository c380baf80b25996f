//! Radar site identification and map landmarks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Site identifier from an archive file name.
///
/// NEXRAD archives start with the 4-letter ICAO id, e.g.
/// `KIWX20161022_185819_V06` -> `KIWX`.
pub fn site_id(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.chars().take(4).collect()
}

/// A labelled point drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Landmark {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }
}

/// Landmarks keyed by radar site id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkTable(pub HashMap<String, Vec<Landmark>>);

impl LandmarkTable {
    /// Built-in landmarks: Fort Wayne and South Bend around KIWX.
    pub fn builtin() -> Self {
        let mut table = HashMap::new();
        table.insert(
            "KIWX".to_string(),
            vec![
                Landmark::new("Fort Wayne", 41.0799, -85.1386),
                Landmark::new("South Bend", 41.6834, -86.2500),
            ],
        );
        Self(table)
    }

    /// Add entries from another table, after the existing ones for each site.
    pub fn merge(&mut self, other: LandmarkTable) {
        for (site, landmarks) in other.0 {
            self.0
                .entry(site.to_uppercase())
                .or_default()
                .extend(landmarks);
        }
    }

    /// Landmarks for a site (empty when the site has none).
    pub fn for_site(&self, site: &str) -> &[Landmark] {
        self.0
            .get(&site.to_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_site_id_from_archive_name() {
        let p = PathBuf::from("/data/radar/KIWX20161022_185819_V06");
        assert_eq!(site_id(&p), "KIWX");
    }

    #[test]
    fn test_site_id_short_name() {
        assert_eq!(site_id(Path::new("abc")), "abc");
    }

    #[test]
    fn test_builtin_landmarks_only_for_kiwx() {
        let table = LandmarkTable::builtin();
        assert_eq!(table.for_site("KIWX").len(), 2);
        assert!(table.for_site("KLOT").is_empty());
    }

    #[test]
    fn test_merge_appends() {
        let mut table = LandmarkTable::builtin();
        let mut extra = HashMap::new();
        extra.insert("kiwx".to_string(), vec![Landmark::new("Warsaw", 41.24, -85.85)]);
        table.merge(LandmarkTable(extra));

        let names: Vec<&str> = table.for_site("KIWX").iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Fort Wayne", "South Bend", "Warsaw"]);
    }
}
