//! Scan time handling.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::{RadarError, RadarResult};

/// Start time of a volume scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanTime(pub DateTime<Utc>);

impl ScanTime {
    /// Parse a CF time units string, e.g. `"seconds since 2016-10-22T18:58:19Z"`.
    ///
    /// The reference epoch of the units string is the scan start time.
    /// Fractional seconds, a missing `Z` and a space in place of the `T` are
    /// tolerated.
    pub fn from_units(units: &str) -> RadarResult<Self> {
        let invalid = || RadarError::InvalidTimeUnits(units.to_string());

        let (_unit, rest) = units
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(invalid)?;
        let stamp = rest
            .trim_start()
            .strip_prefix("since")
            .filter(|s| s.starts_with(char::is_whitespace))
            .map(str::trim)
            .ok_or_else(invalid)?;

        if let Ok(dt) = DateTime::parse_from_rfc3339(stamp) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }

        let naive = stamp.trim_end_matches('Z');
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(naive, format) {
                return Ok(Self(Utc.from_utc_datetime(&ndt)));
            }
        }

        Err(invalid())
    }

    /// Compact identifier used in figure titles: `YYYYMMDD_Thhmmss`.
    pub fn scan_id(&self) -> String {
        self.0.format("%Y%m%d_T%H%M%S").to_string()
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.0
    }
}
