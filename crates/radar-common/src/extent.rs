//! Map extent and projection center resolution.

use serde::{Deserialize, Serialize};

use crate::field::Span;

/// Default half-width of the map around its center, in degrees of longitude.
pub const DEFAULT_LON_HALF_WIDTH: f64 = 2.25;

/// Default half-height of the map around its center, in degrees of latitude.
pub const DEFAULT_LAT_HALF_HEIGHT: f64 = 1.75;

/// Caller-supplied extent overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtentRequest {
    /// Projection center as (lat, lon).
    pub center: Option<(f64, f64)>,
    pub lon_range: Option<Span>,
    pub lat_range: Option<Span>,
}

/// Geographic bounding box plus the projection center, all in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapExtent {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub lat_0: f64,
    pub lon_0: f64,
}

impl ExtentRequest {
    /// Resolve against the radar site location.
    ///
    /// An explicit latitude range uses both of its bounds.
    pub fn resolve(&self, site_lat: f64, site_lon: f64) -> MapExtent {
        let (lat_0, lon_0) = self.center.unwrap_or((site_lat, site_lon));

        let lon = self.lon_range.unwrap_or(Span::new(
            lon_0 - DEFAULT_LON_HALF_WIDTH,
            lon_0 + DEFAULT_LON_HALF_WIDTH,
        ));
        let lat = self.lat_range.unwrap_or(Span::new(
            lat_0 - DEFAULT_LAT_HALF_HEIGHT,
            lat_0 + DEFAULT_LAT_HALF_HEIGHT,
        ));

        MapExtent {
            min_lon: lon.min,
            max_lon: lon.max,
            min_lat: lat.min,
            max_lat: lat.max,
            lat_0,
            lon_0,
        }
    }
}

impl MapExtent {
    /// Width of the extent in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height of the extent in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check if a geographic point lies within the extent (inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Lower-left and upper-right corners as ((lat, lon), (lat, lon)).
    pub fn corners(&self) -> ((f64, f64), (f64, f64)) {
        ((self.min_lat, self.min_lon), (self.max_lat, self.max_lon))
    }
}
