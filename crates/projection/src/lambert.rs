//! Lambert Conformal Conic projection.
//!
//! Used for the map panels. The cone is tangent at the latitude of the map
//! center unless explicit standard parallels are given, and projected
//! coordinates are metres east/north of the map center.
//!
//! The projection parameters include:
//! - Reference latitude (lat0): latitude of the projection origin
//! - Reference longitude (lon0): the central meridian
//! - Standard parallel(s): latin1 and latin2 (equal for a tangent cone)

use std::f64::consts::PI;

/// Spherical earth radius used for map panels (metres).
pub const EARTH_RADIUS: f64 = 6371229.0;

/// Closest a tangent parallel may get to the equator, where the cone
/// degenerates into a cylinder.
const MIN_TANGENT_LATITUDE_DEG: f64 = 1.0;

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon0: f64,
    /// Latitude of the origin in radians
    pub lat0: f64,
    /// First standard parallel in radians
    pub latin1: f64,
    /// Second standard parallel in radians
    pub latin2: f64,
    /// Earth radius (meters)
    pub earth_radius: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the origin latitude
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection with explicit standard parallels.
    ///
    /// # Arguments
    /// * `lat0_deg` - Latitude of the origin (degrees)
    /// * `lon0_deg` - Central meridian (degrees)
    /// * `latin1_deg` - First standard parallel (degrees)
    /// * `latin2_deg` - Second standard parallel (degrees)
    pub fn new(lat0_deg: f64, lon0_deg: f64, latin1_deg: f64, latin2_deg: f64) -> Self {
        let to_rad = PI / 180.0;

        let lat0 = lat0_deg * to_rad;
        let lon0 = lon0_deg * to_rad;
        let latin1 = latin1_deg * to_rad;
        let latin2 = latin2_deg * to_rad;
        let earth_radius = EARTH_RADIUS;

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio =
                ((PI / 4.0 + latin2 / 2.0).tan() / (PI / 4.0 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = (latin1.cos() * (PI / 4.0 + latin1 / 2.0).tan().powf(n)) / n;
        let rho0 = earth_radius * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        Self {
            lon0,
            lat0,
            latin1,
            latin2,
            earth_radius,
            n,
            f,
            rho0,
        }
    }

    /// Tangent-cone projection centered on (`lat0_deg`, `lon0_deg`).
    pub fn centered(lat0_deg: f64, lon0_deg: f64) -> Self {
        let tangent = if lat0_deg.abs() < MIN_TANGENT_LATITUDE_DEG {
            MIN_TANGENT_LATITUDE_DEG.copysign(lat0_deg)
        } else {
            lat0_deg
        };
        Self::new(lat0_deg, lon0_deg, tangent, tangent)
    }

    /// Convert geographic coordinates (degrees) to projected metres (x east, y north).
    pub fn project(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let to_rad = PI / 180.0;
        let lat = lat_deg * to_rad;
        let lon = lon_deg * to_rad;

        // Normalize longitude difference to [-π, π]
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let rho = self.earth_radius * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();

        (x, y)
    }

    /// Convert projected metres back to geographic coordinates.
    ///
    /// Returns (lat, lon) in degrees.
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let to_deg = 180.0 / PI;

        let dy = self.rho0 - y;
        let rho = (x * x + dy * dy).sqrt();
        let (rho, theta) = if self.n < 0.0 {
            (-rho, (-x).atan2(-dy))
        } else {
            (rho, x.atan2(dy))
        };

        let lat = 2.0 * ((self.earth_radius * self.f / rho).powf(1.0 / self.n)).atan() - PI / 2.0;
        let lon = self.lon0 + theta / self.n;

        (lat * to_deg, lon * to_deg)
    }

    /// Cone constant, exposed for diagnostics.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }
}
