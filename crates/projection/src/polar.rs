//! Radar beam geometry.
//!
//! Gates are located with the standard 4/3 effective-earth-radius beam
//! model, then placed on the sphere with an azimuthal equidistant
//! projection centered on the radar site.

/// Earth radius used by the azimuthal equidistant step (metres).
pub const AEQD_EARTH_RADIUS: f64 = 6370997.0;

/// Mean earth radius for the beam model (metres).
pub const BEAM_EARTH_RADIUS: f64 = 6371000.0;

/// Effective earth radius multiplier for standard refraction.
pub const STANDARD_REFRACTION: f64 = 4.0 / 3.0;

/// Azimuthal equidistant projection centered on a radar site.
#[derive(Debug, Clone, Copy)]
pub struct AzimuthalEquidistant {
    /// Center latitude in radians
    lat0: f64,
    /// Center longitude in radians
    lon0: f64,
    radius: f64,
}

impl AzimuthalEquidistant {
    pub fn new(lat0_deg: f64, lon0_deg: f64) -> Self {
        Self {
            lat0: lat0_deg.to_radians(),
            lon0: lon0_deg.to_radians(),
            radius: AEQD_EARTH_RADIUS,
        }
    }

    /// Geographic degrees to metres east/north of the center.
    pub fn forward(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let dlon = lon_deg.to_radians() - self.lon0;

        let cos_c = self.lat0.sin() * lat.sin() + self.lat0.cos() * lat.cos() * dlon.cos();
        let c = cos_c.clamp(-1.0, 1.0).acos();
        let k = if c.abs() < 1e-12 { 1.0 } else { c / c.sin() };

        let x = self.radius * k * lat.cos() * dlon.sin();
        let y = self.radius
            * k
            * (self.lat0.cos() * lat.sin() - self.lat0.sin() * lat.cos() * dlon.cos());
        (x, y)
    }

    /// Metres east/north of the center to geographic degrees (lat, lon).
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let rho = (x * x + y * y).sqrt();
        if rho < 1e-9 {
            return (self.lat0.to_degrees(), self.lon0.to_degrees());
        }

        let c = rho / self.radius;
        let lat = (c.cos() * self.lat0.sin() + y * c.sin() * self.lat0.cos() / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = self.lon0
            + (x * c.sin()).atan2(rho * self.lat0.cos() * c.cos() - y * self.lat0.sin() * c.sin());

        (lat.to_degrees(), normalize_lon_deg(lon.to_degrees()))
    }
}

/// Relationship between slant range along the beam and distance over ground.
#[derive(Debug, Clone, Copy)]
pub struct BeamGeometry {
    effective_radius: f64,
}

impl Default for BeamGeometry {
    fn default() -> Self {
        Self {
            effective_radius: BEAM_EARTH_RADIUS * STANDARD_REFRACTION,
        }
    }
}

impl BeamGeometry {
    /// Great-circle ground distance under a gate at `range` metres.
    pub fn ground_distance(&self, range: f64, elevation_deg: f64) -> f64 {
        let r = self.effective_radius;
        let el = elevation_deg.to_radians();
        let height = (range * range + r * r + 2.0 * range * r * el.sin()).sqrt() - r;
        r * (range * el.cos() / (r + height)).asin()
    }

    /// Slant range whose gate sits over a point `ground` metres away.
    pub fn slant_range(&self, ground: f64, elevation_deg: f64) -> f64 {
        let r = self.effective_radius;
        let el = elevation_deg.to_radians();
        let alpha = ground / r;
        let denom = (alpha + el).cos();
        if denom <= 0.0 {
            return f64::INFINITY;
        }
        r * alpha.sin() / denom
    }

    /// Height of the beam center above the antenna (metres).
    pub fn beam_height(&self, range: f64, elevation_deg: f64) -> f64 {
        let r = self.effective_radius;
        let el = elevation_deg.to_radians();
        (range * range + r * r + 2.0 * range * r * el.sin()).sqrt() - r
    }
}

/// Locates gates of one radar on the globe and back.
#[derive(Debug, Clone, Copy)]
pub struct RadarGeometry {
    aeqd: AzimuthalEquidistant,
    beam: BeamGeometry,
}

impl RadarGeometry {
    pub fn new(site_lat: f64, site_lon: f64) -> Self {
        Self {
            aeqd: AzimuthalEquidistant::new(site_lat, site_lon),
            beam: BeamGeometry::default(),
        }
    }

    /// (lat, lon) of the gate at `range` metres, `azimuth` and `elevation` degrees.
    pub fn gate_location(&self, range: f64, azimuth_deg: f64, elevation_deg: f64) -> (f64, f64) {
        let s = self.beam.ground_distance(range, elevation_deg);
        let az = azimuth_deg.to_radians();
        self.aeqd.inverse(s * az.sin(), s * az.cos())
    }

    /// Slant range (metres) and azimuth (degrees, 0..360) of the gate over a point.
    pub fn locate(&self, lat: f64, lon: f64, elevation_deg: f64) -> (f64, f64) {
        let (x, y) = self.aeqd.forward(lat, lon);
        let ground = (x * x + y * y).sqrt();
        let mut azimuth = x.atan2(y).to_degrees();
        if azimuth < 0.0 {
            azimuth += 360.0;
        }
        (self.beam.slant_range(ground, elevation_deg), azimuth)
    }
}

fn normalize_lon_deg(lon: f64) -> f64 {
    let mut lon = lon;
    while lon > 180.0 {
        lon -= 360.0;
    }
    while lon < -180.0 {
        lon += 360.0;
    }
    lon
}
