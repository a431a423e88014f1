//! Lambert Conformal Conic projection.
//!
//! Commonly used for mid-latitude regional weather grids (HRRR, NAM, most
//! limited-area NWP domains). It maps a cone tangent or secant to the
//! Earth's surface onto a flat plane.
//!
//! The projection parameters are:
//! - Origin latitude (lat0): planar y is zero here
//! - Central meridian (lon0): planar x is zero here
//! - Standard parallel(s): lat1 and lat2 (equal for a tangent cone)
//!
//! The Earth is treated as a sphere of radius 6371229 m, matching the GRIB2
//! shape-of-earth code 6 used by the NCEP regional models. Planar
//! coordinates are in metres.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::ellipsoid::Ellipsoid;
use crate::transform::{normalize_lon, Projection};

/// Sphere radius used by GRIB2 shape-of-earth code 6 (metres).
pub const EARTH_RADIUS: f64 = 6371229.0;

/// Lambert Conformal Conic projection parameters.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Origin latitude in degrees
    pub lat0: f64,
    /// Central meridian (LoV) in degrees
    pub lon0: f64,
    /// First standard parallel in degrees
    pub lat1: f64,
    /// Second standard parallel in degrees
    pub lat2: f64,
    /// Sphere radius (metres)
    pub earth_radius: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the origin latitude
    rho0: f64,
}

impl LambertConformal {
    /// Create a new Lambert Conformal projection.
    ///
    /// # Arguments
    /// * `lat0` - Origin latitude (degrees)
    /// * `lon0` - Central meridian (degrees)
    /// * `lat1` - First standard parallel (degrees)
    /// * `lat2` - Second standard parallel (degrees)
    pub fn new(lat0: f64, lon0: f64, lat1: f64, lat2: f64) -> Self {
        let phi0 = lat0.to_radians();
        let phi1 = lat1.to_radians();
        let phi2 = lat2.to_radians();

        let n = if (phi1 - phi2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            phi1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (phi1.cos() / phi2.cos()).ln();
            let tan_ratio = ((FRAC_PI_4 + phi2 / 2.0).tan() / (FRAC_PI_4 + phi1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = phi1.cos() * (FRAC_PI_4 + phi1 / 2.0).tan().powf(n) / n;
        let rho0 = EARTH_RADIUS * f / (FRAC_PI_4 + phi0 / 2.0).tan().powf(n);

        Self {
            lat0,
            lon0,
            lat1,
            lat2,
            earth_radius: EARTH_RADIUS,
            n,
            f,
            rho0,
        }
    }

    /// Continental US projection shared by HRRR and the NAM CONUS nests:
    /// tangent at 38.5°N with LoV at 97.5°W.
    pub fn conus() -> Self {
        Self::new(38.5, -97.5, 38.5, 38.5)
    }

    /// Cone constant.
    pub fn cone_constant(&self) -> f64 {
        self.n
    }
}

impl Projection for LambertConformal {
    fn name(&self) -> &str {
        "lcc"
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        // Longitude difference in [-180, 180)
        let dlon = normalize_lon(lon - self.lon0).to_radians();

        let rho = self.earth_radius * self.f / (FRAC_PI_4 + phi / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let sign = self.n.signum();
        let dy = self.rho0 - y;

        let rho = sign * x.hypot(dy);
        let theta = (sign * x).atan2(sign * dy);

        let lat = 2.0 * (self.earth_radius * self.f / rho).powf(1.0 / self.n).atan() - FRAC_PI_2;
        let lon = self.lon0 + (theta / self.n).to_degrees();

        (normalize_lon(lon), lat.to_degrees())
    }

    fn ellipsoid(&self) -> Option<Ellipsoid> {
        Some(Ellipsoid::sphere(self.earth_radius))
    }
}
