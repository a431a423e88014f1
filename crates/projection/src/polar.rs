//! Polar stereographic projection on an ellipsoid.
//!
//! This projection is the standard choice for sea-ice products such as the
//! OSI SAF drift and concentration grids. The plane touches (or cuts) the
//! ellipsoid at the latitude of true scale; the pole maps to the origin.
//!
//! The south-polar aspect is handled by reflecting the north-polar
//! formulas: latitude, longitude and both planar axes change sign.
//!
//! Reference: J.P. Snyder, "Map Projections: A Working Manual", USGS
//! Professional Paper 1395, pp. 160-162.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::ellipsoid::Ellipsoid;
use crate::transform::{normalize_lon, Projection};

/// Polar stereographic projection parameters.
#[derive(Debug, Clone)]
pub struct PolarStereographic {
    /// Latitude of true scale (degrees)
    pub lat_ts: f64,
    /// Central meridian, pointing "down" from the north pole (degrees)
    pub lon0: f64,
    /// North-polar aspect if true, south-polar otherwise
    pub north: bool,
    /// Reference ellipsoid
    pub ellipsoid: Ellipsoid,
    /// rho = scale * t(phi)
    scale: f64,
}

const MAX_ITERATIONS: usize = 15;

impl PolarStereographic {
    /// Create a polar stereographic projection.
    ///
    /// # Arguments
    /// * `lat_ts` - Latitude of true scale (degrees); its sign is ignored,
    ///   the aspect is chosen by `north`
    /// * `lon0` - Central meridian (degrees)
    /// * `north` - North-polar aspect if true
    /// * `ellipsoid` - Reference ellipsoid
    pub fn new(lat_ts: f64, lon0: f64, north: bool, ellipsoid: Ellipsoid) -> Self {
        let e = ellipsoid.e();
        let phi_c = lat_ts.abs().to_radians();

        let scale = if (phi_c - FRAC_PI_2).abs() < 1e-10 {
            // true scale at the pole, k0 = 1
            2.0 * ellipsoid.a / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt()
        } else {
            let sin_c = phi_c.sin();
            let m_c = phi_c.cos() / (1.0 - e * e * sin_c * sin_c).sqrt();
            ellipsoid.a * m_c / t_of(phi_c, e)
        };

        Self {
            lat_ts,
            lon0,
            north,
            ellipsoid,
            scale,
        }
    }

    /// The OSI SAF northern hemisphere grid projection:
    /// `+proj=stere +a=6378273 +b=6356889.44891 +lat_0=90 +lat_ts=70 +lon_0=-45`.
    pub fn osisaf_north() -> Self {
        Self::new(
            70.0,
            -45.0,
            true,
            Ellipsoid::from_axes(6378273.0, 6356889.44891),
        )
    }

    /// The NSIDC sea-ice polar stereographic south grid (EPSG:3412 style).
    pub fn nsidc_south() -> Self {
        Self::new(-70.0, 0.0, false, Ellipsoid::from_axes(6378273.0, 6356889.449))
    }
}

/// Snyder's t(phi) for the north-polar aspect.
#[inline]
fn t_of(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

impl Projection for PolarStereographic {
    fn name(&self) -> &str {
        "stere"
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let e = self.ellipsoid.e();
        let phi = if self.north { lat } else { -lat }.to_radians();
        let dlambda = (lon - self.lon0).to_radians();
        let rho = self.scale * t_of(phi, e);
        let (sin_l, cos_l) = dlambda.sin_cos();

        if self.north {
            (rho * sin_l, -rho * cos_l)
        } else {
            (rho * sin_l, rho * cos_l)
        }
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let e = self.ellipsoid.e();
        let rho = x.hypot(y);
        let t = rho / self.scale;

        // conformal latitude as the first guess, then fixed-point iteration
        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..MAX_ITERATIONS {
            let es = e * phi.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(e / 2.0)).atan();
            let converged = (next - phi).abs() < 1e-12;
            phi = next;
            if converged {
                break;
            }
        }

        let (lat, dlambda) = if self.north {
            (phi.to_degrees(), x.atan2(-y).to_degrees())
        } else {
            (-phi.to_degrees(), x.atan2(y).to_degrees())
        };

        (normalize_lon(self.lon0 + dlambda), lat)
    }

    fn ellipsoid(&self) -> Option<Ellipsoid> {
        Some(self.ellipsoid)
    }
}
