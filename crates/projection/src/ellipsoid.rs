//! Reference ellipsoids and geodesic distances.
//!
//! Geodesic distances are solved with Vincenty's inverse formula, which is
//! accurate to well below a millimetre for the grid-spacing distances the
//! map-factor computation asks for. Nearly antipodal points, where the
//! iteration does not converge, fall back to a great-circle distance on
//! the mean sphere.
//!
//! Reference: T. Vincenty, "Direct and Inverse Solutions of Geodesics on
//! the Ellipsoid with application of nested equations", Survey Review, 1975.

use serde::{Deserialize, Serialize};

/// An oblate ellipsoid of revolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Flattening, (a - b) / a
    pub f: f64,
}

impl Ellipsoid {
    /// World Geodetic System 1984.
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6378137.0,
        f: 1.0 / 298.257223563,
    };

    /// Geodetic Reference System 1980.
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6378137.0,
        f: 1.0 / 298.257222101,
    };

    /// A sphere of the given radius.
    pub fn sphere(radius: f64) -> Self {
        Self { a: radius, f: 0.0 }
    }

    /// Build an ellipsoid from its semi-major and semi-minor axes.
    pub fn from_axes(a: f64, b: f64) -> Self {
        Self { a, f: (a - b) / a }
    }

    /// Semi-minor axis (metres).
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// First eccentricity.
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// Mean radius (2a + b) / 3.
    pub fn mean_radius(&self) -> f64 {
        (2.0 * self.a + self.b()) / 3.0
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Geodesic calculations on an ellipsoid.
#[derive(Debug, Clone, Copy)]
pub struct Geodesic {
    ellipsoid: Ellipsoid,
}

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

impl Geodesic {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self { ellipsoid }
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    /// Distance in metres between two geographic points (degrees).
    ///
    /// Returns NaN if any input is NaN.
    pub fn inverse(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
        let a = self.ellipsoid.a;
        let f = self.ellipsoid.f;
        let b = self.ellipsoid.b();

        let l = (lon2 - lon1).to_radians();
        let u1 = ((1.0 - f) * lat1.to_radians().tan()).atan();
        let u2 = ((1.0 - f) * lat2.to_radians().tan()).atan();
        let (sin_u1, cos_u1) = u1.sin_cos();
        let (sin_u2, cos_u2) = u2.sin_cos();

        let mut lambda = l;
        for _ in 0..MAX_ITERATIONS {
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
                + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
            .sqrt();
            if sin_sigma == 0.0 {
                // coincident points
                return 0.0;
            }
            let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
            let sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
            let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
            // equatorial line: cos2_alpha == 0
            let cos_2sigma_m = if cos2_alpha != 0.0 {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
            } else {
                0.0
            };
            let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
            let lambda_next = l
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos_2sigma_m
                                + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

            if (lambda_next - lambda).abs() < CONVERGENCE {
                let u_sq = cos2_alpha * (a * a - b * b) / (b * b);
                let big_a =
                    1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
                let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
                let delta_sigma = big_b
                    * sin_sigma
                    * (cos_2sigma_m
                        + big_b / 4.0
                            * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                                - big_b / 6.0
                                    * cos_2sigma_m
                                    * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                    * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
                return b * big_a * (sigma - delta_sigma);
            }
            lambda = lambda_next;
        }

        self.great_circle(lon1, lat1, lon2, lat2)
    }

    /// Haversine distance on the ellipsoid's mean sphere.
    pub fn great_circle(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
        let phi1 = lat1.to_radians();
        let phi2 = lat2.to_radians();
        let dphi = phi2 - phi1;
        let dlambda = (lon2 - lon1).to_radians();
        let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
        // f64::min would swallow a NaN here
        let s = h.sqrt();
        let s = if s > 1.0 { 1.0 } else { s };
        2.0 * self.ellipsoid.mean_radius() * s.asin()
    }
}

impl Default for Geodesic {
    fn default() -> Self {
        Self::new(Ellipsoid::WGS84)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_along_equator() {
        let geod = Geodesic::default();
        let d = geod.inverse(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111319.4908).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_quarter_meridian() {
        let geod = Geodesic::default();
        let d = geod.inverse(0.0, 0.0, 0.0, 90.0);
        assert!((d - 10001965.729).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_coincident_points() {
        let geod = Geodesic::default();
        assert_eq!(geod.inverse(12.5, -33.0, 12.5, -33.0), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let geod = Geodesic::default();
        let d1 = geod.inverse(-45.0, 70.0, 10.0, 75.0);
        let d2 = geod.inverse(10.0, 75.0, -45.0, 70.0);
        assert!((d1 - d2).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_matches_great_circle() {
        let geod = Geodesic::new(Ellipsoid::sphere(6371000.0));
        let vincenty = geod.inverse(0.0, 10.0, 30.0, 40.0);
        let haversine = geod.great_circle(0.0, 10.0, 30.0, 40.0);
        assert!((vincenty - haversine).abs() < 1e-3);
    }

    #[test]
    fn test_nearly_antipodal_is_finite() {
        let geod = Geodesic::default();
        let d = geod.inverse(0.0, 0.0, 179.7, 0.5);
        assert!(d.is_finite());
        assert!(d > 19_900_000.0 && d < 20_100_000.0, "got {}", d);
    }

    #[test]
    fn test_nan_propagates() {
        let geod = Geodesic::default();
        assert!(geod.inverse(f64::NAN, 0.0, 1.0, 0.0).is_nan());
    }

    #[test]
    fn test_from_axes() {
        let e = Ellipsoid::from_axes(6378273.0, 6356889.44891);
        assert!((e.b() - 6356889.44891).abs() < 1e-6);
        assert!(e.e2() > 0.0 && e.e2() < 0.01);
    }
}
