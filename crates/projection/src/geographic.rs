//! Geographic and Euclidean identity projections.

use crate::ellipsoid::Ellipsoid;
use crate::transform::{Projection, LONGLAT};

/// Geographic longitude/latitude "projection".
///
/// x is longitude and y is latitude, both in degrees. Grids built on this
/// projection wrap x at ±180.
#[derive(Debug, Clone, Copy)]
pub struct LonLat {
    ellipsoid: Ellipsoid,
}

impl LonLat {
    pub fn new() -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
        }
    }

    pub fn with_ellipsoid(ellipsoid: Ellipsoid) -> Self {
        Self { ellipsoid }
    }
}

impl Default for LonLat {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for LonLat {
    fn name(&self) -> &str {
        LONGLAT
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon, lat)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    fn ellipsoid(&self) -> Option<Ellipsoid> {
        Some(self.ellipsoid)
    }
}

/// Plain Euclidean plane with no geographic meaning.
///
/// Coordinates pass through unchanged in both directions and no ellipsoid
/// is attached, so grids on this projection have unit map factors. Useful
/// for idealized test domains.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cartesian;

impl Projection for Cartesian {
    fn name(&self) -> &str {
        "cartesian"
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon, lat)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    fn ellipsoid(&self) -> Option<Ellipsoid> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lonlat_is_longlat() {
        let proj = LonLat::new();
        assert!(proj.is_longlat());
        assert_eq!(proj.forward(12.0, -4.0), (12.0, -4.0));
        assert_eq!(proj.ellipsoid(), Some(Ellipsoid::WGS84));
    }

    #[test]
    fn test_cartesian_has_no_ellipsoid() {
        let proj = Cartesian;
        assert!(!proj.is_longlat());
        assert_eq!(proj.inverse(1.5, 2.5), (1.5, 2.5));
        assert!(proj.ellipsoid().is_none());
    }
}
