//! The interface every map projection implements.

use std::fmt::Debug;

use crate::ellipsoid::Ellipsoid;

/// Name reported by geographic longitude/latitude projections.
///
/// Grids defined on a projection with this name treat x as a longitude and
/// keep it normalized to [-180, 180).
pub const LONGLAT: &str = "longlat";

/// A forward/inverse map projection between geographic coordinates and a
/// planar coordinate system.
///
/// Longitudes and latitudes are in degrees. Planar units are whatever the
/// projection defines (metres for the conformal projections, degrees for
/// [`LonLat`](crate::LonLat)).
///
/// Points that cannot be projected produce NaN coordinates rather than an
/// error, so that whole arrays can be pushed through a projection and the
/// failures handled downstream.
pub trait Projection: Debug + Send + Sync {
    /// Short identifying name (e.g. `"longlat"`, `"stere"`, `"lcc"`).
    fn name(&self) -> &str;

    /// Project geographic coordinates to planar (x, y).
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64);

    /// Invert planar (x, y) back to geographic (lon, lat).
    fn inverse(&self, x: f64, y: f64) -> (f64, f64);

    /// The ellipsoid used for geodesic distance calculations.
    ///
    /// `None` for purely Euclidean coordinate systems, where grid distances
    /// are already true distances.
    fn ellipsoid(&self) -> Option<Ellipsoid>;

    /// Whether x is a longitude-like coordinate that wraps at ±180.
    fn is_longlat(&self) -> bool {
        self.name() == LONGLAT
    }
}

/// Wrap a longitude into [-180, 180).
#[inline]
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        -180.0
    } else {
        wrapped - 180.0
    }
}
