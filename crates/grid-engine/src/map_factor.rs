//! Map factors: grid-coordinate spacing over true ground distance.
//!
//! For each point the grid spacing `dx` (`dy`) is compared with the
//! geodesic length of a step of `dx` (`dy`) along the grid's x (y) axis.
//! Longitude/latitude grids and grids without an ellipsoid have no metric
//! units to compare against, so their factors are 1 everywhere.

use projection::Geodesic;
use tracing::debug;

use crate::grid::Grid;

/// Per-point map factors along x and y.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFactors {
    pub mfx: Vec<f64>,
    pub mfy: Vec<f64>,
}

impl MapFactors {
    /// Unit factors for `n` points.
    pub fn ones(n: usize) -> Self {
        Self {
            mfx: vec![1.0; n],
            mfy: vec![1.0; n],
        }
    }

    /// Compute the map factors at every grid point.
    ///
    /// Points whose geodesic step length is zero or not finite get NaN.
    pub fn compute(grid: &Grid) -> Self {
        let proj = grid.projection();
        let ellipsoid = match proj.ellipsoid() {
            Some(e) if !proj.is_longlat() => e,
            _ => return Self::ones(grid.n_points()),
        };
        let geod = Geodesic::new(ellipsoid);
        let (dx, dy) = (grid.dx(), grid.dy());

        let mut mfx = Vec::with_capacity(grid.n_points());
        let mut mfy = Vec::with_capacity(grid.n_points());
        for (&x, &y) in grid.x().iter().zip(grid.y()) {
            let (lon, lat) = proj.inverse(x, y);
            let (lon_x, lat_x) = proj.inverse(x + dx, y);
            let (lon_y, lat_y) = proj.inverse(x, y + dy);
            mfx.push(ratio(dx, geod.inverse(lon, lat, lon_x, lat_x)));
            mfy.push(ratio(dy, geod.inverse(lon, lat, lon_y, lat_y)));
        }

        debug!(
            projection = proj.name(),
            points = grid.n_points(),
            "Computed map factors"
        );
        Self { mfx, mfy }
    }
}

fn ratio(step: f64, distance: f64) -> f64 {
    if distance > 0.0 {
        step / distance
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use projection::{Cartesian, LonLat, PolarStereographic, Projection};

    use crate::types::GridOptions;

    #[test]
    fn test_longlat_factors_are_one() {
        let grid = Grid::regular_grid(
            Arc::new(LonLat::new()),
            -10.0,
            10.0,
            -10.0,
            10.0,
            5.0,
            false,
            GridOptions::default(),
        )
        .unwrap();
        let mf = grid.map_factors();
        assert!(mf.mfx.iter().chain(&mf.mfy).all(|&v| v == 1.0));
    }

    #[test]
    fn test_cartesian_factors_are_one() {
        let grid = Grid::regular_grid(
            Arc::new(Cartesian),
            0.0,
            4.0,
            0.0,
            4.0,
            1.0,
            false,
            GridOptions::default(),
        )
        .unwrap();
        assert_eq!(grid.map_factors(), &MapFactors::ones(16));
    }

    #[test]
    fn test_polar_stereographic_true_scale() {
        // near lat_ts = 70 the projection is true to scale
        let proj = Arc::new(PolarStereographic::osisaf_north());
        let (x0, y0) = proj.forward(-45.0, 70.0);
        let grid = Grid::regular_grid(
            proj,
            x0 - 5000.0,
            x0 + 5000.0,
            y0 - 5000.0,
            y0 + 5000.0,
            2500.0,
            false,
            GridOptions::default(),
        )
        .unwrap();
        let mf = grid.map_factors();
        for (&mx, &my) in mf.mfx.iter().zip(&mf.mfy) {
            assert!((mx - 1.0).abs() < 2e-3, "mfx {}", mx);
            assert!((my - 1.0).abs() < 2e-3, "mfy {}", my);
        }
    }

    #[test]
    fn test_polar_stereographic_scale_grows_equatorward() {
        let proj = Arc::new(PolarStereographic::osisaf_north());
        let (_, y_pole) = proj.forward(-45.0, 89.0);
        let (_, y_mid) = proj.forward(-45.0, 50.0);

        // 2x2 grid: first row at 50N, second row at 89N
        let grid = Grid::regular(
            proj,
            vec![0.0, 10000.0, 0.0, 10000.0],
            vec![y_mid, y_mid, y_pole, y_pole],
            2,
            2,
            GridOptions::default(),
        )
        .unwrap();
        let mf = grid.map_factors();
        // grid metres per ground metre: > 1 equatorward of lat_ts, < 1 poleward
        assert!(mf.mfx[0] > 1.0);
        assert!(mf.mfx[2] < 1.0);
    }
}
