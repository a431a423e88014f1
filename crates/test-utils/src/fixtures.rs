//! Common test fixtures for grid-engine tests.
//!
//! This module provides pre-defined grid layouts that represent common
//! scenarios in regridding.

/// Common regular grid layouts.
pub mod grid {
    /// Global 1 degree lon/lat grid, cyclic in longitude
    pub const GLOBAL_1DEG: GridSpec = GridSpec {
        nx: 360,
        ny: 181,
        xmin: -180.0,
        xmax: 179.0,
        ymin: -90.0,
        ymax: 90.0,
    };

    /// Coarse global grid, 10 degree spacing
    pub const GLOBAL_10DEG: GridSpec = GridSpec {
        nx: 36,
        ny: 19,
        xmin: -180.0,
        xmax: 170.0,
        ymin: -90.0,
        ymax: 90.0,
    };

    /// OSI SAF northern hemisphere 62.5 km polar stereographic grid (metres)
    pub const OSISAF_NH_62_5KM: GridSpec = GridSpec {
        nx: 119,
        ny: 177,
        xmin: -3781250.0,
        xmax: 3593750.0,
        ymin: -5281250.0,
        ymax: 5718750.0,
    };

    /// The 4x4 unit grid on (0, 1, 2, 3) x (0, 1, 2, 3)
    pub const UNIT_4X4: GridSpec = GridSpec {
        nx: 4,
        ny: 4,
        xmin: 0.0,
        xmax: 3.0,
        ymin: 0.0,
        ymax: 3.0,
    };

    /// Regular grid layout for testing.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub nx: usize,
        pub ny: usize,
        pub xmin: f64,
        pub xmax: f64,
        pub ymin: f64,
        pub ymax: f64,
    }

    impl GridSpec {
        /// Returns the total number of grid points.
        pub fn size(&self) -> usize {
            self.nx * self.ny
        }

        /// Returns the point spacing (dx, dy).
        pub fn resolution(&self) -> (f64, f64) {
            let dx = (self.xmax - self.xmin) / (self.nx - 1) as f64;
            let dy = (self.ymax - self.ymin) / (self.ny - 1) as f64;
            (dx, dy)
        }

        /// Row-major coordinate arrays for this layout.
        pub fn coordinates(&self) -> (Vec<f64>, Vec<f64>) {
            let xs = crate::linspace(self.xmin, self.xmax, self.nx);
            let ys = crate::linspace(self.ymin, self.ymax, self.ny);
            crate::meshgrid(&xs, &ys)
        }
    }
}

/// Scenario configuration documents.
pub mod scenario {
    /// A small scenario converting a 10 degree global grid onto a 500 km
    /// polar stereographic grid.
    pub const COARSE_POLAR_YAML: &str = r#"
source:
  projection:
    kind: longlat
  layout:
    type: regular
    xstart: -180.0
    xend: 180.0
    ystart: -90.0
    yend: 95.0
    dx: 10.0
  cyclic: x
  pole:
    dim: y
    indices: [0, -1]
destination:
  projection:
    kind: polar_stereographic
    lat_ts: 70.0
    lon_0: -45.0
    semi_major: 6378273.0
    semi_minor: 6356889.44891
  layout:
    type: regular
    xstart: -3000000.0
    xend: 3000000.0
    ystart: -3000000.0
    yend: 3000000.0
    dx: 500000.0
"#;
}
