//! Coordinate reference system transformations.
//!
//! Implements the map projections used by the grid engine from scratch,
//! without binding to an external projection library. Every projection
//! maps geographic longitude/latitude (degrees) to planar x/y and back,
//! and optionally reports the ellipsoid it is defined on so that true
//! ground distances can be measured with [`Geodesic`].
//!
//! # Example
//!
//! ```
//! use projection::{PolarStereographic, Projection};
//!
//! let proj = PolarStereographic::osisaf_north();
//! let (x, y) = proj.forward(-45.0, 90.0);
//! assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
//! ```

pub mod definition;
pub mod ellipsoid;
pub mod geographic;
pub mod lambert;
pub mod polar;
pub mod transform;

pub use definition::{ProjectionDef, ProjectionError};
pub use ellipsoid::{Ellipsoid, Geodesic};
pub use geographic::{Cartesian, LonLat};
pub use lambert::LambertConformal;
pub use polar::PolarStereographic;
pub use transform::{normalize_lon, Projection, LONGLAT};
