//! Grid-to-grid conversion engine
//!
//! Moves scalar and vector fields between grids that may live in
//! different projections. A grid is either a regular lattice or an
//! unstructured set of points joined into triangles. Converting a field
//! combines:
//!
//! - **Interpolation**: nearest or (bi)linear evaluation at each
//!   destination point
//! - **Coarse-graining**: averaging source samples onto a coarser
//!   destination, so that small features are not aliased away
//! - **Vector rotation**: turning components from source grid axes to
//!   destination grid axes, with map-factor aware stepping
//! - **Pole fill**: replacing the undefined rotated values on a pole row
//!
//! # Architecture
//!
//! ```text
//! GridConverter::new(src, dst)
//!      │
//!      └─► ConversionTables::bind
//!               ├─► RotationTable   (src axes -> dst axes)
//!               ├─► InterpTable     (dst points located in src)
//!               └─► CoarsenMap      (src samples located in dst)
//!
//! convert_vector(field)
//!      │
//!      ├─► rotate + fill poles
//!      ├─► interpolate
//!      └─► coarsen, merge by CoarsenPolicy
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use grid_engine::{Grid, GridConverter, GridOptions, InterpMethod};
//! use projection::Cartesian;
//!
//! # fn main() -> Result<(), grid_engine::GridError> {
//! let src = Grid::regular_grid(Arc::new(Cartesian), 0.0, 4.0, 0.0, 4.0, 1.0, false, GridOptions::default())?;
//! let dst = Grid::regular_grid(Arc::new(Cartesian), 0.5, 3.0, 0.5, 3.0, 1.0, false, GridOptions::default())?;
//!
//! let converter = GridConverter::new(&src, &dst)?;
//! let field: Vec<f64> = src.x().iter().zip(src.y()).map(|(x, y)| x + y).collect();
//! let out = converter.convert_scalar(&field, InterpMethod::Linear)?;
//! assert_eq!(out.len(), dst.n_points());
//! # Ok(())
//! # }
//! ```

pub mod coarsen;
pub mod config;
pub mod convert;
pub mod definition;
pub mod error;
pub mod grid;
pub mod index;
pub mod interp;
pub mod map_factor;
pub mod progress;
pub mod rotation;
pub mod trajectory;
pub mod triangulation;
pub mod types;

// Re-export commonly used types at crate root
pub use coarsen::CoarsenMap;
pub use config::{CoarsenPolicy, ConvertConfig};
pub use convert::{ConversionTables, GridConverter};
pub use definition::{GridDefinition, LayoutDef, ScenarioConfig};
pub use error::{GridError, Result};
pub use grid::{FieldLocation, Grid, Pole, Topology};
pub use index::{CellHit, IndexLookup, Locator, Stencil, Weights};
pub use interp::InterpTable;
pub use map_factor::MapFactors;
pub use progress::{progress_bar, ProgressReporter};
pub use rotation::{fill_poles, RotationTable};
pub use trajectory::{trace_streamlines, Streamline, StreamlineOptions};
pub use triangulation::delaunay;
pub use types::{CyclicDim, Extent, GridOptions, InterpMethod, PoleDim, PoleSpec, VectorField};
