//! Serializable grid definitions and conversion scenarios.
//!
//! A scenario file names a source and a destination grid plus the
//! conversion settings:
//!
//! ```yaml
//! source:
//!   projection: { kind: longlat }
//!   layout: { type: regular, xstart: -180.0, xend: 180.0, ystart: -90.0, yend: 91.0, dx: 1.0 }
//!   cyclic: x
//!   pole: { dim: y, indices: [0, -1] }
//! destination:
//!   projection: { kind: polar_stereographic, lat_ts: 70.0, lon_0: -45.0 }
//!   layout: { type: regular, xstart: -3e6, xend: 3e6, ystart: -3e6, yend: 3e6, dx: 25000.0 }
//! convert:
//!   coarsen_policy: prefer_coarsened
//! ```

use std::path::Path;

use projection::ProjectionDef;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ConvertConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::types::{CyclicDim, GridOptions, PoleDim, PoleSpec};

/// How the points of a grid are laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutDef {
    /// Regular lattice with half-open axis ranges, see [`Grid::regular_grid`].
    Regular {
        xstart: f64,
        xend: f64,
        ystart: f64,
        yend: f64,
        dx: f64,
        #[serde(default)]
        centered: bool,
    },
    /// Triangulated random points, see [`Grid::random_grid`].
    Random {
        xstart: f64,
        xend: f64,
        ystart: f64,
        yend: f64,
        npoints: usize,
        #[serde(default)]
        min_dist: Option<f64>,
        #[serde(default)]
        seed: u64,
    },
}

/// A complete grid description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDefinition {
    pub projection: ProjectionDef,
    pub layout: LayoutDef,
    #[serde(default)]
    pub cyclic: CyclicDim,
    #[serde(default)]
    pub pole: Option<PoleSpec>,
}

impl GridDefinition {
    pub fn options(&self) -> GridOptions {
        GridOptions {
            cyclic: self.cyclic,
            pole: self.pole.clone(),
        }
    }

    /// Build the projection and the grid.
    pub fn build(&self) -> Result<Grid> {
        let proj = self.projection.build()?;
        match self.layout {
            LayoutDef::Regular {
                xstart,
                xend,
                ystart,
                yend,
                dx,
                centered,
            } => Grid::regular_grid(proj, xstart, xend, ystart, yend, dx, centered, self.options()),
            LayoutDef::Random {
                xstart,
                xend,
                ystart,
                yend,
                npoints,
                min_dist,
                seed,
            } => Grid::random_grid(
                proj,
                xstart,
                xend,
                ystart,
                yend,
                npoints,
                min_dist,
                seed,
                self.options(),
            ),
        }
    }
}

/// Source grid, destination grid and conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub source: GridDefinition,
    pub destination: GridDefinition,
    #[serde(default)]
    pub convert: ConvertConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let scenario: Self = serde_yaml::from_str(yaml)?;
        scenario.convert.validate()?;
        Ok(scenario)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let scenario = Self::from_yaml_str(&contents)?;
        info!(path = ?path.as_ref(), "Loaded scenario");
        Ok(scenario)
    }

    /// Build both grids.
    pub fn build(&self) -> Result<(Grid, Grid)> {
        Ok((self.source.build()?, self.destination.build()?))
    }
}

impl Default for ScenarioConfig {
    /// Global 1 degree lon/lat onto the 62.5 km OSI SAF northern sea-ice
    /// grid.
    fn default() -> Self {
        Self {
            source: GridDefinition {
                projection: ProjectionDef::Longlat,
                layout: LayoutDef::Regular {
                    xstart: -180.0,
                    xend: 180.0,
                    ystart: -90.0,
                    yend: 91.0,
                    dx: 1.0,
                    centered: false,
                },
                cyclic: CyclicDim::X,
                pole: Some(PoleSpec {
                    dim: PoleDim::Y,
                    indices: vec![0, -1],
                }),
            },
            destination: GridDefinition {
                projection: ProjectionDef::PolarStereographic {
                    lat_ts: 70.0,
                    lon_0: -45.0,
                    north: true,
                    semi_major: Some(6378273.0),
                    semi_minor: Some(6356889.44891),
                },
                layout: LayoutDef::Regular {
                    xstart: -3781250.0,
                    xend: 3656250.0,
                    ystart: -5281250.0,
                    yend: 5781250.0,
                    dx: 62500.0,
                    centered: false,
                },
                cyclic: CyclicDim::None,
                pole: None,
            },
            convert: ConvertConfig::default(),
        }
    }
}
