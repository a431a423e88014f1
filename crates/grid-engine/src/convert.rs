//! Grid-to-grid conversion.
//!
//! Binding a destination to a source grid computes every geometric table
//! the conversion needs in one go:
//!
//! - rotation matrices from source to destination axes,
//! - the location of each destination point in the source grid,
//! - the destination point nearest to each source sample.
//!
//! The tables are returned as one immutable [`ConversionTables`] bundle.
//! Converting a field then only does arithmetic: rotate (vectors), then
//! interpolate, then merge in the coarse-grained average.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::coarsen::CoarsenMap;
use crate::config::{CoarsenPolicy, ConvertConfig};
use crate::error::{GridError, Result};
use crate::grid::{FieldLocation, Grid};
use crate::interp::InterpTable;
use crate::rotation::{fill_poles, RotationTable};
use crate::types::{InterpMethod, VectorField};

/// Precomputed geometry for one (source, destination) pair.
#[derive(Debug, Clone)]
pub struct ConversionTables {
    rotation: RotationTable,
    interp: InterpTable,
    coarsen: CoarsenMap,
    /// Present for mesh sources, evaluated at element centroids.
    rotation_elem: Option<RotationTable>,
    coarsen_elem: Option<CoarsenMap>,
}

impl ConversionTables {
    /// Compute all tables converting fields on `src` to `dst`.
    pub fn bind(src: &Grid, dst: &Grid, config: &ConvertConfig) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();

        let rotation = RotationTable::compute(src, dst, config.rotation_step);

        let (qx, qy) = src.project_from(dst, dst.x(), dst.y());
        let interp = InterpTable::new(src.find_index(&qx, &qy)?);

        let coarsen = CoarsenMap::build(src, dst, src.x(), src.y())?;

        let (rotation_elem, coarsen_elem) = match (src.x_elem(), src.y_elem()) {
            (Some(xe), Some(ye)) => (
                Some(RotationTable::compute_at(src, dst, xe, ye, config.rotation_step)),
                Some(CoarsenMap::build(src, dst, xe, ye)?),
            ),
            _ => (None, None),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            src_points = src.n_points(),
            dst_points = dst.n_points(),
            interp_inside = interp.inside_count(),
            coarsen_inside = coarsen.inside_count(),
            elapsed_ms,
            "Bound destination grid"
        );
        if interp.inside_count() == 0 {
            warn!(
                dst_points = dst.n_points(),
                "No destination point lies inside the source grid"
            );
        }

        Ok(Self {
            rotation,
            interp,
            coarsen,
            rotation_elem,
            coarsen_elem,
        })
    }

    pub fn rotation(&self) -> &RotationTable {
        &self.rotation
    }

    pub fn interp(&self) -> &InterpTable {
        &self.interp
    }

    pub fn coarsen(&self) -> &CoarsenMap {
        &self.coarsen
    }

    pub fn rotation_elem(&self) -> Option<&RotationTable> {
        self.rotation_elem.as_ref()
    }

    pub fn coarsen_elem(&self) -> Option<&CoarsenMap> {
        self.coarsen_elem.as_ref()
    }
}

/// Converts fields from a source grid to a bound destination grid.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use grid_engine::{Grid, GridConverter, GridOptions, InterpMethod};
/// use projection::Cartesian;
///
/// let src = Grid::regular_grid(Arc::new(Cartesian), 0.0, 4.0, 0.0, 4.0, 1.0, false, GridOptions::default())?;
/// let dst = Grid::regular_grid(Arc::new(Cartesian), 0.5, 3.0, 0.5, 3.0, 1.0, false, GridOptions::default())?;
///
/// let field: Vec<f64> = (0..16).map(|i| i as f64).collect();
/// let converter = GridConverter::new(&src, &dst)?;
/// let out = converter.convert_scalar(&field, InterpMethod::Linear)?;
/// assert_eq!(out[0], 2.5);
/// # Ok::<(), grid_engine::GridError>(())
/// ```
#[derive(Debug)]
pub struct GridConverter<'a> {
    src: &'a Grid,
    dst: &'a Grid,
    config: ConvertConfig,
    tables: ConversionTables,
}

impl<'a> GridConverter<'a> {
    /// Bind `dst` to `src` with the default configuration.
    pub fn new(src: &'a Grid, dst: &'a Grid) -> Result<Self> {
        Self::with_config(src, dst, ConvertConfig::default())
    }

    pub fn with_config(src: &'a Grid, dst: &'a Grid, config: ConvertConfig) -> Result<Self> {
        let tables = ConversionTables::bind(src, dst, &config)?;
        Ok(Self {
            src,
            dst,
            config,
            tables,
        })
    }

    /// Bind a new destination grid.
    ///
    /// On error the previous destination and its tables stay in place.
    pub fn rebind(&mut self, dst: &'a Grid) -> Result<()> {
        let tables = ConversionTables::bind(self.src, dst, &self.config)?;
        self.dst = dst;
        self.tables = tables;
        Ok(())
    }

    pub fn src(&self) -> &Grid {
        self.src
    }

    pub fn dst(&self) -> &Grid {
        self.dst
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub fn tables(&self) -> &ConversionTables {
        &self.tables
    }

    /// Interpolate a source field to the destination points.
    pub fn interp(&self, field: &[f64], method: InterpMethod) -> Result<Vec<f64>> {
        self.tables.interp.apply(self.src, field, method)
    }

    /// Interpolate a source field to arbitrary points in source coordinates.
    pub fn interp_at(
        &self,
        field: &[f64],
        qx: &[f64],
        qy: &[f64],
        method: InterpMethod,
    ) -> Result<Vec<f64>> {
        InterpTable::new(self.src.find_index(qx, qy)?).apply(self.src, field, method)
    }

    /// Average a source field onto the destination points.
    pub fn coarsen(&self, field: &[f64]) -> Result<Vec<f64>> {
        let map = match self.src.field_location(field.len())? {
            FieldLocation::Points => &self.tables.coarsen,
            FieldLocation::Elements => self.tables.coarsen_elem.as_ref().ok_or_else(|| {
                GridError::shape_mismatch(format!("{} points", self.src.n_points()), field.len())
            })?,
        };
        map.apply(field, self.config.coarsen_min_support)
    }

    /// Rotate a source vector field into the destination axes.
    ///
    /// Point fields on grids with poles get their pole rows filled when
    /// `fill_poles` is enabled.
    pub fn rotate_vectors(&self, field: &VectorField) -> Result<VectorField> {
        match self.src.field_location(field.len())? {
            FieldLocation::Points => {
                let mut rotated = self.tables.rotation.apply(field)?;
                if self.config.fill_poles {
                    fill_poles(self.src, &mut rotated.u)?;
                    fill_poles(self.src, &mut rotated.v)?;
                }
                Ok(rotated)
            }
            FieldLocation::Elements => match &self.tables.rotation_elem {
                Some(table) => table.apply(field),
                None => Err(GridError::shape_mismatch(
                    format!("{} points", self.src.n_points()),
                    field.len(),
                )),
            },
        }
    }

    /// Convert a scalar field to the destination grid.
    pub fn convert_scalar(&self, field: &[f64], method: InterpMethod) -> Result<Vec<f64>> {
        let start = Instant::now();
        let out = self.interp_and_coarsen(field, method)?;
        debug!(
            points = out.len(),
            valid = out.iter().filter(|v| !v.is_nan()).count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Converted scalar field"
        );
        Ok(out)
    }

    /// Convert a vector field to the destination grid, rotating it first.
    pub fn convert_vector(&self, field: &VectorField, method: InterpMethod) -> Result<VectorField> {
        let start = Instant::now();
        let rotated = self.rotate_vectors(field)?;
        let u = self.interp_and_coarsen(&rotated.u, method)?;
        let v = self.interp_and_coarsen(&rotated.v, method)?;
        debug!(
            points = u.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Converted vector field"
        );
        Ok(VectorField { u, v })
    }

    fn interp_and_coarsen(&self, field: &[f64], method: InterpMethod) -> Result<Vec<f64>> {
        let mut out = self.interp(field, method)?;
        let coarse = self.coarsen(field)?;
        merge(&mut out, &coarse, self.config.coarsen_policy);
        Ok(out)
    }
}

fn merge(out: &mut [f64], coarse: &[f64], policy: CoarsenPolicy) {
    for (o, &c) in out.iter_mut().zip(coarse) {
        if c.is_nan() {
            continue;
        }
        match policy {
            CoarsenPolicy::PreferCoarsened => *o = c,
            CoarsenPolicy::PreferInterpolated if o.is_nan() => *o = c,
            CoarsenPolicy::PreferInterpolated => {}
        }
    }
}
