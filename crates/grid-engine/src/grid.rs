//! The grid: projected point geometry, topology and derived quantities.
//!
//! A [`Grid`] is immutable once built. Everything that depends on a
//! second grid (rotation, interpolation and coarsening tables) lives in
//! [`ConversionTables`](crate::convert::ConversionTables), not here. The
//! only lazily filled state is the map-factor cache.

use std::sync::{Arc, OnceLock};

use projection::{normalize_lon, Projection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{GridError, Result};
use crate::index::{AxisWrap, CellHit, IndexLookup, Locator, MeshIndex, RegularIndex};
use crate::map_factor::MapFactors;
use crate::triangulation::delaunay;
use crate::types::{CyclicDim, Extent, GridOptions, PoleDim};

/// Edges within this fraction of their triangle's mean edge length make
/// the triangle count as near-equilateral for mesh spacing.
const EQUILATERAL_TOLERANCE: f64 = 0.3;

/// Candidate draws allowed per requested point in [`Grid::random_grid`].
const ATTEMPTS_PER_POINT: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub enum Topology {
    /// Logically rectangular lattice, row-major `(ny, nx)`.
    Regular { nx: usize, ny: usize },
    /// Triangulated point cloud with per-element centroids.
    Unstructured {
        triangles: Vec<[usize; 3]>,
        x_elem: Vec<f64>,
        y_elem: Vec<f64>,
    },
}

/// Where the values of a field live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    Points,
    Elements,
}

/// Pole rows or columns resolved to absolute positions on their axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pole {
    pub dim: PoleDim,
    pub indices: Vec<usize>,
}

#[derive(Debug)]
pub struct Grid {
    projection: Arc<dyn Projection>,
    x: Vec<f64>,
    y: Vec<f64>,
    topology: Topology,
    cyclic: CyclicDim,
    pole: Option<Pole>,
    extent: Extent,
    dx: f64,
    dy: f64,
    lx: f64,
    ly: f64,
    wrap: AxisWrap,
    locator: Box<dyn Locator>,
    map_factors: OnceLock<MapFactors>,
}

impl Grid {
    /// Build a regular grid from row-major `(ny, nx)` coordinate arrays.
    ///
    /// # Arguments
    /// * `projection` - Projection the coordinates are expressed in
    /// * `x`, `y` - Flattened coordinates, `nx * ny` values each
    /// * `nx`, `ny` - Grid dimensions, at least 2 each
    /// * `options` - Cyclic axes and pole rows/columns
    pub fn regular(
        projection: Arc<dyn Projection>,
        x: Vec<f64>,
        y: Vec<f64>,
        nx: usize,
        ny: usize,
        options: GridOptions,
    ) -> Result<Self> {
        if nx < 2 || ny < 2 {
            return Err(GridError::invalid_coordinates(format!(
                "regular grid needs at least 2x2 points, got {}x{}",
                nx, ny
            )));
        }
        if x.len() != nx * ny || y.len() != nx * ny {
            return Err(GridError::invalid_coordinates(format!(
                "coordinate arrays of length {} and {} do not match a {}x{} grid",
                x.len(),
                y.len(),
                ny,
                nx
            )));
        }
        check_finite(&x, &y)?;

        let longlat = projection.is_longlat();
        let x = if longlat { normalized(x) } else { x };

        let extent = Extent::from_points(&x, &y);
        let dx = extent.width() / (nx - 1) as f64;
        let dy = extent.height() / (ny - 1) as f64;
        let (lx, ly) = (nx as f64 * dx, ny as f64 * dy);

        let pole = match &options.pole {
            Some(spec) => {
                let len = match spec.dim {
                    PoleDim::X => nx,
                    PoleDim::Y => ny,
                };
                let indices = spec
                    .indices
                    .iter()
                    .map(|&i| resolve_pole_index(i, len))
                    .collect::<Result<Vec<_>>>()?;
                Some(Pole {
                    dim: spec.dim,
                    indices,
                })
            }
            None => None,
        };

        let wrap = AxisWrap {
            longlat,
            x: options.cyclic.x().then_some((extent.xmin, lx)),
            y: options.cyclic.y().then_some((extent.ymin, ly)),
        };
        let locator = Box::new(RegularIndex::new(&x, &y, nx, ny, wrap));

        debug!(
            projection = projection.name(),
            nx,
            ny,
            dx,
            dy,
            cyclic = options.cyclic.as_str(),
            "Built regular grid"
        );

        Ok(Self {
            projection,
            x,
            y,
            topology: Topology::Regular { nx, ny },
            cyclic: options.cyclic,
            pole,
            extent,
            dx,
            dy,
            lx,
            ly,
            wrap,
            locator,
            map_factors: OnceLock::new(),
        })
    }

    /// Build an unstructured grid from scattered points.
    ///
    /// When `triangles` is `None` the points are Delaunay-triangulated.
    /// Cyclic axes and poles only exist on regular grids, so any such
    /// option is rejected.
    pub fn unstructured(
        projection: Arc<dyn Projection>,
        x: Vec<f64>,
        y: Vec<f64>,
        triangles: Option<Vec<[usize; 3]>>,
        options: GridOptions,
    ) -> Result<Self> {
        if options.cyclic != CyclicDim::None || options.pole.is_some() {
            return Err(GridError::invalid_configuration(
                "cyclic and pole options apply to regular grids only",
            ));
        }
        if x.len() != y.len() {
            return Err(GridError::invalid_coordinates(format!(
                "x has {} points but y has {}",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 3 {
            return Err(GridError::invalid_coordinates(format!(
                "a mesh needs at least 3 points, got {}",
                x.len()
            )));
        }
        check_finite(&x, &y)?;

        let longlat = projection.is_longlat();
        let x = if longlat { normalized(x) } else { x };

        let triangles = match triangles {
            Some(t) => t,
            None => delaunay(&x, &y)?,
        };
        if triangles.is_empty() {
            return Err(GridError::invalid_coordinates("mesh has no triangles"));
        }
        if let Some(t) = triangles.iter().find(|t| t.iter().any(|&v| v >= x.len())) {
            return Err(GridError::invalid_coordinates(format!(
                "triangle {:?} references a point outside 0..{}",
                t,
                x.len()
            )));
        }

        let (x_elem, y_elem): (Vec<f64>, Vec<f64>) = triangles
            .iter()
            .map(|t| {
                (
                    (x[t[0]] + x[t[1]] + x[t[2]]) / 3.0,
                    (y[t[0]] + y[t[1]] + y[t[2]]) / 3.0,
                )
            })
            .unzip();

        let extent = Extent::from_points(&x, &y);
        let dx = mesh_spacing(&x, &y, &triangles);
        let (lx, ly) = (extent.width(), extent.height());

        let wrap = AxisWrap {
            longlat,
            x: None,
            y: None,
        };
        let locator = Box::new(MeshIndex::new(&x, &y, &triangles));

        debug!(
            projection = projection.name(),
            points = x.len(),
            triangles = triangles.len(),
            dx,
            "Built unstructured grid"
        );

        Ok(Self {
            projection,
            x,
            y,
            topology: Topology::Unstructured {
                triangles,
                x_elem,
                y_elem,
            },
            cyclic: CyclicDim::None,
            pole: None,
            extent,
            dx,
            dy: dx,
            lx,
            ly,
            wrap,
            locator,
            map_factors: OnceLock::new(),
        })
    }

    /// Build a regular grid from half-open axis ranges.
    ///
    /// Both axes use the same spacing `dx`. With `centered` each sample is
    /// shifted half a cell, so the points sit at cell centres of the
    /// `[start, end)` partition.
    #[allow(clippy::too_many_arguments)]
    pub fn regular_grid(
        projection: Arc<dyn Projection>,
        xstart: f64,
        xend: f64,
        ystart: f64,
        yend: f64,
        dx: f64,
        centered: bool,
        options: GridOptions,
    ) -> Result<Self> {
        if !(dx > 0.0 && dx.is_finite()) {
            return Err(GridError::invalid_configuration(format!(
                "grid spacing must be positive, got {}",
                dx
            )));
        }
        let offset = if centered { 0.5 * dx } else { 0.0 };
        let xs = arange(xstart, xend, dx, offset);
        let ys = arange(ystart, yend, dx, offset);
        let (nx, ny) = (xs.len(), ys.len());

        let mut x = Vec::with_capacity(nx * ny);
        let mut y = Vec::with_capacity(nx * ny);
        for &yv in &ys {
            for &xv in &xs {
                x.push(xv);
                y.push(yv);
            }
        }
        Self::regular(projection, x, y, nx, ny, options)
    }

    /// Build a triangulated grid from uniformly sampled random points.
    ///
    /// With `min_dist`, a candidate is rejected when it lies within
    /// `min_dist` of an accepted point along both axes. Sampling gives up
    /// with `InvalidConfiguration` after a bounded number of draws.
    #[allow(clippy::too_many_arguments)]
    pub fn random_grid(
        projection: Arc<dyn Projection>,
        xstart: f64,
        xend: f64,
        ystart: f64,
        yend: f64,
        npoints: usize,
        min_dist: Option<f64>,
        seed: u64,
        options: GridOptions,
    ) -> Result<Self> {
        if !(xstart < xend && ystart < yend) {
            return Err(GridError::invalid_configuration(format!(
                "empty sampling domain [{}, {}) x [{}, {})",
                xstart, xend, ystart, yend
            )));
        }
        if npoints < 3 {
            return Err(GridError::invalid_configuration(format!(
                "a random mesh needs at least 3 points, got {}",
                npoints
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut x: Vec<f64> = Vec::with_capacity(npoints);
        let mut y: Vec<f64> = Vec::with_capacity(npoints);
        let mut attempts = 0;
        while x.len() < npoints {
            if attempts == npoints * ATTEMPTS_PER_POINT {
                return Err(GridError::invalid_configuration(format!(
                    "could not place {} points at least {:?} apart, placed {}",
                    npoints,
                    min_dist,
                    x.len()
                )));
            }
            attempts += 1;

            let xc = rng.gen_range(xstart..xend);
            let yc = rng.gen_range(ystart..yend);
            if let Some(d) = min_dist {
                let crowded = x
                    .iter()
                    .zip(&y)
                    .any(|(&xp, &yp)| (xc - xp).abs() <= d && (yc - yp).abs() <= d);
                if crowded {
                    continue;
                }
            }
            x.push(xc);
            y.push(yc);
        }

        debug!(npoints, attempts, seed, "Sampled random mesh points");
        Self::unstructured(projection, x, y, None, options)
    }

    pub fn projection(&self) -> &Arc<dyn Projection> {
        &self.projection
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn n_points(&self) -> usize {
        self.x.len()
    }

    /// Number of triangles; zero for regular grids.
    pub fn n_elements(&self) -> usize {
        match &self.topology {
            Topology::Regular { .. } => 0,
            Topology::Unstructured { triangles, .. } => triangles.len(),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn is_regular(&self) -> bool {
        matches!(self.topology, Topology::Regular { .. })
    }

    /// `(ny, nx)` for regular grids.
    pub fn shape(&self) -> Option<(usize, usize)> {
        match self.topology {
            Topology::Regular { nx, ny } => Some((ny, nx)),
            Topology::Unstructured { .. } => None,
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Period of the x axis, `nx * dx`.
    pub fn lx(&self) -> f64 {
        self.lx
    }

    /// Period of the y axis, `ny * dy`.
    pub fn ly(&self) -> f64 {
        self.ly
    }

    pub fn cyclic(&self) -> CyclicDim {
        self.cyclic
    }

    pub fn pole(&self) -> Option<&Pole> {
        self.pole.as_ref()
    }

    pub fn triangles(&self) -> Option<&[[usize; 3]]> {
        match &self.topology {
            Topology::Unstructured { triangles, .. } => Some(triangles),
            Topology::Regular { .. } => None,
        }
    }

    /// Element centroid x coordinates of a mesh.
    pub fn x_elem(&self) -> Option<&[f64]> {
        match &self.topology {
            Topology::Unstructured { x_elem, .. } => Some(x_elem),
            Topology::Regular { .. } => None,
        }
    }

    /// Element centroid y coordinates of a mesh.
    pub fn y_elem(&self) -> Option<&[f64]> {
        match &self.topology {
            Topology::Unstructured { y_elem, .. } => Some(y_elem),
            Topology::Regular { .. } => None,
        }
    }

    /// Wrap a coordinate into this grid's fundamental domain.
    pub fn wrap(&self, x: f64, y: f64) -> (f64, f64) {
        self.wrap.apply(x, y)
    }

    /// Locate one point given in this grid's coordinates.
    pub fn locate(&self, x: f64, y: f64) -> Option<CellHit> {
        let (x, y) = self.wrap.apply(x, y);
        self.locator.locate(x, y)
    }

    /// Locate a set of query points given in this grid's coordinates.
    pub fn find_index(&self, qx: &[f64], qy: &[f64]) -> Result<IndexLookup> {
        if qx.len() != qy.len() {
            return Err(GridError::shape_mismatch(
                format!("{} query y values to match x", qx.len()),
                qy.len(),
            ));
        }
        let (wx, wy): (Vec<f64>, Vec<f64>) = qx
            .iter()
            .zip(qy)
            .map(|(&x, &y)| self.wrap.apply(x, y))
            .unzip();
        Ok(self.locator.locate_all(&wx, &wy))
    }

    /// Map factors, computed on first access.
    pub fn map_factors(&self) -> &MapFactors {
        self.map_factors.get_or_init(|| MapFactors::compute(self))
    }

    /// Classify a field by its length.
    ///
    /// Element fields are only accepted on unstructured grids.
    pub fn field_location(&self, len: usize) -> Result<FieldLocation> {
        if len == self.n_points() {
            return Ok(FieldLocation::Points);
        }
        match &self.topology {
            Topology::Unstructured { triangles, .. } if len == triangles.len() => {
                Ok(FieldLocation::Elements)
            }
            Topology::Unstructured { triangles, .. } => Err(GridError::shape_mismatch(
                format!("{} points or {} elements", self.n_points(), triangles.len()),
                len,
            )),
            Topology::Regular { nx, ny } => {
                Err(GridError::shape_mismatch(format!("({}, {})", ny, nx), len))
            }
        }
    }

    /// Check that a field is defined at this grid's points.
    pub fn check_point_field(&self, field: &[f64]) -> Result<()> {
        if field.len() != self.n_points() {
            return Err(GridError::shape_mismatch(
                format!("{} points", self.n_points()),
                field.len(),
            ));
        }
        Ok(())
    }

    /// Transform one point from this grid's coordinates into `dst`'s,
    /// wrapped into `dst`'s fundamental domain.
    pub fn project_point_to(&self, dst: &Grid, x: f64, y: f64) -> (f64, f64) {
        let (lon, lat) = self.projection.inverse(x, y);
        let (xd, yd) = dst.projection.forward(lon, lat);
        dst.wrap.apply(xd, yd)
    }

    /// Transform coordinates from this grid's projection into `dst`'s.
    pub fn project_to(&self, dst: &Grid, x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
        x.iter()
            .zip(y)
            .map(|(&xs, &ys)| self.project_point_to(dst, xs, ys))
            .unzip()
    }

    /// Transform coordinates from `dst`'s projection into this grid's.
    pub fn project_from(&self, dst: &Grid, x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
        dst.project_to(self, x, y)
    }

    /// Values at the cell corners surrounding every grid point.
    ///
    /// Interior corners average the four adjacent points; border corners
    /// are extrapolated to second order from the three nearest interior
    /// corners. Each point gets its corners in `[A, B, C, D]` order.
    pub fn cell_corners(&self, field: &[f64]) -> Result<Vec<[f64; 4]>> {
        let (nx, ny) = match self.topology {
            Topology::Regular { nx, ny } if nx >= 4 && ny >= 4 => (nx, ny),
            _ => {
                return Err(GridError::invalid_configuration(
                    "cell corners need a regular grid of at least 4x4 points",
                ))
            }
        };
        self.check_point_field(field)?;

        let w = nx + 1;
        let mut c = vec![0.0; (ny + 1) * w];
        for j in 1..ny {
            for i in 1..nx {
                c[j * w + i] = 0.25
                    * (field[(j - 1) * nx + i - 1]
                        + field[(j - 1) * nx + i]
                        + field[j * nx + i - 1]
                        + field[j * nx + i]);
            }
        }
        for i in 1..nx {
            c[i] = 3.0 * c[w + i] - 3.0 * c[2 * w + i] + c[3 * w + i];
            c[ny * w + i] =
                3.0 * c[(ny - 1) * w + i] - 3.0 * c[(ny - 2) * w + i] + c[(ny - 3) * w + i];
        }
        for j in 0..=ny {
            let row = j * w;
            c[row] = 3.0 * c[row + 1] - 3.0 * c[row + 2] + c[row + 3];
            c[row + nx] = 3.0 * c[row + nx - 1] - 3.0 * c[row + nx - 2] + c[row + nx - 3];
        }

        let mut corners = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                corners.push([
                    c[j * w + i],
                    c[j * w + i + 1],
                    c[(j + 1) * w + i + 1],
                    c[(j + 1) * w + i],
                ]);
            }
        }
        Ok(corners)
    }
}

fn check_finite(x: &[f64], y: &[f64]) -> Result<()> {
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(GridError::invalid_coordinates(
            "grid coordinates must be finite",
        ));
    }
    Ok(())
}

fn normalized(mut x: Vec<f64>) -> Vec<f64> {
    for v in &mut x {
        *v = normalize_lon(*v);
    }
    x
}

fn resolve_pole_index(index: isize, len: usize) -> Result<usize> {
    let resolved = if index < 0 {
        len as isize + index
    } else {
        index
    };
    if resolved == 0 || resolved == len as isize - 1 {
        Ok(resolved as usize)
    } else {
        Err(GridError::invalid_configuration(format!(
            "pole index {} is not the first or last position of an axis of length {}",
            index, len
        )))
    }
}

fn arange(start: f64, end: f64, step: f64, offset: f64) -> Vec<f64> {
    let n = ((end - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step + offset).collect()
}

/// Mean edge length of the near-equilateral triangles, or of all
/// triangles when none qualify.
fn mesh_spacing(x: &[f64], y: &[f64], triangles: &[[usize; 3]]) -> f64 {
    let mut all = (0.0, 0usize);
    let mut regular = (0.0, 0usize);
    for t in triangles {
        let edges = [
            (x[t[1]] - x[t[0]]).hypot(y[t[1]] - y[t[0]]),
            (x[t[2]] - x[t[1]]).hypot(y[t[2]] - y[t[1]]),
            (x[t[0]] - x[t[2]]).hypot(y[t[0]] - y[t[2]]),
        ];
        let mean = edges.iter().sum::<f64>() / 3.0;
        all = (all.0 + mean, all.1 + 1);
        if edges
            .iter()
            .all(|&e| (e - mean).abs() <= EQUILATERAL_TOLERANCE * mean)
        {
            regular = (regular.0 + mean, regular.1 + 1);
        }
    }
    let (sum, count) = if regular.1 > 0 { regular } else { all };
    sum / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::{Cartesian, LonLat};

    use crate::types::PoleSpec;

    fn cartesian() -> Arc<dyn Projection> {
        Arc::new(Cartesian)
    }

    fn unit_4x4() -> Grid {
        Grid::regular_grid(cartesian(), 0.0, 4.0, 0.0, 4.0, 1.0, false, GridOptions::default())
            .unwrap()
    }

    #[test]
    fn test_regular_grid_layout() {
        let grid = unit_4x4();
        assert_eq!(grid.shape(), Some((4, 4)));
        assert_eq!(grid.n_points(), 16);
        assert_eq!(grid.x()[5], 1.0);
        assert_eq!(grid.y()[5], 1.0);
        assert_eq!(grid.dx(), 1.0);
        assert_eq!(grid.dy(), 1.0);
        assert_eq!(grid.lx(), 4.0);
        assert_eq!(grid.extent(), Extent::new(0.0, 3.0, 0.0, 3.0));
        assert!(grid.is_regular());
        assert_eq!(grid.n_elements(), 0);
    }

    #[test]
    fn test_regular_grid_centered() {
        let grid =
            Grid::regular_grid(cartesian(), 0.0, 4.0, 0.0, 2.0, 1.0, true, GridOptions::default())
                .unwrap();
        assert_eq!(grid.shape(), Some((2, 4)));
        assert_eq!(&grid.x()[..4], &[0.5, 1.5, 2.5, 3.5]);
        assert_eq!(grid.y()[4], 1.5);
    }

    #[test]
    fn test_regular_rejects_bad_shapes() {
        let err = Grid::regular(cartesian(), vec![0.0; 6], vec![0.0; 5], 3, 2, GridOptions::default());
        assert!(matches!(err, Err(GridError::InvalidCoordinates(_))));
        let err = Grid::regular(cartesian(), vec![0.0; 3], vec![0.0; 3], 3, 1, GridOptions::default());
        assert!(matches!(err, Err(GridError::InvalidCoordinates(_))));
        let err = Grid::regular_grid(cartesian(), 0.0, 1.0, 0.0, 1.0, 0.0, false, GridOptions::default());
        assert!(matches!(err, Err(GridError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_longlat_normalized_on_construction() {
        let grid = Grid::regular_grid(
            Arc::new(LonLat::new()),
            0.0,
            360.0,
            -90.0,
            100.0,
            10.0,
            false,
            GridOptions::global(),
        )
        .unwrap();
        assert!(grid.x().iter().all(|&x| (-180.0..180.0).contains(&x)));
        assert_eq!(grid.x()[18], -180.0);
        assert_eq!(grid.lx(), 360.0);
        assert_eq!(
            grid.pole(),
            Some(&Pole {
                dim: PoleDim::Y,
                indices: vec![0, 18]
            })
        );

        // 175E sits between the last column and the seam at 180
        let hit = grid.locate(175.0, 0.0).unwrap();
        assert_eq!(&hit.stencil.vertices()[..2], &[9 * 36 + 17, 9 * 36 + 18]);
        // 185E is 175W
        let hit = grid.locate(185.0, 0.0).unwrap();
        assert_eq!(&hit.stencil.vertices()[..2], &[9 * 36 + 18, 9 * 36 + 19]);
    }

    #[test]
    fn test_pole_must_be_an_axis_end() {
        let options = GridOptions {
            cyclic: CyclicDim::X,
            pole: Some(PoleSpec {
                dim: PoleDim::Y,
                indices: vec![1],
            }),
        };
        let err = Grid::regular_grid(cartesian(), 0.0, 4.0, 0.0, 4.0, 1.0, false, options);
        assert!(matches!(err, Err(GridError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_unstructured_rejects_options() {
        let x = vec![0.0, 1.0, 0.0];
        let y = vec![0.0, 0.0, 1.0];
        let err = Grid::unstructured(cartesian(), x.clone(), y.clone(), None, GridOptions::global());
        assert!(matches!(err, Err(GridError::InvalidConfiguration(_))));

        let err = Grid::unstructured(cartesian(), x, y, Some(vec![[0, 1, 3]]), GridOptions::default());
        assert!(matches!(err, Err(GridError::InvalidCoordinates(_))));
    }

    #[test]
    fn test_mesh_spacing_and_centroids() {
        let x = vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0];
        let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let tris = vec![[0, 1, 4], [0, 4, 3], [1, 2, 5], [1, 5, 4]];
        let grid = Grid::unstructured(cartesian(), x, y, Some(tris), GridOptions::default()).unwrap();

        let expected = (2.0 + 2f64.sqrt()) / 3.0;
        assert!((grid.dx() - expected).abs() < 1e-12);
        assert_eq!(grid.dy(), grid.dx());
        assert_eq!(grid.n_elements(), 4);
        let xe = grid.x_elem().unwrap();
        let ye = grid.y_elem().unwrap();
        assert!((xe[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((ye[0] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_random_grid_is_seeded_and_spaced() {
        let a = Grid::random_grid(cartesian(), 0.0, 10.0, 0.0, 10.0, 40, Some(0.5), 7, GridOptions::default())
            .unwrap();
        let b = Grid::random_grid(cartesian(), 0.0, 10.0, 0.0, 10.0, 40, Some(0.5), 7, GridOptions::default())
            .unwrap();
        assert_eq!(a.x(), b.x());
        assert_eq!(a.triangles(), b.triangles());
        assert_eq!(a.n_points(), 40);

        for p in 0..40 {
            for q in (p + 1)..40 {
                let close = (a.x()[p] - a.x()[q]).abs() <= 0.5 && (a.y()[p] - a.y()[q]).abs() <= 0.5;
                assert!(!close, "points {} and {} too close", p, q);
            }
        }
        assert!(a.x().iter().all(|&x| (0.0..10.0).contains(&x)));
    }

    #[test]
    fn test_random_grid_impossible_density() {
        let err = Grid::random_grid(cartesian(), 0.0, 1.0, 0.0, 1.0, 50, Some(0.5), 1, GridOptions::default());
        assert!(matches!(err, Err(GridError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_field_location() {
        let grid = unit_4x4();
        assert_eq!(grid.field_location(16).unwrap(), FieldLocation::Points);
        assert!(matches!(
            grid.field_location(9),
            Err(GridError::ShapeMismatch { actual: 9, .. })
        ));

        let mesh = Grid::unstructured(
            cartesian(),
            vec![0.0, 1.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0],
            None,
            GridOptions::default(),
        )
        .unwrap();
        assert_eq!(mesh.field_location(2).unwrap(), FieldLocation::Elements);
        assert_eq!(mesh.field_location(4).unwrap(), FieldLocation::Points);
        assert!(mesh.field_location(3).is_err());
    }

    #[test]
    fn test_find_index_length_mismatch() {
        let grid = unit_4x4();
        assert!(matches!(
            grid.find_index(&[1.0, 2.0], &[1.0]),
            Err(GridError::ShapeMismatch { .. })
        ));
        let lookup = grid.find_index(&[1.5, 5.0], &[1.5, 1.0]).unwrap();
        assert_eq!(lookup.inside(), vec![true, false]);
    }

    #[test]
    fn test_project_to_same_projection_is_identity() {
        let grid = unit_4x4();
        let (x, y) = grid.project_to(&grid, grid.x(), grid.y());
        assert_eq!(x, grid.x());
        assert_eq!(y, grid.y());
        let (xb, yb) = grid.project_from(&grid, &x, &y);
        assert_eq!(xb, grid.x());
        assert_eq!(yb, grid.y());
    }

    #[test]
    fn test_cell_corners_linear_field() {
        let grid = unit_4x4();
        let f = |x: f64, y: f64| 1.0 + 2.0 * x + 3.0 * y;
        let field: Vec<f64> = grid.x().iter().zip(grid.y()).map(|(&x, &y)| f(x, y)).collect();
        let corners = grid.cell_corners(&field).unwrap();
        assert_eq!(corners.len(), 16);

        for (p, c) in corners.iter().enumerate() {
            let (x, y) = (grid.x()[p], grid.y()[p]);
            let expected = [
                f(x - 0.5, y - 0.5),
                f(x + 0.5, y - 0.5),
                f(x + 0.5, y + 0.5),
                f(x - 0.5, y + 0.5),
            ];
            for k in 0..4 {
                assert!((c[k] - expected[k]).abs() < 1e-9, "point {} corner {}", p, k);
            }
        }
    }

    #[test]
    fn test_cell_corners_needs_4x4() {
        let grid =
            Grid::regular_grid(cartesian(), 0.0, 3.0, 0.0, 3.0, 1.0, false, GridOptions::default())
                .unwrap();
        assert!(matches!(
            grid.cell_corners(&[0.0; 9]),
            Err(GridError::InvalidConfiguration(_))
        ));
    }
}
