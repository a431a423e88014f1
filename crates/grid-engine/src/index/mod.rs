//! Point location on regular grids and triangular meshes.
//!
//! Both topologies answer the same question through [`Locator`]: which
//! cell (or triangle) encloses a query point, where inside it the point
//! lies, and which single grid point is nearest. Query coordinates are in
//! the grid's own projected coordinate space.

mod mesh;
mod regular;

pub use mesh::MeshIndex;
pub use regular::RegularIndex;

use std::fmt::Debug;

use projection::normalize_lon;

/// Enclosing stencil of a located point with its internal coordinates.
///
/// Regular cell corners are ordered A(-x,-y), B(+x,-y), C(+x,+y), D(-x,+y),
/// flattened row-major as `row * nx + col`:
///
/// ```text
/// (0,1) D-----------C (1,1)
///       |     *     |
///       |  (in_x,   |
///       |    in_y)  |
/// (0,0) A-----------B (1,0)
/// ```
///
/// `in_x` and `in_y` lie in `[0, 1)`, with one exception: a query exactly
/// on the last sample of a non-cyclic axis lands in the final cell with a
/// fraction of exactly `1.0`, so weights there go entirely to B/C or C/D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stencil {
    Quad {
        vertices: [usize; 4],
        in_x: f64,
        in_y: f64,
    },
    Triangle {
        vertices: [usize; 3],
        bary: [f64; 3],
    },
}

impl Stencil {
    /// Grid point indices of the stencil corners.
    pub fn vertices(&self) -> &[usize] {
        match self {
            Stencil::Quad { vertices, .. } => vertices,
            Stencil::Triangle { vertices, .. } => vertices,
        }
    }

    /// Linear interpolation weights, aligned with [`vertices`](Self::vertices).
    ///
    /// Bilinear weights for cells, barycentric coordinates for triangles.
    pub fn weights(&self) -> Weights {
        match *self {
            Stencil::Quad { in_x, in_y, .. } => Weights {
                values: [
                    (1.0 - in_x) * (1.0 - in_y),
                    in_x * (1.0 - in_y),
                    in_x * in_y,
                    (1.0 - in_x) * in_y,
                ],
                len: 4,
            },
            Stencil::Triangle { bary, .. } => Weights {
                values: [bary[0], bary[1], bary[2], 0.0],
                len: 3,
            },
        }
    }
}

/// Interpolation weights for up to four stencil vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    values: [f64; 4],
    len: usize,
}

impl Weights {
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    pub fn sum(&self) -> f64 {
        self.as_slice().iter().sum()
    }
}

/// A successfully located query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellHit {
    /// Enclosing element: the triangle index on meshes, the flat index of
    /// corner A on regular grids.
    pub cell: usize,
    pub stencil: Stencil,
    /// The stencil vertex closest to the query point.
    pub nearest: usize,
}

/// Point-location strategy for one grid topology.
pub trait Locator: Debug + Send + Sync {
    /// Locate a single point, `None` when it is outside the grid.
    fn locate(&self, x: f64, y: f64) -> Option<CellHit>;

    /// Locate every point of a query set.
    fn locate_all(&self, x: &[f64], y: &[f64]) -> IndexLookup {
        IndexLookup {
            hits: x.iter().zip(y).map(|(&xq, &yq)| self.locate(xq, yq)).collect(),
        }
    }
}

/// Result of locating a set of query points, one entry per query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexLookup {
    pub hits: Vec<Option<CellHit>>,
}

impl IndexLookup {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Per-query inside mask.
    pub fn inside(&self) -> Vec<bool> {
        self.hits.iter().map(Option::is_some).collect()
    }

    pub fn inside_count(&self) -> usize {
        self.hits.iter().filter(|h| h.is_some()).count()
    }

    /// Nearest grid point per query, `None` outside.
    pub fn nearest(&self) -> Vec<Option<usize>> {
        self.hits.iter().map(|h| h.map(|hit| hit.nearest)).collect()
    }
}

/// Wrapping rules applied to query coordinates before any search.
///
/// Longitude-like x is normalized to [-180, 180); cyclic axes fold the
/// coordinate into `[origin, origin + period)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisWrap {
    pub longlat: bool,
    /// `(origin, period)` for a cyclic x axis
    pub x: Option<(f64, f64)>,
    /// `(origin, period)` for a cyclic y axis
    pub y: Option<(f64, f64)>,
}

impl AxisWrap {
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let mut x = if self.longlat { normalize_lon(x) } else { x };
        let mut y = y;
        if let Some((origin, period)) = self.x {
            x = fold(x, origin, period);
        }
        if let Some((origin, period)) = self.y {
            y = fold(y, origin, period);
        }
        (x, y)
    }
}

#[inline]
fn fold(value: f64, origin: f64, period: f64) -> f64 {
    (value - origin).rem_euclid(period) + origin
}
