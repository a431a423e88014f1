//! Point-in-triangle search on an unstructured mesh.
//!
//! Triangles are bucketed on a uniform grid laid over the mesh extent.
//! A query visits only the triangles whose bounding boxes overlap its
//! bucket, in ascending triangle order, so a point on an edge shared by
//! two triangles always resolves to the lower triangle index.

use nalgebra::{Matrix2, Vector2};
use tracing::debug;

use super::{CellHit, Locator, Stencil};

/// Barycentric coordinates within this tolerance below zero still count
/// as inside.
const INSIDE_TOLERANCE: f64 = 1e-12;

/// Maps `(x - x2, y - y2)` to the first two barycentric coordinates.
#[derive(Debug, Clone, Copy)]
struct BarycentricTransform {
    inverse: Matrix2<f64>,
    x2: f64,
    y2: f64,
}

#[derive(Debug, Clone)]
pub struct MeshIndex {
    triangles: Vec<[usize; 3]>,
    transforms: Vec<Option<BarycentricTransform>>,
    x0: f64,
    y0: f64,
    bucket_w: f64,
    bucket_h: f64,
    nbx: usize,
    nby: usize,
    xmax: f64,
    ymax: f64,
    buckets: Vec<Vec<usize>>,
}

impl MeshIndex {
    /// Build the index for a triangulated point set.
    ///
    /// Degenerate (zero-area) triangles are kept in the connectivity but
    /// can never contain a query point.
    pub fn new(x: &[f64], y: &[f64], triangles: &[[usize; 3]]) -> Self {
        let transforms: Vec<Option<BarycentricTransform>> = triangles
            .iter()
            .map(|t| {
                let (x0, y0) = (x[t[0]], y[t[0]]);
                let (x1, y1) = (x[t[1]], y[t[1]]);
                let (x2, y2) = (x[t[2]], y[t[2]]);
                let edges = Matrix2::new(x0 - x2, x1 - x2, y0 - y2, y1 - y2);
                let det = edges.determinant();
                if det == 0.0 || !det.is_finite() {
                    return None;
                }
                edges
                    .try_inverse()
                    .map(|inverse| BarycentricTransform { inverse, x2, y2 })
            })
            .collect();

        let (mut xmin, mut xmax, mut ymin, mut ymax) =
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for t in triangles {
            for &v in t {
                xmin = xmin.min(x[v]);
                xmax = xmax.max(x[v]);
                ymin = ymin.min(y[v]);
                ymax = ymax.max(y[v]);
            }
        }

        let side = ((triangles.len() as f64).sqrt().ceil() as usize).max(1);
        let (nbx, nby) = (side, side);
        let bucket_w = if xmax > xmin { (xmax - xmin) / nbx as f64 } else { 1.0 };
        let bucket_h = if ymax > ymin { (ymax - ymin) / nby as f64 } else { 1.0 };

        let mut index = Self {
            triangles: triangles.to_vec(),
            transforms,
            x0: xmin,
            y0: ymin,
            bucket_w,
            bucket_h,
            nbx,
            nby,
            xmax,
            ymax,
            buckets: vec![Vec::new(); nbx * nby],
        };

        for (t, tri) in triangles.iter().enumerate() {
            let (mut lo_x, mut hi_x, mut lo_y, mut hi_y) =
                (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
            for &v in tri {
                lo_x = lo_x.min(x[v]);
                hi_x = hi_x.max(x[v]);
                lo_y = lo_y.min(y[v]);
                hi_y = hi_y.max(y[v]);
            }
            let (bx0, by0) = (index.column(lo_x), index.row(lo_y));
            let (bx1, by1) = (index.column(hi_x), index.row(hi_y));
            for by in by0..=by1 {
                for bx in bx0..=bx1 {
                    index.buckets[by * nbx + bx].push(t);
                }
            }
        }

        debug!(
            triangles = triangles.len(),
            buckets = nbx * nby,
            "Built mesh index"
        );
        index
    }

    fn column(&self, x: f64) -> usize {
        (((x - self.x0) / self.bucket_w).floor().max(0.0) as usize).min(self.nbx - 1)
    }

    fn row(&self, y: f64) -> usize {
        (((y - self.y0) / self.bucket_h).floor().max(0.0) as usize).min(self.nby - 1)
    }

    /// Barycentric coordinates of a point in triangle `t`, if it is
    /// non-degenerate.
    pub fn barycentric(&self, t: usize, x: f64, y: f64) -> Option<[f64; 3]> {
        let tr = self.transforms.get(t).copied().flatten()?;
        let in12 = tr.inverse * Vector2::new(x - tr.x2, y - tr.y2);
        Some([in12[0], in12[1], 1.0 - in12[0] - in12[1]])
    }
}

impl Locator for MeshIndex {
    fn locate(&self, x: f64, y: f64) -> Option<CellHit> {
        if !(x >= self.x0 && x <= self.xmax && y >= self.y0 && y <= self.ymax) {
            return None;
        }
        let bucket = &self.buckets[self.row(y) * self.nbx + self.column(x)];

        for &t in bucket {
            let Some(bary) = self.barycentric(t, x, y) else {
                continue;
            };
            if bary.iter().all(|&w| w >= -INSIDE_TOLERANCE) {
                let vertices = self.triangles[t];
                let mut k = 0;
                for i in 1..3 {
                    if bary[i] > bary[k] {
                        k = i;
                    }
                }
                return Some(CellHit {
                    cell: t,
                    stencil: Stencil::Triangle { vertices, bary },
                    nearest: vertices[k],
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0---1---2 on y=0 and 3---4---5 on y=1, split into four triangles
    fn strip() -> (Vec<f64>, Vec<f64>, Vec<[usize; 3]>) {
        let x = vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0];
        let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let triangles = vec![[0, 1, 4], [0, 4, 3], [1, 2, 5], [1, 5, 4]];
        (x, y, triangles)
    }

    #[test]
    fn test_barycentric_sums_to_one() {
        let (x, y, tris) = strip();
        let index = MeshIndex::new(&x, &y, &tris);
        let hit = index.locate(0.6, 0.2).unwrap();
        assert_eq!(hit.cell, 0);
        let w = hit.stencil.weights();
        assert!((w.sum() - 1.0).abs() < 1e-12);
        assert!(w.as_slice().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_vertex_weights() {
        let (x, y, tris) = strip();
        let index = MeshIndex::new(&x, &y, &tris);
        let bary = index.barycentric(0, 1.0, 0.0).unwrap();
        assert!((bary[1] - 1.0).abs() < 1e-12);
        assert!(bary[0].abs() < 1e-12 && bary[2].abs() < 1e-12);
    }

    #[test]
    fn test_nearest_is_largest_weight() {
        let (x, y, tris) = strip();
        let index = MeshIndex::new(&x, &y, &tris);
        let hit = index.locate(1.9, 0.1).unwrap();
        assert_eq!(hit.cell, 2);
        assert_eq!(hit.nearest, 2);
        assert!(hit.stencil.vertices().contains(&hit.nearest));
    }

    #[test]
    fn test_shared_edge_resolves_to_lowest_triangle() {
        let (x, y, tris) = strip();
        let index = MeshIndex::new(&x, &y, &tris);
        // on the diagonal 0-4 shared by triangles 0 and 1
        let hit = index.locate(0.5, 0.5).unwrap();
        assert_eq!(hit.cell, 0);
        // on the vertical edge 1-4 shared by triangles 0 and 3
        let hit = index.locate(1.0, 0.5).unwrap();
        assert_eq!(hit.cell, 0);
    }

    #[test]
    fn test_outside_mesh() {
        let (x, y, tris) = strip();
        let index = MeshIndex::new(&x, &y, &tris);
        assert!(index.locate(2.5, 0.5).is_none());
        assert!(index.locate(1.0, -0.01).is_none());
        assert!(index.locate(f64::NAN, 0.5).is_none());
    }

    #[test]
    fn test_degenerate_triangle_never_contains() {
        let x = vec![0.0, 1.0, 2.0, 0.0];
        let y = vec![0.0, 0.0, 0.0, 1.0];
        let index = MeshIndex::new(&x, &y, &[[0, 1, 2], [0, 1, 3]]);
        assert!(index.barycentric(0, 0.5, 0.0).is_none());
        let hit = index.locate(0.5, 0.0).unwrap();
        assert_eq!(hit.cell, 1);
    }
}
