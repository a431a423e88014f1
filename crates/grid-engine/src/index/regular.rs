//! Cell search on a logically rectangular grid.
//!
//! The grid axes are taken from the first row (x) and first column (y) of
//! the coordinate arrays. They need not be monotonic: each axis is sorted
//! once at construction, remembering the original column/row index of
//! every sorted sample. A cyclic axis gets one extra synthetic sample one
//! period past its first value, mapped back to the first sample's index,
//! so the interval across the seam is found like any other.
//!
//! Queries must already be wrapped into the grid's fundamental domain
//! (see [`AxisWrap`]).

use super::{AxisWrap, CellHit, Locator, Stencil};

#[derive(Debug, Clone)]
pub struct RegularIndex {
    nx: usize,
    xs: Vec<f64>,
    cols: Vec<usize>,
    ys: Vec<f64>,
    rows: Vec<usize>,
}

impl RegularIndex {
    /// Build the index for row-major `(ny, nx)` coordinate arrays.
    ///
    /// # Arguments
    /// * `x`, `y` - Flattened coordinates, already normalized for the
    ///   grid's projection
    /// * `nx`, `ny` - Grid dimensions
    /// * `wrap` - Wrapping rules of the grid; the period of each cyclic
    ///   axis controls its padding
    pub fn new(x: &[f64], y: &[f64], nx: usize, ny: usize, wrap: AxisWrap) -> Self {
        let xi: Vec<f64> = x[..nx].to_vec();
        let yi: Vec<f64> = (0..ny).map(|j| y[j * nx]).collect();
        let (xs, cols) = sorted_axis(&xi, wrap.x.map(|(_, period)| period));
        let (ys, rows) = sorted_axis(&yi, wrap.y.map(|(_, period)| period));
        Self {
            nx,
            xs,
            cols,
            ys,
            rows,
        }
    }
}

fn sorted_axis(values: &[f64], period: Option<f64>) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let mut sorted: Vec<f64> = order.iter().map(|&i| values[i]).collect();

    if let (Some(period), Some(&first), Some(&first_idx)) = (period, sorted.first(), order.first()) {
        let pad = first + period;
        if !sorted.contains(&pad) {
            sorted.push(pad);
            order.push(first_idx);
        }
    }
    (sorted, order)
}

/// Find the sorted-axis interval holding `q` and the fractional position
/// within it.
///
/// Searches with "side right" semantics: an exact hit on a sample opens the
/// interval that starts there. The last sample itself closes the final
/// interval with fraction 1, so every sample of the grid is locatable.
fn bracket(axis: &[f64], q: f64) -> Option<(usize, f64)> {
    let k = axis.partition_point(|&v| v <= q);
    if k == 0 {
        return None;
    }
    if k == axis.len() {
        if k >= 2 && q == axis[k - 1] {
            return Some((k - 2, 1.0));
        }
        return None;
    }
    let lo = axis[k - 1];
    let hi = axis[k];
    Some((k - 1, (q - lo) / (hi - lo)))
}

impl Locator for RegularIndex {
    fn locate(&self, x: f64, y: f64) -> Option<CellHit> {
        let (i, in_x) = bracket(&self.xs, x)?;
        let (j, in_y) = bracket(&self.ys, y)?;

        let (c0, c1) = (self.cols[i], self.cols[i + 1]);
        let (r0, r1) = (self.rows[j], self.rows[j + 1]);
        let nx = self.nx;

        let vertices = [r0 * nx + c0, r0 * nx + c1, r1 * nx + c1, r1 * nx + c0];
        let col = if in_x < 0.5 { c0 } else { c1 };
        let row = if in_y < 0.5 { r0 } else { r1 };

        Some(CellHit {
            cell: vertices[0],
            stencil: Stencil::Quad {
                vertices,
                in_x,
                in_y,
            },
            nearest: row * nx + col,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid(nx: usize, ny: usize) -> (Vec<f64>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for j in 0..ny {
            for i in 0..nx {
                x.push(i as f64);
                y.push(j as f64);
            }
        }
        (x, y)
    }

    #[test]
    fn test_locate_cell_center() {
        let (x, y) = unit_grid(4, 4);
        let index = RegularIndex::new(&x, &y, 4, 4, AxisWrap::default());

        let hit = index.locate(1.5, 1.5).unwrap();
        assert_eq!(hit.stencil.vertices(), &[5, 6, 10, 9]);
        assert_eq!(hit.cell, 5);
        assert_eq!(hit.nearest, 10);
        match hit.stencil {
            Stencil::Quad { in_x, in_y, .. } => {
                assert_eq!(in_x, 0.5);
                assert_eq!(in_y, 0.5);
            }
            _ => panic!("expected a quad stencil"),
        }
    }

    #[test]
    fn test_nearest_follows_half_cell() {
        let (x, y) = unit_grid(4, 4);
        let index = RegularIndex::new(&x, &y, 4, 4, AxisWrap::default());
        assert_eq!(index.locate(1.2, 1.3).unwrap().nearest, 5);
        assert_eq!(index.locate(1.7, 1.3).unwrap().nearest, 6);
        assert_eq!(index.locate(1.2, 1.8).unwrap().nearest, 9);
    }

    #[test]
    fn test_outside_points() {
        let (x, y) = unit_grid(4, 4);
        let index = RegularIndex::new(&x, &y, 4, 4, AxisWrap::default());
        assert!(index.locate(-0.1, 1.0).is_none());
        assert!(index.locate(1.0, 3.01).is_none());
        assert!(index.locate(f64::NAN, 1.0).is_none());
        assert!(index.locate(1.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_samples_are_locatable() {
        let (x, y) = unit_grid(4, 4);
        let index = RegularIndex::new(&x, &y, 4, 4, AxisWrap::default());
        for p in 0..16 {
            let hit = index.locate(x[p], y[p]).unwrap();
            assert_eq!(hit.nearest, p, "sample {}", p);
        }
        let corner = index.locate(3.0, 3.0).unwrap();
        assert_eq!(corner.stencil.vertices(), &[10, 11, 15, 14]);
        assert_eq!(corner.nearest, 15);
        assert_eq!(corner.stencil.weights().as_slice(), &[0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_last_sample_closes_final_cell() {
        let (x, y) = unit_grid(4, 4);
        let index = RegularIndex::new(&x, &y, 4, 4, AxisWrap::default());
        match index.locate(3.0, 1.5).unwrap().stencil {
            Stencil::Quad { vertices, in_x, in_y } => {
                assert_eq!(vertices, [6, 7, 11, 10]);
                assert_eq!(in_x, 1.0);
                assert_eq!(in_y, 0.5);
            }
            _ => panic!("expected a quad stencil"),
        }
    }

    #[test]
    fn test_non_monotonic_axis() {
        // columns run right to left
        let xs = [3.0, 2.0, 1.0, 0.0];
        let mut x = Vec::new();
        let mut y = Vec::new();
        for j in 0..3 {
            for &xv in &xs {
                x.push(xv);
                y.push(j as f64);
            }
        }
        let index = RegularIndex::new(&x, &y, 4, 3, AxisWrap::default());
        let hit = index.locate(0.25, 0.0).unwrap();
        // x=0 is column 3, x=1 is column 2
        assert_eq!(hit.stencil.vertices(), &[3, 2, 6, 7]);
        assert_eq!(hit.nearest, 3);
    }

    #[test]
    fn test_cyclic_seam() {
        let nx = 36;
        let mut x = Vec::new();
        let mut y = Vec::new();
        for j in 0..3 {
            for i in 0..nx {
                x.push(i as f64 * 10.0);
                y.push(j as f64);
            }
        }
        let wrap = AxisWrap {
            longlat: false,
            x: Some((0.0, 360.0)),
            y: None,
        };
        let index = RegularIndex::new(&x, &y, nx, 3, wrap);

        let hit = index.locate(355.0, 0.5).unwrap();
        assert_eq!(hit.stencil.vertices(), &[35, 0, nx, nx + 35]);

        let (qx, qy) = wrap.apply(365.0, 0.5);
        let wrapped = index.locate(qx, qy).unwrap();
        let direct = index.locate(5.0, 0.5).unwrap();
        assert_eq!(wrapped, direct);
    }
}
