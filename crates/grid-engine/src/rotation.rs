//! Vector rotation between the local axes of two projections.
//!
//! Each source point and two small perturbations of it, one along each
//! source axis, are projected into the destination coordinates. The unit
//! displacement vectors give the columns of a 2x2 matrix that maps
//! source-frame `(u, v)` to destination-frame components. Where a
//! displacement collapses to zero (a pole) the matrix is NaN; pole rows
//! are patched afterwards with [`fill_poles`].

use nalgebra::{Matrix2, Vector2};
use tracing::debug;

use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::types::{PoleDim, VectorField};

/// One rotation matrix per rotated location.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationTable {
    matrices: Vec<Matrix2<f64>>,
}

impl RotationTable {
    /// Identity rotations for `n` locations.
    pub fn identity(n: usize) -> Self {
        Self {
            matrices: vec![Matrix2::identity(); n],
        }
    }

    /// Rotation matrices at every point of `src` towards `dst`.
    ///
    /// # Arguments
    /// * `step` - Finite-difference step as a fraction of `src.dx()`
    pub fn compute(src: &Grid, dst: &Grid, step: f64) -> Self {
        Self::compute_at(src, dst, src.x(), src.y(), step)
    }

    /// Rotation matrices at arbitrary locations given in `src` coordinates.
    pub fn compute_at(src: &Grid, dst: &Grid, x: &[f64], y: &[f64], step: f64) -> Self {
        let eps = step * src.dx();
        let period_x = if dst.cyclic().x() {
            Some(dst.lx())
        } else if dst.projection().is_longlat() {
            Some(360.0)
        } else {
            None
        };
        let period_y = dst.cyclic().y().then(|| dst.ly());

        let matrices: Vec<Matrix2<f64>> = x
            .iter()
            .zip(y)
            .map(|(&xs, &ys)| {
                let (x0, y0) = src.project_point_to(dst, xs, ys);
                let (xu, yu) = src.project_point_to(dst, xs + eps, ys);
                let (xv, yv) = src.project_point_to(dst, xs, ys + eps);

                let dxu = unwrap(xu - x0, period_x);
                let dyu = unwrap(yu - y0, period_y);
                let dxv = unwrap(xv - x0, period_x);
                let dyv = unwrap(yv - y0, period_y);
                let hu = dxu.hypot(dyu);
                let hv = dxv.hypot(dyv);

                Matrix2::new(dxu / hu, dxv / hv, dyu / hu, dyv / hv)
            })
            .collect();

        let degenerate = matrices.iter().filter(|m| m.iter().any(|v| v.is_nan())).count();
        debug!(
            from = src.projection().name(),
            to = dst.projection().name(),
            points = matrices.len(),
            degenerate,
            "Computed rotation matrices"
        );
        Self { matrices }
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn matrix(&self, i: usize) -> Option<&Matrix2<f64>> {
        self.matrices.get(i)
    }

    /// Rotate a vector field defined at the table's locations.
    pub fn apply(&self, field: &VectorField) -> Result<VectorField> {
        if field.len() != self.len() {
            return Err(GridError::shape_mismatch(
                format!("{} vectors", self.len()),
                field.len(),
            ));
        }
        let (u, v): (Vec<f64>, Vec<f64>) = self
            .matrices
            .iter()
            .zip(field.u.iter().zip(&field.v))
            .map(|(m, (&u, &v))| {
                let r = m * Vector2::new(u, v);
                (r[0], r[1])
            })
            .unzip();
        Ok(VectorField { u, v })
    }
}

/// Remove whole periods from a coordinate difference that crossed a seam.
fn unwrap(delta: f64, period: Option<f64>) -> f64 {
    match period {
        Some(p) if p > 0.0 => delta - p * (delta / p).round(),
        _ => delta,
    }
}

/// Replace each declared pole row (or column) of a point field with the
/// mean of the finite values in the adjacent row (or column).
///
/// Grids without poles are left untouched.
pub fn fill_poles(grid: &Grid, field: &mut [f64]) -> Result<()> {
    grid.check_point_field(field)?;
    let (Some(pole), Some((ny, nx))) = (grid.pole(), grid.shape()) else {
        return Ok(());
    };

    for &index in &pole.indices {
        match pole.dim {
            PoleDim::Y => {
                let neighbour = if index == 0 { 1 } else { ny - 2 };
                let value = finite_mean((0..nx).map(|i| field[neighbour * nx + i]));
                field[index * nx..(index + 1) * nx].fill(value);
            }
            PoleDim::X => {
                let neighbour = if index == 0 { 1 } else { nx - 2 };
                let value = finite_mean((0..ny).map(|j| field[j * nx + neighbour]));
                for j in 0..ny {
                    field[j * nx + index] = value;
                }
            }
        }
    }
    Ok(())
}

fn finite_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
