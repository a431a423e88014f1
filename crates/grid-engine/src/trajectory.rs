//! Streamlines traced through a vector field.
//!
//! Seeds are laid on a lattice over the grid extent and advanced with the
//! linearly interpolated velocity. Velocities are in physical units, so
//! they are scaled by the map factors to move the right distance in grid
//! coordinates.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::interp::InterpTable;
use crate::types::InterpMethod;

/// Options for [`trace_streamlines`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamlineOptions {
    /// Typical speed, in field units; defaults to a third of the largest |u|.
    pub velocity_scale: Option<f64>,
    /// Distance a streamline at `velocity_scale` covers, in grid units;
    /// defaults to 5% of the x extent.
    pub length_scale: Option<f64>,
    /// Seed spacing along x and y, relative to the length scale.
    pub spacing: (f64, f64),
    /// Velocity updates along each streamline.
    pub num_steps: usize,
}

impl Default for StreamlineOptions {
    fn default() -> Self {
        Self {
            velocity_scale: None,
            length_scale: None,
            spacing: (0.5, 0.5),
            num_steps: 10,
        }
    }
}

/// One traced streamline.
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    /// `num_steps + 1` positions, NaN after leaving the grid
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Path length in grid units
    pub length: f64,
}

/// Trace streamlines of the point field `(u, v)` on `grid`.
pub fn trace_streamlines(
    grid: &Grid,
    u: &[f64],
    v: &[f64],
    options: &StreamlineOptions,
) -> Result<Vec<Streamline>> {
    grid.check_point_field(u)?;
    grid.check_point_field(v)?;

    let extent = grid.extent();
    let velocity = options.velocity_scale.unwrap_or_else(|| {
        0.33 * u
            .iter()
            .filter(|x| !x.is_nan())
            .fold(0.0_f64, |m, x| m.max(x.abs()))
    });
    let length = options
        .length_scale
        .unwrap_or(0.05 * extent.width());
    if !(velocity > 0.0 && length > 0.0 && options.num_steps > 0) {
        return Err(GridError::invalid_configuration(format!(
            "streamlines need positive scales and steps, got V={} L={} steps={}",
            velocity, length, options.num_steps
        )));
    }
    let (sx, sy) = (options.spacing.0 * length, options.spacing.1 * length);
    if !(sx > 0.0 && sy > 0.0) {
        return Err(GridError::invalid_configuration(
            "streamline seed spacing must be positive",
        ));
    }

    let dt = length / velocity / options.num_steps as f64;
    let mf = grid.map_factors();

    let mut px = Vec::new();
    let mut py = Vec::new();
    let mut xs = extent.xmin;
    while xs < extent.xmax {
        let mut ys = extent.ymin;
        while ys < extent.ymax {
            px.push(xs);
            py.push(ys);
            ys += sy;
        }
        xs += sx;
    }

    let n = px.len();
    let mut lines: Vec<Streamline> = px
        .iter()
        .zip(&py)
        .map(|(&x, &y)| Streamline {
            x: vec![x],
            y: vec![y],
            length: 0.0,
        })
        .collect();

    for _ in 0..options.num_steps {
        let table = InterpTable::new(grid.find_index(&px, &py)?);
        let ut = table.apply(grid, u, InterpMethod::Linear)?;
        let vt = table.apply(grid, v, InterpMethod::Linear)?;
        let mfx = table.apply(grid, &mf.mfx, InterpMethod::Linear)?;
        let mfy = table.apply(grid, &mf.mfy, InterpMethod::Linear)?;

        for i in 0..n {
            let (du, dv) = (ut[i] * mfx[i], vt[i] * mfy[i]);
            px[i] += du * dt;
            py[i] += dv * dt;
            let line = &mut lines[i];
            line.x.push(px[i]);
            line.y.push(py[i]);
            line.length += du.hypot(dv) * dt;
        }
    }

    debug!(seeds = n, steps = options.num_steps, dt, "Traced streamlines");
    Ok(lines)
}
