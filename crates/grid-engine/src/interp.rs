//! Evaluation of grid fields at located query points.

use crate::error::Result;
use crate::grid::{FieldLocation, Grid};
use crate::index::{IndexLookup, Weights};
use crate::types::InterpMethod;

/// Located query points with their interpolation weights.
///
/// Built once per query set and applied to any number of fields on the
/// same grid.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpTable {
    lookup: IndexLookup,
    weights: Vec<Option<Weights>>,
}

impl InterpTable {
    pub fn new(lookup: IndexLookup) -> Self {
        let weights = lookup
            .hits
            .iter()
            .map(|hit| hit.map(|h| h.stencil.weights()))
            .collect();
        Self { lookup, weights }
    }

    pub fn lookup(&self) -> &IndexLookup {
        &self.lookup
    }

    /// Number of query points.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn inside_count(&self) -> usize {
        self.lookup.inside_count()
    }

    /// Interpolate `field`, defined on `grid`, to every query point.
    ///
    /// Point fields use the nearest stencil vertex or the weighted sum
    /// over the stencil. Element fields of a mesh take the value of the
    /// containing triangle whatever the method. Queries outside the grid
    /// get NaN, and NaN at any stencil vertex propagates into a linear
    /// result.
    pub fn apply(&self, grid: &Grid, field: &[f64], method: InterpMethod) -> Result<Vec<f64>> {
        let location = grid.field_location(field.len())?;

        let out = self
            .lookup
            .hits
            .iter()
            .zip(&self.weights)
            .map(|(hit, weights)| match (hit, weights, location) {
                (Some(hit), _, FieldLocation::Elements) => field[hit.cell],
                (Some(hit), _, FieldLocation::Points) if method == InterpMethod::Nearest => {
                    field[hit.nearest]
                }
                (Some(hit), Some(w), FieldLocation::Points) => hit
                    .stencil
                    .vertices()
                    .iter()
                    .zip(w.as_slice())
                    .map(|(&v, &weight)| field[v] * weight)
                    .sum(),
                _ => f64::NAN,
            })
            .collect();
        Ok(out)
    }
}
