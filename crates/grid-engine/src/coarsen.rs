//! Many-to-one averaging of source samples onto a coarser destination.
//!
//! Each source sample is assigned to the destination point nearest to it.
//! A destination point becomes the mean of its valid (non-NaN) samples,
//! but only when enough of them exist; otherwise it stays NaN so that a
//! single sample is never passed off as an area average.

use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::index::IndexLookup;

/// Assignment of source samples to destination points.
#[derive(Debug, Clone, PartialEq)]
pub struct CoarsenMap {
    targets: Vec<Option<usize>>,
    n_dst: usize,
}

impl CoarsenMap {
    /// Wrap a lookup of source samples in the destination grid.
    pub fn new(lookup: &IndexLookup, n_dst: usize) -> Self {
        Self {
            targets: lookup.nearest(),
            n_dst,
        }
    }

    /// Assign samples at `x`, `y` (in `src` coordinates) to points of `dst`.
    pub fn build(src: &Grid, dst: &Grid, x: &[f64], y: &[f64]) -> Result<Self> {
        let (qx, qy) = src.project_to(dst, x, y);
        let lookup = dst.find_index(&qx, &qy)?;
        Ok(Self::new(&lookup, dst.n_points()))
    }

    /// Number of source samples.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of source samples that landed inside the destination.
    pub fn inside_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_some()).count()
    }

    pub fn target(&self, i: usize) -> Option<usize> {
        self.targets.get(i).copied().flatten()
    }

    /// Average `field` onto the destination points.
    ///
    /// # Arguments
    /// * `field` - One value per source sample
    /// * `min_support` - Valid samples a destination point needs for a mean
    pub fn apply(&self, field: &[f64], min_support: usize) -> Result<Vec<f64>> {
        if field.len() != self.targets.len() {
            return Err(GridError::shape_mismatch(
                format!("{} source samples", self.targets.len()),
                field.len(),
            ));
        }

        let mut sum = vec![0.0; self.n_dst];
        let mut count = vec![0usize; self.n_dst];
        for (target, &value) in self.targets.iter().zip(field) {
            if let Some(t) = *target {
                if !value.is_nan() {
                    sum[t] += value;
                    count[t] += 1;
                }
            }
        }

        Ok(sum
            .into_iter()
            .zip(count)
            .map(|(s, n)| {
                if n >= min_support {
                    s / n as f64
                } else {
                    f64::NAN
                }
            })
            .collect())
    }
}
