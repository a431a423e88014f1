//! Core types shared across the grid engine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Axis-aligned extent of a grid in its own projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extent {
    /// Create a new extent.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Extent of a set of points, ignoring NaN coordinates.
    pub fn from_points(x: &[f64], y: &[f64]) -> Self {
        let (xmin, xmax) = finite_range(x);
        let (ymin, ymax) = finite_range(y);
        Self::new(xmin, xmax, ymin, ymax)
    }

    /// Get the width.
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Get the height.
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Check if a point is contained within this extent (inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

fn finite_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Which grid axes wrap around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclicDim {
    #[default]
    None,
    X,
    Y,
    XY,
}

impl CyclicDim {
    pub fn x(&self) -> bool {
        matches!(self, Self::X | Self::XY)
    }

    pub fn y(&self) -> bool {
        matches!(self, Self::Y | Self::XY)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::X => "x",
            Self::Y => "y",
            Self::XY => "xy",
        }
    }
}

impl FromStr for CyclicDim {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "xy" => Ok(Self::XY),
            other => Err(GridError::invalid_option(format!(
                "unknown cyclic dimension '{}', expected none, x, y or xy",
                other
            ))),
        }
    }
}

/// The axis along which polar points are degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoleDim {
    X,
    Y,
}

impl FromStr for PoleDim {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            other => Err(GridError::invalid_option(format!(
                "unknown pole dimension '{}', expected x or y",
                other
            ))),
        }
    }
}

/// Positions along a pole axis that collapse to a single geographic point.
///
/// Indices may be negative and then count from the end of the axis, so
/// `[0, -1]` declares both the first and last row (or column) as poles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoleSpec {
    pub dim: PoleDim,
    pub indices: Vec<isize>,
}

/// Topology options supplied at grid construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridOptions {
    #[serde(default)]
    pub cyclic: CyclicDim,
    #[serde(default)]
    pub pole: Option<PoleSpec>,
}

impl GridOptions {
    /// Options for a global lon/lat grid: cyclic in x, with the first and
    /// last rows declared as poles.
    pub fn global() -> Self {
        Self {
            cyclic: CyclicDim::X,
            pole: Some(PoleSpec {
                dim: PoleDim::Y,
                indices: vec![0, -1],
            }),
        }
    }

    pub fn with_cyclic(mut self, cyclic: CyclicDim) -> Self {
        self.cyclic = cyclic;
        self
    }

    pub fn with_pole(mut self, dim: PoleDim, indices: Vec<isize>) -> Self {
        self.pole = Some(PoleSpec { dim, indices });
        self
    }
}

/// Interpolation method for grid-to-point evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpMethod {
    /// Value of the nearest cell corner or triangle vertex
    Nearest,
    /// Bilinear on regular cells, barycentric on triangles
    #[default]
    Linear,
}

impl InterpMethod {
    /// Get the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
        }
    }
}

impl FromStr for InterpMethod {
    type Err = GridError;

    /// Parse a method name. Unknown names are an error, never a fallback.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nearest" => Ok(Self::Nearest),
            "linear" => Ok(Self::Linear),
            other => Err(GridError::invalid_option(format!(
                "unknown interpolation method '{}', expected nearest or linear",
                other
            ))),
        }
    }
}

impl std::fmt::Display for InterpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A 2-component vector field, one (u, v) pair per grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    pub u: Vec<f64>,
    pub v: Vec<f64>,
}

impl VectorField {
    /// Create a vector field from its components.
    pub fn new(u: Vec<f64>, v: Vec<f64>) -> Result<Self> {
        if u.len() != v.len() {
            return Err(GridError::shape_mismatch(
                format!("v with {} values to match u", u.len()),
                v.len(),
            ));
        }
        Ok(Self { u, v })
    }

    /// Split a leading-dimension-2 stack `[u..., v...]` of `n` points each.
    pub fn from_stacked(data: &[f64], n: usize) -> Result<Self> {
        if data.len() != 2 * n {
            return Err(GridError::shape_mismatch(format!("(2, {})", n), data.len()));
        }
        let (u, v) = data.split_at(n);
        Ok(Self {
            u: u.to_vec(),
            v: v.to_vec(),
        })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.u.len()
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }

    /// Flatten back into a `[u..., v...]` stack.
    pub fn to_stacked(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(2 * self.len());
        out.extend_from_slice(&self.u);
        out.extend_from_slice(&self.v);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interp_method_parse() {
        assert_eq!("nearest".parse::<InterpMethod>().unwrap(), InterpMethod::Nearest);
        assert_eq!("linear".parse::<InterpMethod>().unwrap(), InterpMethod::Linear);
        assert!(matches!(
            "bogus".parse::<InterpMethod>(),
            Err(GridError::InvalidOption(_))
        ));
        assert_eq!(InterpMethod::Linear.to_string(), "linear");
    }

    #[test]
    fn test_cyclic_dim() {
        let c: CyclicDim = "xy".parse().unwrap();
        assert!(c.x() && c.y());
        assert!(CyclicDim::X.x() && !CyclicDim::X.y());
        assert!(!CyclicDim::None.x());
        assert!("z".parse::<CyclicDim>().is_err());
    }

    #[test]
    fn test_extent_from_points_skips_nan() {
        let e = Extent::from_points(&[1.0, f64::NAN, -2.0], &[5.0, 0.0, f64::NAN]);
        assert_eq!(e, Extent::new(-2.0, 1.0, 0.0, 5.0));
        assert_eq!(e.width(), 3.0);
        assert!(e.contains(0.0, 2.5));
        assert!(!e.contains(1.5, 2.5));
    }

    #[test]
    fn test_vector_field_stacked() {
        let field = VectorField::from_stacked(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
        assert_eq!(field.u, vec![1.0, 2.0, 3.0]);
        assert_eq!(field.v, vec![4.0, 5.0, 6.0]);
        assert_eq!(field.to_stacked(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        assert!(matches!(
            VectorField::from_stacked(&[1.0, 2.0, 3.0], 2),
            Err(GridError::ShapeMismatch { actual: 3, .. })
        ));
        assert!(VectorField::new(vec![1.0], vec![]).is_err());
    }

    #[test]
    fn test_grid_options_yaml() {
        let opts: GridOptions =
            serde_yaml::from_str("cyclic: x\npole:\n  dim: y\n  indices: [0, -1]\n").unwrap();
        assert_eq!(opts, GridOptions::global());

        let empty: GridOptions = serde_yaml::from_str("{}").unwrap();
        assert_eq!(empty, GridOptions::default());
    }
}
