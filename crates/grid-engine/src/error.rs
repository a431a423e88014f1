//! Error types for grid construction and conversion.
//!
//! Geometric degeneracy (points outside the domain, pole singularities,
//! insufficient coarsening support) is never an error. It shows up as NaN
//! in the output arrays.

use projection::ProjectionError;
use thiserror::Error;

/// Errors that can occur while building grids or converting fields.
#[derive(Error, Debug)]
pub enum GridError {
    /// A field does not have the shape the grid expects.
    #[error("field shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: usize },

    /// An unrecognized enumerated option (e.g. interpolation method).
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Inconsistent coordinate arrays or triangulation.
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Topology options that do not fit the grid.
    #[error("invalid grid configuration: {0}")]
    InvalidConfiguration(String),

    /// Projection construction error.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GridError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(expected: impl Into<String>, actual: usize) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual,
        }
    }

    /// Create an InvalidOption error.
    pub fn invalid_option(msg: impl Into<String>) -> Self {
        Self::InvalidOption(msg.into())
    }

    /// Create an InvalidCoordinates error.
    pub fn invalid_coordinates(msg: impl Into<String>) -> Self {
        Self::InvalidCoordinates(msg.into())
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for GridError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
