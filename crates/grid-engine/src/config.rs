//! Configuration for grid conversion.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::types::InterpMethod;

/// Configuration for binding and converting between two grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Default interpolation method for `convert_*` calls.
    pub interpolation: InterpMethod,

    /// Minimum number of valid source samples a destination point needs
    /// before the coarse-grained mean is used.
    pub coarsen_min_support: usize,

    /// Which value wins where both interpolation and coarsening produce one.
    pub coarsen_policy: CoarsenPolicy,

    /// Replace degenerate pole rows/columns of rotated vectors with the
    /// mean of their neighbours.
    pub fill_poles: bool,

    /// Finite-difference step for rotation matrices, as a fraction of the
    /// source grid spacing.
    pub rotation_step: f64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpMethod::Linear,
            coarsen_min_support: 2,
            coarsen_policy: CoarsenPolicy::PreferCoarsened,
            fill_poles: true,
            rotation_step: 0.1,
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| GridError::config(format!("{} has an invalid value '{}'", name, val))),
        Err(_) => Ok(None),
    }
}

impl ConvertConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults; set but unparsable variables are
    /// an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_INTERPOLATION") {
            config.interpolation = val.trim().parse()?;
        }

        if let Some(support) = env_parse("GRID_COARSEN_MIN_SUPPORT")? {
            config.coarsen_min_support = support;
        }

        if let Ok(val) = std::env::var("GRID_COARSEN_POLICY") {
            config.coarsen_policy = val.trim().parse()?;
        }

        if let Ok(val) = std::env::var("GRID_FILL_POLES") {
            config.fill_poles = match val.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(GridError::config(format!(
                        "GRID_FILL_POLES has an invalid value '{}'",
                        val
                    )))
                }
            };
        }

        if let Some(step) = env_parse("GRID_ROTATION_STEP")? {
            config.rotation_step = step;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.coarsen_min_support < 2 {
            return Err(GridError::config(
                "coarsen_min_support must be >= 2",
            ));
        }

        if !(self.rotation_step > 0.0 && self.rotation_step <= 1.0) {
            return Err(GridError::config("rotation_step must be in (0, 1]"));
        }

        Ok(())
    }
}

/// Precedence between coarse-grained and interpolated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoarsenPolicy {
    /// Coarse-grained means overwrite interpolated values where available.
    #[default]
    PreferCoarsened,
    /// Interpolated values are kept; coarse-grained means only fill gaps.
    PreferInterpolated,
}

impl CoarsenPolicy {
    /// Get the policy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreferCoarsened => "prefer_coarsened",
            Self::PreferInterpolated => "prefer_interpolated",
        }
    }
}

impl FromStr for CoarsenPolicy {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "prefer_coarsened" | "coarsened" => Ok(Self::PreferCoarsened),
            "prefer_interpolated" | "interpolated" => Ok(Self::PreferInterpolated),
            other => Err(GridError::invalid_option(format!(
                "unknown coarsen policy '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for CoarsenPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
