//! Serializable projection definitions.
//!
//! Configuration files describe projections with a tagged map, e.g.
//!
//! ```yaml
//! kind: polar_stereographic
//! lat_ts: 70.0
//! lon_0: -45.0
//! semi_major: 6378273.0
//! semi_minor: 6356889.44891
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ellipsoid::Ellipsoid;
use crate::geographic::{Cartesian, LonLat};
use crate::lambert::LambertConformal;
use crate::polar::PolarStereographic;
use crate::transform::Projection;

/// Errors raised while building a projection.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Invalid projection parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ProjectionError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A projection as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionDef {
    Longlat,
    Cartesian,
    PolarStereographic {
        lat_ts: f64,
        lon_0: f64,
        #[serde(default = "default_true")]
        north: bool,
        #[serde(default)]
        semi_major: Option<f64>,
        #[serde(default)]
        semi_minor: Option<f64>,
    },
    LambertConformal {
        lat_0: f64,
        lon_0: f64,
        lat_1: f64,
        #[serde(default)]
        lat_2: Option<f64>,
    },
}

fn check_lat(name: &'static str, value: f64) -> Result<(), ProjectionError> {
    if !value.is_finite() || value.abs() > 90.0 {
        return Err(ProjectionError::invalid(
            name,
            format!("latitude must be within [-90, 90], got {}", value),
        ));
    }
    Ok(())
}

fn check_lon(name: &'static str, value: f64) -> Result<(), ProjectionError> {
    if !value.is_finite() {
        return Err(ProjectionError::invalid(name, "longitude must be finite"));
    }
    Ok(())
}

impl ProjectionDef {
    /// Validate the parameters and construct the projection.
    pub fn build(&self) -> Result<Arc<dyn Projection>, ProjectionError> {
        match self {
            ProjectionDef::Longlat => Ok(Arc::new(LonLat::new())),
            ProjectionDef::Cartesian => Ok(Arc::new(Cartesian)),
            ProjectionDef::PolarStereographic {
                lat_ts,
                lon_0,
                north,
                semi_major,
                semi_minor,
            } => {
                check_lat("lat_ts", *lat_ts)?;
                check_lon("lon_0", *lon_0)?;
                if *lat_ts == 0.0 {
                    return Err(ProjectionError::invalid(
                        "lat_ts",
                        "latitude of true scale cannot be the equator",
                    ));
                }
                let ellipsoid = match (semi_major, semi_minor) {
                    (None, None) => Ellipsoid::WGS84,
                    (Some(a), None) => Ellipsoid::sphere(*a),
                    (Some(a), Some(b)) => {
                        if !(*a > 0.0) || !(*b > 0.0) || b > a {
                            return Err(ProjectionError::invalid(
                                "semi_minor",
                                format!("expected 0 < b <= a, got a={} b={}", a, b),
                            ));
                        }
                        Ellipsoid::from_axes(*a, *b)
                    }
                    (None, Some(_)) => {
                        return Err(ProjectionError::invalid(
                            "semi_major",
                            "semi_minor given without semi_major",
                        ))
                    }
                };
                if !(ellipsoid.a > 0.0) {
                    return Err(ProjectionError::invalid(
                        "semi_major",
                        "must be positive",
                    ));
                }
                Ok(Arc::new(PolarStereographic::new(
                    *lat_ts, *lon_0, *north, ellipsoid,
                )))
            }
            ProjectionDef::LambertConformal {
                lat_0,
                lon_0,
                lat_1,
                lat_2,
            } => {
                let lat_2 = lat_2.unwrap_or(*lat_1);
                check_lat("lat_0", *lat_0)?;
                check_lon("lon_0", *lon_0)?;
                check_lat("lat_1", *lat_1)?;
                check_lat("lat_2", lat_2)?;
                if *lat_1 == 0.0 && lat_2 == 0.0 {
                    return Err(ProjectionError::invalid(
                        "lat_1",
                        "standard parallel cannot be the equator",
                    ));
                }
                if lat_1.abs() == 90.0 || lat_2.abs() == 90.0 || lat_0.abs() == 90.0 {
                    return Err(ProjectionError::invalid(
                        "lat_1",
                        "standard parallels and origin cannot be at a pole",
                    ));
                }
                if (*lat_1 + lat_2).abs() < 1e-10 {
                    return Err(ProjectionError::invalid(
                        "lat_2",
                        "standard parallels cannot be symmetric about the equator",
                    ));
                }
                Ok(Arc::new(LambertConformal::new(*lat_0, *lon_0, *lat_1, lat_2)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_polar_stereographic() {
        let yaml = "kind: polar_stereographic\nlat_ts: 70.0\nlon_0: -45.0\nsemi_major: 6378273.0\nsemi_minor: 6356889.44891\n";
        let def: ProjectionDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            def,
            ProjectionDef::PolarStereographic {
                lat_ts: 70.0,
                lon_0: -45.0,
                north: true,
                semi_major: Some(6378273.0),
                semi_minor: Some(6356889.44891),
            }
        );

        let proj = def.build().unwrap();
        assert_eq!(proj.name(), "stere");
        let reference = PolarStereographic::osisaf_north();
        let (x1, y1) = proj.forward(10.0, 75.0);
        let (x2, y2) = reference.forward(10.0, 75.0);
        assert!((x1 - x2).abs() < 1e-9 && (y1 - y2).abs() < 1e-9);
    }

    #[test]
    fn test_parse_longlat() {
        let def: ProjectionDef = serde_yaml::from_str("kind: longlat").unwrap();
        assert!(def.build().unwrap().is_longlat());
    }

    #[test]
    fn test_lambert_defaults_to_tangent() {
        let def: ProjectionDef =
            serde_json::from_str(r#"{"kind":"lambert_conformal","lat_0":38.5,"lon_0":-97.5,"lat_1":38.5}"#)
                .unwrap();
        let proj = def.build().unwrap();
        assert_eq!(proj.name(), "lcc");
    }

    #[test]
    fn test_invalid_latitude_rejected() {
        let def = ProjectionDef::PolarStereographic {
            lat_ts: 120.0,
            lon_0: 0.0,
            north: true,
            semi_major: None,
            semi_minor: None,
        };
        assert!(matches!(
            def.build(),
            Err(ProjectionError::InvalidParameter { name: "lat_ts", .. })
        ));
    }

    #[test]
    fn test_inverted_axes_rejected() {
        let def = ProjectionDef::PolarStereographic {
            lat_ts: 70.0,
            lon_0: 0.0,
            north: true,
            semi_major: Some(6356000.0),
            semi_minor: Some(6378000.0),
        };
        assert!(def.build().is_err());
    }

    #[test]
    fn test_equatorial_lambert_rejected() {
        let def = ProjectionDef::LambertConformal {
            lat_0: 0.0,
            lon_0: 0.0,
            lat_1: 0.0,
            lat_2: None,
        };
        assert!(def.build().is_err());
    }
}
