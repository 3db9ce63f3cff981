//! # Duct Geometry
//!
//! Cross-section geometry for rectangular, round, and flat-oval ducts.
//! Derives the quantities every downstream calculation needs: flow area,
//! wetted perimeter, hydraulic diameter (4A/P), circular equivalent
//! diameter, and aspect ratio.
//!
//! ## Equivalent Diameter
//!
//! The circular equivalent diameter is the round-duct size with the same
//! friction loss at the same airflow, used for radius-ratio checks and
//! round-duct substitution recommendations:
//!
//! - Rectangular: De = 1.30 (wh)^0.625 / (w+h)^0.25  (Huebscher)
//! - Flat oval:   De = 1.55 A^0.625 / P^0.25
//! - Round:       De = D
//!
//! ## Example
//!
//! ```rust
//! use duct_core::geometry::DuctGeometry;
//!
//! let duct = DuctGeometry::Rectangular { width_in: 24.0, height_in: 12.0 };
//! assert!((duct.hydraulic_diameter_in() - 16.0).abs() < 1e-9);
//! assert!((duct.aspect_ratio() - 2.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{DuctError, DuctResult};

/// Huebscher rectangular equivalent-diameter coefficient
pub const RECTANGULAR_EQUIVALENT_COEFF: f64 = 1.30;

/// Flat-oval equivalent-diameter coefficient
pub const FLAT_OVAL_EQUIVALENT_COEFF: f64 = 1.55;

/// Area exponent shared by both equivalent-diameter relations
pub const EQUIVALENT_AREA_EXPONENT: f64 = 0.625;

/// Perimeter exponent shared by both equivalent-diameter relations
pub const EQUIVALENT_PERIMETER_EXPONENT: f64 = 0.25;

/// Duct cross-section shape and dimensions.
///
/// All dimensions are inside clear dimensions in inches.
///
/// ## JSON Examples
///
/// ```json
/// { "shape": "rectangular", "width_in": 24.0, "height_in": 12.0 }
/// { "shape": "round", "diameter_in": 14.0 }
/// { "shape": "flat_oval", "major_in": 30.0, "minor_in": 10.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DuctGeometry {
    /// Rectangular duct
    Rectangular { width_in: f64, height_in: f64 },
    /// Round (spiral or longitudinal-seam) duct
    Round { diameter_in: f64 },
    /// Flat-oval duct: two semicircular ends of the minor-axis diameter
    /// joined by flat sides spanning to the major axis
    FlatOval { major_in: f64, minor_in: f64 },
}

impl DuctGeometry {
    /// Validate dimensional invariants: all dimensions positive, flat-oval
    /// major axis at least the minor axis.
    pub fn validate(&self) -> DuctResult<()> {
        match *self {
            DuctGeometry::Rectangular { width_in, height_in } => {
                if width_in <= 0.0 {
                    return Err(DuctError::invalid_input(
                        "width_in",
                        width_in.to_string(),
                        "Width must be positive",
                    ));
                }
                if height_in <= 0.0 {
                    return Err(DuctError::invalid_input(
                        "height_in",
                        height_in.to_string(),
                        "Height must be positive",
                    ));
                }
            }
            DuctGeometry::Round { diameter_in } => {
                if diameter_in <= 0.0 {
                    return Err(DuctError::invalid_input(
                        "diameter_in",
                        diameter_in.to_string(),
                        "Diameter must be positive",
                    ));
                }
            }
            DuctGeometry::FlatOval { major_in, minor_in } => {
                if minor_in <= 0.0 {
                    return Err(DuctError::invalid_input(
                        "minor_in",
                        minor_in.to_string(),
                        "Minor axis must be positive",
                    ));
                }
                if major_in < minor_in {
                    return Err(DuctError::invalid_input(
                        "major_in",
                        major_in.to_string(),
                        "Major axis must be at least the minor axis",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Shape name for reports and error messages
    pub fn shape_name(&self) -> &'static str {
        match self {
            DuctGeometry::Rectangular { .. } => "rectangular",
            DuctGeometry::Round { .. } => "round",
            DuctGeometry::FlatOval { .. } => "flat oval",
        }
    }

    /// Cross-sectional flow area (in2)
    pub fn area_in2(&self) -> f64 {
        match *self {
            DuctGeometry::Rectangular { width_in, height_in } => width_in * height_in,
            DuctGeometry::Round { diameter_in } => {
                std::f64::consts::PI * diameter_in * diameter_in / 4.0
            }
            DuctGeometry::FlatOval { major_in, minor_in } => {
                std::f64::consts::PI * minor_in * minor_in / 4.0
                    + minor_in * (major_in - minor_in)
            }
        }
    }

    /// Cross-sectional flow area (ft2)
    pub fn area_ft2(&self) -> f64 {
        self.area_in2() / 144.0
    }

    /// Wetted perimeter (in)
    pub fn perimeter_in(&self) -> f64 {
        match *self {
            DuctGeometry::Rectangular { width_in, height_in } => 2.0 * (width_in + height_in),
            DuctGeometry::Round { diameter_in } => std::f64::consts::PI * diameter_in,
            DuctGeometry::FlatOval { major_in, minor_in } => {
                std::f64::consts::PI * minor_in + 2.0 * (major_in - minor_in)
            }
        }
    }

    /// Hydraulic diameter Dh = 4A/P (in)
    pub fn hydraulic_diameter_in(&self) -> f64 {
        4.0 * self.area_in2() / self.perimeter_in()
    }

    /// Hydraulic diameter (ft)
    pub fn hydraulic_diameter_ft(&self) -> f64 {
        self.hydraulic_diameter_in() / 12.0
    }

    /// Circular equivalent diameter (in): the round duct with the same
    /// friction loss at the same airflow.
    pub fn equivalent_diameter_in(&self) -> f64 {
        match *self {
            DuctGeometry::Rectangular { width_in, height_in } => {
                RECTANGULAR_EQUIVALENT_COEFF
                    * (width_in * height_in).powf(EQUIVALENT_AREA_EXPONENT)
                    / (width_in + height_in).powf(EQUIVALENT_PERIMETER_EXPONENT)
            }
            DuctGeometry::Round { diameter_in } => diameter_in,
            DuctGeometry::FlatOval { .. } => {
                FLAT_OVAL_EQUIVALENT_COEFF * self.area_in2().powf(EQUIVALENT_AREA_EXPONENT)
                    / self.perimeter_in().powf(EQUIVALENT_PERIMETER_EXPONENT)
            }
        }
    }

    /// Aspect ratio: longer side over shorter side (1.0 for round).
    pub fn aspect_ratio(&self) -> f64 {
        match *self {
            DuctGeometry::Rectangular { width_in, height_in } => {
                width_in.max(height_in) / width_in.min(height_in)
            }
            DuctGeometry::Round { .. } => 1.0,
            DuctGeometry::FlatOval { major_in, minor_in } => major_in / minor_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_derived_values() {
        let duct = DuctGeometry::Rectangular {
            width_in: 24.0,
            height_in: 12.0,
        };
        duct.validate().unwrap();
        assert_eq!(duct.area_in2(), 288.0);
        assert_eq!(duct.area_ft2(), 2.0);
        assert_eq!(duct.perimeter_in(), 72.0);
        assert_eq!(duct.hydraulic_diameter_in(), 16.0);
        assert_eq!(duct.aspect_ratio(), 2.0);
        // Huebscher: 1.30 * 288^0.625 / 36^0.25 = 18.28 in
        assert!((duct.equivalent_diameter_in() - 18.28).abs() < 0.01);
    }

    #[test]
    fn test_round_derived_values() {
        let duct = DuctGeometry::Round { diameter_in: 14.0 };
        duct.validate().unwrap();
        assert!((duct.hydraulic_diameter_in() - 14.0).abs() < 1e-9);
        assert_eq!(duct.equivalent_diameter_in(), 14.0);
        assert_eq!(duct.aspect_ratio(), 1.0);
        assert!((duct.area_in2() - 153.938).abs() < 0.001);
    }

    #[test]
    fn test_flat_oval_derived_values() {
        let duct = DuctGeometry::FlatOval {
            major_in: 30.0,
            minor_in: 10.0,
        };
        duct.validate().unwrap();
        // A = pi*100/4 + 10*20 = 278.54, P = pi*10 + 40 = 71.416
        assert!((duct.area_in2() - 278.5398).abs() < 0.001);
        assert!((duct.perimeter_in() - 71.4159).abs() < 0.001);
        assert!((duct.hydraulic_diameter_in() - 15.601).abs() < 0.01);
        assert_eq!(duct.aspect_ratio(), 3.0);
    }

    #[test]
    fn test_degenerate_flat_oval_is_round() {
        let oval = DuctGeometry::FlatOval {
            major_in: 12.0,
            minor_in: 12.0,
        };
        let round = DuctGeometry::Round { diameter_in: 12.0 };
        assert!((oval.area_in2() - round.area_in2()).abs() < 1e-9);
        assert!((oval.hydraulic_diameter_in() - round.hydraulic_diameter_in()).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(DuctGeometry::Rectangular {
            width_in: -1.0,
            height_in: 12.0
        }
        .validate()
        .is_err());
        assert!(DuctGeometry::Round { diameter_in: 0.0 }.validate().is_err());
        assert!(DuctGeometry::FlatOval {
            major_in: 8.0,
            minor_in: 10.0
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_shape_tag_serialization() {
        let duct = DuctGeometry::Round { diameter_in: 14.0 };
        let json = serde_json::to_string(&duct).unwrap();
        assert!(json.contains("\"shape\":\"round\""));
        let roundtrip: DuctGeometry = serde_json::from_str(&json).unwrap();
        assert_eq!(duct, roundtrip);
    }
}
