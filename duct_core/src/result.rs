//! # Calculation Result
//!
//! Every public numeric computation returns a [`CalculationResult`], never
//! a bare number: the value travels with its unit tag, the method actually
//! used, an estimated uncertainty band, and any warnings raised along the
//! way, so callers can reason about confidence instead of trusting a
//! context-free float.

use serde::{Deserialize, Serialize};

use crate::errors::{DuctError, DuctResult};
use crate::methods::CalculationMethod;
use crate::units::Unit;

/// A computed value with its provenance.
///
/// ## JSON Example
///
/// ```json
/// {
///   "value": 0.0798,
///   "unit": "in.wg/100ft",
///   "method": { "kind": "friction_factor", "method": "colebrook-white" },
///   "uncertainty_pct": 1.12,
///   "warnings": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The computed value, in `unit`
    pub value: f64,

    /// Unit tag; preserved verbatim across serialization boundaries
    pub unit: Unit,

    /// The method actually used (after auto-selection)
    pub method: CalculationMethod,

    /// Estimated uncertainty band (+/- % of `value`): the method's
    /// documented band combined in quadrature with the air-property
    /// uncertainty
    pub uncertainty_pct: f64,

    /// Diagnostics, e.g. "outside validated range for this method"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CalculationResult {
    pub fn new(value: f64, unit: Unit, method: CalculationMethod, uncertainty_pct: f64) -> Self {
        CalculationResult {
            value,
            unit,
            method,
            uncertainty_pct,
            warnings: Vec::new(),
        }
    }

    /// Append a warning, builder-style
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Append warnings from another stage of the calculation
    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Extract the value after checking the unit tag.
    ///
    /// Collaborating calculations use this instead of reading `value`
    /// directly, so a unit mismatch surfaces as
    /// [`DuctError::IncompatibleUnits`] rather than a silently
    /// reinterpreted number.
    pub fn expect_unit(&self, unit: Unit, context: &str) -> DuctResult<f64> {
        if self.unit != unit {
            return Err(DuctError::incompatible_units(
                unit.code(),
                self.unit.code(),
                context,
            ));
        }
        Ok(self.value)
    }

    /// Absolute uncertainty bound (same unit as `value`)
    pub fn uncertainty_abs(&self) -> f64 {
        self.value.abs() * self.uncertainty_pct / 100.0
    }
}

/// Combine independent relative uncertainty bands in quadrature.
pub fn combine_uncertainty_pct(bands: &[f64]) -> f64 {
    bands.iter().map(|b| b * b).sum::<f64>().sqrt()
}
