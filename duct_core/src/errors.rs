//! # Error Types
//!
//! Structured error types for duct_core. These errors are designed to be
//! informative for both humans and LLMs, providing enough context to
//! understand and fix issues programmatically.
//!
//! Every failure carries the offending input values. The engine never
//! catches and hides a computation failure; every error propagates to the
//! caller, who decides what is user-visible.
//!
//! ## Example
//!
//! ```rust
//! use duct_core::errors::{DuctError, DuctResult};
//!
//! fn validate_airflow(airflow_cfm: f64) -> DuctResult<()> {
//!     if airflow_cfm <= 0.0 {
//!         return Err(DuctError::invalid_input(
//!             "airflow_cfm",
//!             airflow_cfm.to_string(),
//!             "Airflow must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for duct_core operations
pub type DuctResult<T> = Result<T, DuctError>;

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by LLMs and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DuctError {
    /// An input lies outside the physically validated envelope.
    ///
    /// The engine never clamps or extrapolates past the envelope; the
    /// caller must choose different inputs.
    #[error("'{field}' out of validated range: {value} (allowed {min} to {max})")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// An iterative solver exceeded its iteration cap.
    ///
    /// Signals either pathological input or an unreachable target. A
    /// partially-converged value is never returned as if final.
    #[error("{solver} did not converge after {iterations} iterations (tolerance {tolerance})")]
    Convergence {
        solver: String,
        iterations: u32,
        tolerance: f64,
    },

    /// No feasible duct dimension satisfies the sizing constraints.
    #[error("no feasible duct size: {reason} (airflow {airflow_cfm} cfm, target {target_friction_rate} in.wg/100ft)")]
    Sizing {
        reason: String,
        airflow_cfm: f64,
        target_friction_rate: f64,
    },

    /// Mismatched unit systems between collaborating calculations.
    #[error("incompatible units in {context}: expected {expected}, got {actual}")]
    IncompatibleUnits {
        expected: String,
        actual: String,
        context: String,
    },

    /// An input value is invalid (non-positive dimension, empty bracket, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },
}

impl DuctError {
    /// Create an OutOfRange error
    pub fn out_of_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        DuctError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    /// Create a Convergence error
    pub fn convergence(solver: impl Into<String>, iterations: u32, tolerance: f64) -> Self {
        DuctError::Convergence {
            solver: solver.into(),
            iterations,
            tolerance,
        }
    }

    /// Create a Sizing error
    pub fn sizing(reason: impl Into<String>, airflow_cfm: f64, target_friction_rate: f64) -> Self {
        DuctError::Sizing {
            reason: reason.into(),
            airflow_cfm,
            target_friction_rate,
        }
    }

    /// Create an IncompatibleUnits error
    pub fn incompatible_units(
        expected: impl Into<String>,
        actual: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        DuctError::IncompatibleUnits {
            expected: expected.into(),
            actual: actual.into(),
            context: context.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DuctError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (the caller can retry with
    /// different inputs; convergence failures usually indicate the target
    /// itself is unreachable)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DuctError::OutOfRange { .. } | DuctError::InvalidInput { .. } | DuctError::Sizing { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DuctError::OutOfRange { .. } => "OUT_OF_RANGE",
            DuctError::Convergence { .. } => "CONVERGENCE",
            DuctError::Sizing { .. } => "SIZING",
            DuctError::IncompatibleUnits { .. } => "INCOMPATIBLE_UNITS",
            DuctError::InvalidInput { .. } => "INVALID_INPUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = DuctError::out_of_range("temperature_f", 500.0, -40.0, 200.0);
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: DuctError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DuctError::convergence("colebrook_white", 100, 1e-6).error_code(),
            "CONVERGENCE"
        );
        assert_eq!(
            DuctError::sizing("target below achievable range", 2000.0, 0.001).error_code(),
            "SIZING"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(DuctError::out_of_range("altitude_ft", 20000.0, 0.0, 15000.0).is_recoverable());
        assert!(!DuctError::convergence("bisection", 50, 1e-5).is_recoverable());
        assert!(!DuctError::incompatible_units("in.wg", "Pa", "friction loss").is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let error = DuctError::out_of_range("temperature_f", 500.0, -40.0, 200.0);
        let text = error.to_string();
        assert!(text.contains("temperature_f"));
        assert!(text.contains("500"));
    }
}
