//! # Calculation Methods
//!
//! Closed sum types over the velocity-pressure and friction-factor
//! strategies, with the accuracy and cost metadata the auto-selection
//! policy runs on. Keeping the method sets closed makes every resolver an
//! exhaustive match the compiler checks.
//!
//! ## Auto-Selection Policy
//!
//! When a caller does not pin a method, selection prefers the lowest-cost
//! method whose documented accuracy band meets the caller's tolerance,
//! with two guard rails:
//!
//! - velocities above [`HIGH_VELOCITY_THRESHOLD_FPM`] force at least the
//!   enhanced formula (the incompressible relation degrades at the top of
//!   the table range)
//! - inputs within [`BOUNDARY_PROMOTION_FRACTION`] of that threshold are
//!   promoted one accuracy step early
//!
//! The thresholds are tuning constants taken from the published
//! velocity-pressure table range, not magic numbers.

use serde::{Deserialize, Serialize};

/// Velocity above which auto-selection forces at least
/// [`VelocityPressureMethod::EnhancedFormula`] (fpm). This is the top of
/// the published velocity-pressure tables, where the incompressible
/// (v/4005)^2 relation exceeds 1 percent error at standard conditions.
pub const HIGH_VELOCITY_THRESHOLD_FPM: f64 = 6_000.0;

/// Fraction of [`HIGH_VELOCITY_THRESHOLD_FPM`] at which selection promotes
/// one accuracy step early.
pub const BOUNDARY_PROMOTION_FRACTION: f64 = 0.95;

/// Minimum velocity at which the nearest-entry lookup meets its documented
/// accuracy band (fpm); below this the 50 fpm grid is too coarse and
/// selection promotes to interpolation.
pub const LOOKUP_MIN_VELOCITY_FPM: f64 = 700.0;

/// Minimum velocity at which table interpolation meets its documented
/// accuracy band (fpm); the chord error of the 50 fpm grid dominates
/// below this and selection promotes to the enhanced formula.
pub const INTERPOLATED_MIN_VELOCITY_FPM: f64 = 200.0;

/// Default caller tolerance when none is supplied (+/- %)
pub const DEFAULT_TOLERANCE_PCT: f64 = 5.0;

/// Friction-factor tolerance at or below which auto-selection reaches for
/// the implicit Colebrook-White solution (+/- %)
pub const COMPLIANCE_GRADE_TOLERANCE_PCT: f64 = 1.0;

// ============================================================================
// Solver Parameters
// ============================================================================

/// Iteration cap for the Colebrook-White fixed-point solver
pub const COLEBROOK_MAX_ITERATIONS: u32 = 100;

/// Relative convergence tolerance for the Colebrook-White solver
pub const COLEBROOK_TOLERANCE: f64 = 1e-6;

/// Iteration cap for the inverse velocity-pressure bisection
pub const INVERSE_VP_MAX_ITERATIONS: u32 = 50;

/// Relative convergence tolerance for the inverse velocity-pressure bisection
pub const INVERSE_VP_TOLERANCE: f64 = 1e-5;

/// Iteration cap for the duct-sizing bisection
pub const SIZING_MAX_ITERATIONS: u32 = 30;

/// Relative convergence tolerance for the duct-sizing bisection (fraction
/// of the target friction rate)
pub const SIZING_TOLERANCE: f64 = 0.01;

/// Explicit iteration bounds for an iterative solver.
///
/// Passing these in the signature makes the bounded-iteration contract a
/// testable part of the API: the worst-case latency of every solver is the
/// cap times one evaluation, and a cap overrun is a typed
/// [`crate::errors::DuctError::Convergence`], never a silent partial result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    /// Hard iteration cap
    pub max_iterations: u32,
    /// Relative convergence tolerance
    pub tolerance: f64,
}

impl SolverParams {
    /// Parameters for the Colebrook-White fixed-point solver
    pub fn colebrook() -> Self {
        SolverParams {
            max_iterations: COLEBROOK_MAX_ITERATIONS,
            tolerance: COLEBROOK_TOLERANCE,
        }
    }

    /// Parameters for the inverse velocity-pressure bisection
    pub fn inverse_vp() -> Self {
        SolverParams {
            max_iterations: INVERSE_VP_MAX_ITERATIONS,
            tolerance: INVERSE_VP_TOLERANCE,
        }
    }

    /// Parameters for the duct-sizing bisection
    pub fn sizing() -> Self {
        SolverParams {
            max_iterations: SIZING_MAX_ITERATIONS,
            tolerance: SIZING_TOLERANCE,
        }
    }
}

// ============================================================================
// Cost Classes
// ============================================================================

/// Relative computational cost of a method, used by auto-selection to
/// prefer the cheapest method that meets tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CostClass {
    /// Closed-form arithmetic
    Minimal,
    /// Table index or single logarithm
    Low,
    /// Binary search plus interpolation, or several transcendentals
    Moderate,
    /// Iterative solution
    High,
}

// ============================================================================
// Velocity-Pressure Methods
// ============================================================================

/// Strategy for converting between velocity and velocity pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VelocityPressureMethod {
    /// Closed-form vp = (v/4005)^2 scaled by density ratio
    Formula,
    /// Nearest entry of the reference table, density-scaled
    Lookup,
    /// Linear interpolation between bracketing table entries
    Interpolated,
    /// Formula plus compressibility and humidity corrections
    EnhancedFormula,
    /// Enhanced formula times an empirical CFD-derived correction
    CfdCorrected,
}

impl VelocityPressureMethod {
    /// All variants, ordered cheapest first (auto-selection order)
    pub const ALL: [VelocityPressureMethod; 5] = [
        VelocityPressureMethod::Formula,
        VelocityPressureMethod::Lookup,
        VelocityPressureMethod::Interpolated,
        VelocityPressureMethod::EnhancedFormula,
        VelocityPressureMethod::CfdCorrected,
    ];

    /// Documented accuracy band (+/- % of velocity pressure)
    pub fn accuracy_pct(&self) -> f64 {
        match self {
            VelocityPressureMethod::Formula => 5.0,
            VelocityPressureMethod::Lookup => 4.0,
            VelocityPressureMethod::Interpolated => 2.0,
            VelocityPressureMethod::EnhancedFormula => 1.0,
            VelocityPressureMethod::CfdCorrected => 0.5,
        }
    }

    /// Relative cost class
    pub fn cost(&self) -> CostClass {
        match self {
            VelocityPressureMethod::Formula => CostClass::Minimal,
            VelocityPressureMethod::Lookup => CostClass::Low,
            VelocityPressureMethod::Interpolated => CostClass::Moderate,
            VelocityPressureMethod::EnhancedFormula => CostClass::Moderate,
            VelocityPressureMethod::CfdCorrected => CostClass::High,
        }
    }

    /// Stable identifier for serialization and reports
    pub fn code(&self) -> &'static str {
        match self {
            VelocityPressureMethod::Formula => "formula",
            VelocityPressureMethod::Lookup => "lookup",
            VelocityPressureMethod::Interpolated => "interpolated",
            VelocityPressureMethod::EnhancedFormula => "enhanced-formula",
            VelocityPressureMethod::CfdCorrected => "cfd-corrected",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VelocityPressureMethod::Formula => "Closed-form formula",
            VelocityPressureMethod::Lookup => "Table lookup",
            VelocityPressureMethod::Interpolated => "Interpolated table",
            VelocityPressureMethod::EnhancedFormula => "Enhanced formula",
            VelocityPressureMethod::CfdCorrected => "CFD-corrected formula",
        }
    }
}

impl std::fmt::Display for VelocityPressureMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Friction-Factor Methods
// ============================================================================

/// Strategy for the turbulent friction factor.
///
/// Laminar flow always uses the analytic f = 64/Re regardless of the
/// requested method; see the friction module for that correctness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrictionFactorMethod {
    /// Implicit Colebrook-White equation, solved iteratively
    ColebrookWhite,
    /// Swamee-Jain explicit approximation
    SwameeJain,
    /// Haaland explicit approximation
    Haaland,
    /// Chen explicit approximation
    Chen,
}

impl FrictionFactorMethod {
    /// All variants for UI selection
    pub const ALL: [FrictionFactorMethod; 4] = [
        FrictionFactorMethod::ColebrookWhite,
        FrictionFactorMethod::SwameeJain,
        FrictionFactorMethod::Haaland,
        FrictionFactorMethod::Chen,
    ];

    /// Documented accuracy band (+/- % of friction factor, against the
    /// Colebrook-White reference)
    pub fn accuracy_pct(&self) -> f64 {
        match self {
            FrictionFactorMethod::ColebrookWhite => 0.5,
            FrictionFactorMethod::SwameeJain => 3.0,
            FrictionFactorMethod::Haaland => 2.0,
            FrictionFactorMethod::Chen => 1.0,
        }
    }

    /// Relative cost class
    pub fn cost(&self) -> CostClass {
        match self {
            FrictionFactorMethod::ColebrookWhite => CostClass::High,
            FrictionFactorMethod::SwameeJain => CostClass::Low,
            FrictionFactorMethod::Haaland => CostClass::Low,
            FrictionFactorMethod::Chen => CostClass::Moderate,
        }
    }

    /// Stable identifier for serialization and reports
    pub fn code(&self) -> &'static str {
        match self {
            FrictionFactorMethod::ColebrookWhite => "colebrook-white",
            FrictionFactorMethod::SwameeJain => "swamee-jain",
            FrictionFactorMethod::Haaland => "haaland",
            FrictionFactorMethod::Chen => "chen",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FrictionFactorMethod::ColebrookWhite => "Colebrook-White (iterative)",
            FrictionFactorMethod::SwameeJain => "Swamee-Jain",
            FrictionFactorMethod::Haaland => "Haaland",
            FrictionFactorMethod::Chen => "Chen",
        }
    }
}

impl std::fmt::Display for FrictionFactorMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Method Tag
// ============================================================================

/// The method actually used by a calculation, carried on every
/// [`crate::result::CalculationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "method", rename_all = "snake_case")]
pub enum CalculationMethod {
    VelocityPressure(VelocityPressureMethod),
    FrictionFactor(FrictionFactorMethod),
}

impl CalculationMethod {
    /// Documented accuracy band (+/- %)
    pub fn accuracy_pct(&self) -> f64 {
        match self {
            CalculationMethod::VelocityPressure(m) => m.accuracy_pct(),
            CalculationMethod::FrictionFactor(m) => m.accuracy_pct(),
        }
    }

    /// Relative cost class
    pub fn cost(&self) -> CostClass {
        match self {
            CalculationMethod::VelocityPressure(m) => m.cost(),
            CalculationMethod::FrictionFactor(m) => m.cost(),
        }
    }

    /// Stable identifier
    pub fn code(&self) -> &'static str {
        match self {
            CalculationMethod::VelocityPressure(m) => m.code(),
            CalculationMethod::FrictionFactor(m) => m.code(),
        }
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Auto-Selection
// ============================================================================

/// Pick the cheapest velocity-pressure method meeting `tolerance_pct` for
/// the given velocity.
///
/// `None` tolerance means [`DEFAULT_TOLERANCE_PCT`]. See the module docs
/// for the guard rails around the high-velocity boundary.
pub fn select_vp_method(velocity_fpm: f64, tolerance_pct: Option<f64>) -> VelocityPressureMethod {
    let tolerance = tolerance_pct.unwrap_or(DEFAULT_TOLERANCE_PCT);
    let promoted = velocity_fpm > HIGH_VELOCITY_THRESHOLD_FPM * BOUNDARY_PROMOTION_FRACTION;

    if velocity_fpm > HIGH_VELOCITY_THRESHOLD_FPM {
        // Above the table range only the corrected formulas are validated
        return if tolerance < VelocityPressureMethod::EnhancedFormula.accuracy_pct() {
            VelocityPressureMethod::CfdCorrected
        } else {
            VelocityPressureMethod::EnhancedFormula
        };
    }

    let mut selected = None;
    for method in VelocityPressureMethod::ALL {
        // Table-backed methods are only valid on the table grid
        if method == VelocityPressureMethod::Lookup && velocity_fpm < LOOKUP_MIN_VELOCITY_FPM {
            continue;
        }
        if method == VelocityPressureMethod::Interpolated
            && velocity_fpm < INTERPOLATED_MIN_VELOCITY_FPM
        {
            continue;
        }
        if method.accuracy_pct() <= tolerance {
            selected = Some(method);
            break;
        }
    }
    let selected = selected.unwrap_or(VelocityPressureMethod::CfdCorrected);

    if promoted {
        // Near the documented boundary: one accuracy step early
        promote_vp(selected)
    } else {
        selected
    }
}

fn promote_vp(method: VelocityPressureMethod) -> VelocityPressureMethod {
    match method {
        VelocityPressureMethod::Formula => VelocityPressureMethod::Interpolated,
        VelocityPressureMethod::Lookup => VelocityPressureMethod::Interpolated,
        VelocityPressureMethod::Interpolated => VelocityPressureMethod::EnhancedFormula,
        VelocityPressureMethod::EnhancedFormula => VelocityPressureMethod::CfdCorrected,
        VelocityPressureMethod::CfdCorrected => VelocityPressureMethod::CfdCorrected,
    }
}

/// Pick the friction-factor method for a tolerance: explicit
/// approximations for bulk work, Colebrook-White when the caller needs
/// compliance-grade numbers.
pub fn select_friction_method(tolerance_pct: Option<f64>) -> FrictionFactorMethod {
    let tolerance = tolerance_pct.unwrap_or(DEFAULT_TOLERANCE_PCT);
    if tolerance <= COMPLIANCE_GRADE_TOLERANCE_PCT {
        FrictionFactorMethod::ColebrookWhite
    } else if tolerance <= FrictionFactorMethod::Haaland.accuracy_pct() {
        FrictionFactorMethod::Haaland
    } else {
        FrictionFactorMethod::SwameeJain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs_are_ordered() {
        assert!(CostClass::Minimal < CostClass::Low);
        assert!(CostClass::Low < CostClass::Moderate);
        assert!(CostClass::Moderate < CostClass::High);
    }

    #[test]
    fn test_default_selection_is_cheapest() {
        assert_eq!(
            select_vp_method(2000.0, None),
            VelocityPressureMethod::Formula
        );
    }

    #[test]
    fn test_tight_tolerance_selects_accurate_method() {
        assert_eq!(
            select_vp_method(2000.0, Some(1.0)),
            VelocityPressureMethod::EnhancedFormula
        );
        assert_eq!(
            select_vp_method(2000.0, Some(0.5)),
            VelocityPressureMethod::CfdCorrected
        );
        assert_eq!(
            select_vp_method(2000.0, Some(2.0)),
            VelocityPressureMethod::Interpolated
        );
    }

    #[test]
    fn test_high_velocity_forces_enhanced() {
        assert_eq!(
            select_vp_method(6500.0, None),
            VelocityPressureMethod::EnhancedFormula
        );
        assert_eq!(
            select_vp_method(6500.0, Some(0.5)),
            VelocityPressureMethod::CfdCorrected
        );
    }

    #[test]
    fn test_near_boundary_promotion() {
        // 5,800 fpm is within 5% of the 6,000 fpm boundary
        assert_eq!(
            select_vp_method(5800.0, None),
            VelocityPressureMethod::Interpolated
        );
    }

    #[test]
    fn test_low_velocity_skips_lookup() {
        // At 4% tolerance the lookup table would qualify, but not below
        // its valid velocity range
        assert_eq!(
            select_vp_method(300.0, Some(4.0)),
            VelocityPressureMethod::Interpolated
        );
        assert_eq!(
            select_vp_method(1500.0, Some(4.0)),
            VelocityPressureMethod::Lookup
        );
    }

    #[test]
    fn test_friction_selection() {
        assert_eq!(
            select_friction_method(None),
            FrictionFactorMethod::SwameeJain
        );
        assert_eq!(
            select_friction_method(Some(1.0)),
            FrictionFactorMethod::ColebrookWhite
        );
        assert_eq!(
            select_friction_method(Some(2.0)),
            FrictionFactorMethod::Haaland
        );
    }

    #[test]
    fn test_method_codes_roundtrip() {
        for method in VelocityPressureMethod::ALL {
            let json = serde_json::to_string(&method).unwrap();
            let back: VelocityPressureMethod = serde_json::from_str(&json).unwrap();
            assert_eq!(method, back);
        }
        for method in FrictionFactorMethod::ALL {
            let json = serde_json::to_string(&method).unwrap();
            let back: FrictionFactorMethod = serde_json::from_str(&json).unwrap();
            assert_eq!(method, back);
        }
    }

    #[test]
    fn test_unified_method_tag() {
        let method = CalculationMethod::VelocityPressure(VelocityPressureMethod::Formula);
        assert_eq!(method.code(), "formula");
        assert_eq!(method.cost(), CostClass::Minimal);
        let json = serde_json::to_string(&method).unwrap();
        let back: CalculationMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(method, back);
    }
}
