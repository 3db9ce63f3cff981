//! # Velocity-Pressure Resolution
//!
//! Converts between air velocity and velocity pressure using a selectable
//! strategy, with a bounded-bisection inverse solver and per-method
//! uncertainty estimation.
//!
//! ## Methods
//!
//! All five strategies reduce to the published relation
//! vp = (v / 4005)^2 at standard air, corrected for actual density:
//!
//! - **formula**: the closed form alone - fastest, degrades at the
//!   extremes of the range
//! - **lookup**: nearest entry of the reference table - fixed cost
//! - **interpolated**: linear interpolation between bracketing entries
//! - **enhanced-formula**: formula with compressibility and humidity
//!   correction terms
//! - **cfd-corrected**: enhanced formula times an empirical correction
//!   fitted to reference CFD data - reserved for final validation passes
//!
//! ## Example
//!
//! ```rust
//! use duct_core::air::AirConditions;
//! use duct_core::calculations::velocity_pressure::{
//!     velocity_to_pressure, VelocityPressureInput,
//! };
//! use duct_core::tables::VpTable;
//!
//! let input = VelocityPressureInput {
//!     velocity_fpm: 2000.0,
//!     air: AirConditions::standard(),
//!     method: None,
//!     tolerance_pct: None,
//! };
//! let result = velocity_to_pressure(&input, VpTable::reference()).unwrap();
//! // (2000/4005)^2 at near-standard density
//! assert!((result.value - 0.249).abs() < 0.002);
//! ```

use serde::{Deserialize, Serialize};

use crate::air::{compute_properties, AirConditions, AirProperties, AIR_PROPERTY_UNCERTAINTY_PCT};
use crate::errors::{DuctError, DuctResult};
use crate::methods::{
    select_vp_method, CalculationMethod, SolverParams, VelocityPressureMethod,
    HIGH_VELOCITY_THRESHOLD_FPM, LOOKUP_MIN_VELOCITY_FPM,
};
use crate::result::{combine_uncertainty_pct, CalculationResult};
use crate::tables::{VpTable, TABLE_REFERENCE_DENSITY_LB_FT3};
use crate::units::{Unit, IN_WG_PER_IN_HG};

/// Velocity-pressure constant for standard air: V = 4005 sqrt(vp)
/// (V in fpm, vp in in.wg)
pub const VELOCITY_PRESSURE_CONSTANT_FPM: f64 = 4005.0;

/// Empirical humid-air kinetic-energy correction coefficient, applied per
/// unit humidity ratio in the enhanced formula
pub const HUMIDITY_KE_COEFF: f64 = 0.244;

/// Linear coefficient of the CFD-derived correction polynomial
pub const CFD_CORRECTION_C1: f64 = -0.0028;

/// Quadratic coefficient of the CFD-derived correction polynomial
pub const CFD_CORRECTION_C2: f64 = 0.0051;

/// Reference velocity the CFD correction polynomial is normalized to (fpm)
pub const CFD_REFERENCE_VELOCITY_FPM: f64 = 4005.0;

/// Lower bisection bracket for the inverse solver (fpm)
pub const PV_BRACKET_LO_FPM: f64 = 1.0;

/// Upper bisection bracket for the inverse solver (fpm)
pub const PV_BRACKET_HI_FPM: f64 = 30_000.0;

/// Input for [`velocity_to_pressure`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityPressureInput {
    /// Air velocity (fpm)
    pub velocity_fpm: f64,

    /// Ambient conditions; density correction comes from here
    pub air: AirConditions,

    /// Pinned method; `None` selects automatically from `tolerance_pct`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<VelocityPressureMethod>,

    /// Accuracy the caller needs (+/- %); only consulted when `method`
    /// is `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance_pct: Option<f64>,
}

/// Input for [`pressure_to_velocity`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureToVelocityInput {
    /// Velocity pressure (in.wg)
    pub velocity_pressure_in_wg: f64,

    /// Ambient conditions
    pub air: AirConditions,

    /// Pinned method; `None` selects automatically
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<VelocityPressureMethod>,

    /// Accuracy the caller needs (+/- %)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance_pct: Option<f64>,
}

/// Convert velocity to velocity pressure.
pub fn velocity_to_pressure(
    input: &VelocityPressureInput,
    table: &VpTable,
) -> DuctResult<CalculationResult> {
    if input.velocity_fpm <= 0.0 {
        return Err(DuctError::invalid_input(
            "velocity_fpm",
            input.velocity_fpm.to_string(),
            "Velocity must be positive",
        ));
    }
    let properties = compute_properties(&input.air)?;
    let method = input
        .method
        .unwrap_or_else(|| select_vp_method(input.velocity_fpm, input.tolerance_pct));

    let (value, warnings) = vp_for_method(input.velocity_fpm, &properties, method, table);
    let uncertainty =
        combine_uncertainty_pct(&[method.accuracy_pct(), AIR_PROPERTY_UNCERTAINTY_PCT]);

    Ok(
        CalculationResult::new(
            value,
            Unit::InWg,
            CalculationMethod::VelocityPressure(method),
            uncertainty,
        )
        .with_warnings(warnings),
    )
}

/// Convert velocity pressure back to velocity.
///
/// The closed-form and lookup methods invert directly; the remaining
/// methods solve by bounded bisection with [`SolverParams::inverse_vp`]
/// (cap 50 iterations, 1e-5 relative tolerance) and fail with
/// [`DuctError::Convergence`] if the cap is exceeded - a partially
/// converged velocity is never returned.
pub fn pressure_to_velocity(
    input: &PressureToVelocityInput,
    table: &VpTable,
) -> DuctResult<CalculationResult> {
    if input.velocity_pressure_in_wg <= 0.0 {
        return Err(DuctError::invalid_input(
            "velocity_pressure_in_wg",
            input.velocity_pressure_in_wg.to_string(),
            "Velocity pressure must be positive",
        ));
    }
    let properties = compute_properties(&input.air)?;
    let density_ratio = properties.density_lb_ft3 / TABLE_REFERENCE_DENSITY_LB_FT3;
    let target = input.velocity_pressure_in_wg;

    // Estimate the velocity with the closed form to drive auto-selection
    let velocity_estimate = VELOCITY_PRESSURE_CONSTANT_FPM * (target / density_ratio).sqrt();
    let method = input
        .method
        .unwrap_or_else(|| select_vp_method(velocity_estimate, input.tolerance_pct));

    let (velocity, warnings) = match method {
        VelocityPressureMethod::Formula => (velocity_estimate, Vec::new()),
        VelocityPressureMethod::Lookup => {
            let mut warnings = Vec::new();
            let vp_std = target / density_ratio;
            let entry = table.nearest_by_pressure(vp_std);
            let covered = vp_std >= table.min_vp_in_wg() && vp_std <= table.max_vp_in_wg();
            if !covered {
                warnings.push(format!(
                    "velocity pressure {vp_std:.4} in.wg outside validated range for lookup method"
                ));
            }
            (entry.velocity_fpm, warnings)
        }
        VelocityPressureMethod::Interpolated
        | VelocityPressureMethod::EnhancedFormula
        | VelocityPressureMethod::CfdCorrected => {
            invert_by_bisection(target, &properties, method, table, SolverParams::inverse_vp())?
        }
    };

    // Velocity pressure scales with the square of velocity, so the
    // velocity band is half the pressure band
    let uncertainty = combine_uncertainty_pct(&[
        method.accuracy_pct() / 2.0,
        AIR_PROPERTY_UNCERTAINTY_PCT / 2.0,
    ]);

    Ok(
        CalculationResult::new(
            velocity,
            Unit::Fpm,
            CalculationMethod::VelocityPressure(method),
            uncertainty,
        )
        .with_warnings(warnings),
    )
}

/// Evaluate one method's velocity pressure (in.wg) for a velocity.
///
/// Exhaustive over [`VelocityPressureMethod`]; returns the value plus any
/// range warnings. Also used by the friction-loss calculation and the
/// inverse solver.
pub fn vp_for_method(
    velocity_fpm: f64,
    properties: &AirProperties,
    method: VelocityPressureMethod,
    table: &VpTable,
) -> (f64, Vec<String>) {
    let density_ratio = properties.density_lb_ft3 / TABLE_REFERENCE_DENSITY_LB_FT3;
    let ratio = velocity_fpm / VELOCITY_PRESSURE_CONSTANT_FPM;
    let formula_vp = ratio * ratio * density_ratio;
    let mut warnings = Vec::new();

    let value = match method {
        VelocityPressureMethod::Formula => {
            if velocity_fpm > HIGH_VELOCITY_THRESHOLD_FPM {
                warnings.push(format!(
                    "velocity {velocity_fpm:.0} fpm above {HIGH_VELOCITY_THRESHOLD_FPM:.0} fpm; enhanced formula recommended"
                ));
            }
            formula_vp
        }
        VelocityPressureMethod::Lookup => {
            if !table.covers(velocity_fpm) || velocity_fpm < LOOKUP_MIN_VELOCITY_FPM {
                warnings.push(format!(
                    "velocity {velocity_fpm:.0} fpm outside validated range for lookup method"
                ));
            }
            table.nearest(velocity_fpm).vp_in_wg * density_ratio
        }
        VelocityPressureMethod::Interpolated => {
            let interp = table.interpolate(velocity_fpm);
            if interp.extrapolated {
                warnings.push(format!(
                    "velocity {velocity_fpm:.0} fpm outside table; end-segment extrapolation applied"
                ));
            }
            interp.vp_in_wg * density_ratio
        }
        VelocityPressureMethod::EnhancedFormula => {
            enhanced_vp(formula_vp, properties)
        }
        VelocityPressureMethod::CfdCorrected => {
            let enhanced = enhanced_vp(formula_vp, properties);
            let v_ratio = velocity_fpm / CFD_REFERENCE_VELOCITY_FPM;
            enhanced * (1.0 + CFD_CORRECTION_C1 * v_ratio + CFD_CORRECTION_C2 * v_ratio * v_ratio)
        }
    };
    (value, warnings)
}

/// Compressibility and humidity corrections of the enhanced formula.
///
/// The compressibility term is the first-order expansion of the
/// isentropic compressible dynamic pressure, referenced to the ambient
/// absolute pressure; the humidity term corrects the kinetic energy of
/// the vapor fraction per unit humidity ratio.
fn enhanced_vp(formula_vp: f64, properties: &AirProperties) -> f64 {
    let p_abs_in_wg = properties.absolute_pressure_in_hg * IN_WG_PER_IN_HG;
    let compressibility = 1.0 / (1.0 + formula_vp / (2.0 * p_abs_in_wg));
    let humidity = 1.0 - HUMIDITY_KE_COEFF * properties.humidity_ratio;
    formula_vp * compressibility * humidity
}

/// Bounded bisection for the non-closed-form inverse.
fn invert_by_bisection(
    target_in_wg: f64,
    properties: &AirProperties,
    method: VelocityPressureMethod,
    table: &VpTable,
    params: SolverParams,
) -> DuctResult<(f64, Vec<String>)> {
    let mut lo = PV_BRACKET_LO_FPM;
    let mut hi = PV_BRACKET_HI_FPM;

    let (vp_lo, _) = vp_for_method(lo, properties, method, table);
    let (vp_hi, _) = vp_for_method(hi, properties, method, table);
    if target_in_wg < vp_lo || target_in_wg > vp_hi {
        return Err(DuctError::invalid_input(
            "velocity_pressure_in_wg",
            target_in_wg.to_string(),
            format!(
                "Outside the invertible range {vp_lo:.6} to {vp_hi:.2} in.wg for method {method}"
            ),
        ));
    }

    for iteration in 0..params.max_iterations {
        let mid = 0.5 * (lo + hi);
        if (hi - lo) / mid <= params.tolerance {
            log::debug!(
                "pressure_to_velocity converged in {iteration} iterations (method {method})"
            );
            let (_, warnings) = vp_for_method(mid, properties, method, table);
            return Ok((mid, warnings));
        }
        let (vp_mid, _) = vp_for_method(mid, properties, method, table);
        if vp_mid < target_in_wg {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Err(DuctError::convergence(
        "pressure_to_velocity bisection",
        params.max_iterations,
        params.tolerance,
    ))
}
