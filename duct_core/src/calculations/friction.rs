//! # Friction Loss
//!
//! Per-unit-length pressure loss in a duct via the Darcy-Weisbach
//! relation: a friction factor from a selectable correlation, corrected
//! for surface aging, times velocity pressure over hydraulic diameter.
//!
//! ## Friction-Factor Methods
//!
//! - **Colebrook-White**: the implicit reference equation, solved by
//!   fixed-point iteration seeded with Swamee-Jain (cap 100, tolerance
//!   1e-6); reserved for compliance-grade results
//! - **Swamee-Jain**, **Haaland**, **Chen**: explicit approximations for
//!   speed-sensitive bulk calculations
//!
//! ## Laminar Override
//!
//! Laminar flow (Re < 2,300) always uses the analytic f = 64/Re no matter
//! which method the caller requested. This is a correctness rule, not an
//! optimization: the turbulent correlations are invalid below the
//! critical Reynolds number and would silently produce garbage there.
//! Transitional flow (Re 2,300-4,000) uses the requested turbulent
//! correlation and attaches a warning instead; interpolating between
//! regimes would manufacture precision the correlations do not have.

use serde::{Deserialize, Serialize};

use crate::air::{compute_properties, AirConditions, AIR_PROPERTY_UNCERTAINTY_PCT};
use crate::calculations::velocity_pressure::vp_for_method;
use crate::errors::{DuctError, DuctResult};
use crate::flow::{FlowRegime, FlowState};
use crate::geometry::DuctGeometry;
use crate::materials::{DuctMaterial, SurfaceCondition};
use crate::methods::{
    CalculationMethod, FrictionFactorMethod, SolverParams, VelocityPressureMethod,
};
use crate::result::{combine_uncertainty_pct, CalculationResult};
use crate::tables::VpTable;
use crate::units::Unit;

// ============================================================================
// Correlation Constants
// ============================================================================

/// Laminar friction constant: f = 64/Re
pub const LAMINAR_FRICTION_CONSTANT: f64 = 64.0;

/// Roughness divisor shared by Colebrook-White and Swamee-Jain
pub const COLEBROOK_ROUGHNESS_DIVISOR: f64 = 3.7;

/// Reynolds coefficient of the Colebrook-White equation
pub const COLEBROOK_REYNOLDS_COEFF: f64 = 2.51;

/// Swamee-Jain Reynolds coefficient and exponent
pub const SWAMEE_JAIN_REYNOLDS_COEFF: f64 = 5.74;
pub const SWAMEE_JAIN_REYNOLDS_EXPONENT: f64 = 0.9;

/// Haaland coefficients
pub const HAALAND_LOG_COEFF: f64 = 1.8;
pub const HAALAND_ROUGHNESS_EXPONENT: f64 = 1.11;
pub const HAALAND_REYNOLDS_COEFF: f64 = 6.9;

/// Chen coefficients
pub const CHEN_ROUGHNESS_DIVISOR: f64 = 3.7065;
pub const CHEN_OUTER_REYNOLDS_COEFF: f64 = 5.0452;
pub const CHEN_INNER_ROUGHNESS_EXPONENT: f64 = 1.1098;
pub const CHEN_INNER_ROUGHNESS_DIVISOR: f64 = 2.8257;
pub const CHEN_INNER_REYNOLDS_COEFF: f64 = 5.8506;
pub const CHEN_INNER_REYNOLDS_EXPONENT: f64 = 0.8981;

/// Darcy length factor: 100 ft of duct expressed in inches, so that
/// loss = f * (1200 / Dh_in) * vp comes out per 100 ft
pub const DARCY_LENGTH_FACTOR_IN: f64 = 1200.0;

// ============================================================================
// Friction Factor
// ============================================================================

/// A computed friction factor with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrictionFactor {
    /// Darcy friction factor (dimensionless)
    pub value: f64,

    /// Flow regime the Reynolds number fell in
    pub regime: FlowRegime,

    /// Method that produced the value (the analytic laminar formula
    /// reports the requested method with `laminar_override` set)
    pub method: FrictionFactorMethod,

    /// Iterations spent (0 for explicit correlations)
    pub iterations: u32,

    /// True when laminar flow overrode the requested turbulent correlation
    pub laminar_override: bool,
}

/// Compute the Darcy friction factor for a Reynolds number and relative
/// roughness.
///
/// `params` bounds the Colebrook-White iteration; explicit methods ignore
/// it. Exceeding the cap fails with [`DuctError::Convergence`].
pub fn friction_factor(
    reynolds: f64,
    relative_roughness: f64,
    method: FrictionFactorMethod,
    params: &SolverParams,
) -> DuctResult<FrictionFactor> {
    if reynolds <= 0.0 {
        return Err(DuctError::invalid_input(
            "reynolds",
            reynolds.to_string(),
            "Reynolds number must be positive",
        ));
    }
    if relative_roughness < 0.0 {
        return Err(DuctError::invalid_input(
            "relative_roughness",
            relative_roughness.to_string(),
            "Relative roughness cannot be negative",
        ));
    }

    let regime = FlowRegime::classify(reynolds);
    if regime == FlowRegime::Laminar {
        return Ok(FrictionFactor {
            value: LAMINAR_FRICTION_CONSTANT / reynolds,
            regime,
            method,
            iterations: 0,
            laminar_override: true,
        });
    }

    let (value, iterations) = match method {
        FrictionFactorMethod::SwameeJain => (swamee_jain(reynolds, relative_roughness), 0),
        FrictionFactorMethod::Haaland => (haaland(reynolds, relative_roughness), 0),
        FrictionFactorMethod::Chen => (chen(reynolds, relative_roughness), 0),
        FrictionFactorMethod::ColebrookWhite => {
            colebrook_white(reynolds, relative_roughness, params)?
        }
    };

    Ok(FrictionFactor {
        value,
        regime,
        method,
        iterations,
        laminar_override: false,
    })
}

/// Swamee-Jain explicit approximation.
fn swamee_jain(reynolds: f64, relative_roughness: f64) -> f64 {
    let log_term = (relative_roughness / COLEBROOK_ROUGHNESS_DIVISOR
        + SWAMEE_JAIN_REYNOLDS_COEFF / reynolds.powf(SWAMEE_JAIN_REYNOLDS_EXPONENT))
    .log10();
    0.25 / (log_term * log_term)
}

/// Haaland explicit approximation.
fn haaland(reynolds: f64, relative_roughness: f64) -> f64 {
    let inv_sqrt = -HAALAND_LOG_COEFF
        * ((relative_roughness / COLEBROOK_ROUGHNESS_DIVISOR).powf(HAALAND_ROUGHNESS_EXPONENT)
            + HAALAND_REYNOLDS_COEFF / reynolds)
            .log10();
    1.0 / (inv_sqrt * inv_sqrt)
}

/// Chen explicit approximation.
fn chen(reynolds: f64, relative_roughness: f64) -> f64 {
    let inner = relative_roughness.powf(CHEN_INNER_ROUGHNESS_EXPONENT)
        / CHEN_INNER_ROUGHNESS_DIVISOR
        + CHEN_INNER_REYNOLDS_COEFF / reynolds.powf(CHEN_INNER_REYNOLDS_EXPONENT);
    let inv_sqrt = -2.0
        * (relative_roughness / CHEN_ROUGHNESS_DIVISOR
            - (CHEN_OUTER_REYNOLDS_COEFF / reynolds) * inner.log10())
        .log10();
    1.0 / (inv_sqrt * inv_sqrt)
}

/// Colebrook-White implicit equation, fixed-point iteration on
/// x = 1/sqrt(f), seeded with Swamee-Jain.
fn colebrook_white(
    reynolds: f64,
    relative_roughness: f64,
    params: &SolverParams,
) -> DuctResult<(f64, u32)> {
    let mut x = 1.0 / swamee_jain(reynolds, relative_roughness).sqrt();
    for iteration in 1..=params.max_iterations {
        let next = -2.0
            * (relative_roughness / COLEBROOK_ROUGHNESS_DIVISOR
                + COLEBROOK_REYNOLDS_COEFF * x / reynolds)
                .log10();
        if ((next - x) / next).abs() <= params.tolerance {
            log::debug!("colebrook_white converged in {iteration} iterations (Re {reynolds:.0})");
            return Ok((1.0 / (next * next), iteration));
        }
        x = next;
    }
    Err(DuctError::convergence(
        "colebrook_white",
        params.max_iterations,
        params.tolerance,
    ))
}

// ============================================================================
// Friction Loss
// ============================================================================

/// Input parameters for a friction-loss calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "airflow_cfm": 2000.0,
///   "geometry": { "shape": "rectangular", "width_in": 24.0, "height_in": 12.0 },
///   "material": "galvanized_steel",
///   "condition": "new",
///   "air": { "temperature_f": 70.0, "altitude_ft": 0.0, "relative_humidity": 0.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrictionLossInput {
    /// Volumetric airflow (cfm)
    pub airflow_cfm: f64,

    /// Duct cross-section
    pub geometry: DuctGeometry,

    /// Duct wall material (absolute roughness lookup)
    pub material: DuctMaterial,

    /// Surface condition (aging multiplier)
    #[serde(default)]
    pub condition: SurfaceCondition,

    /// Additional caller-supplied friction multiplier on top of the
    /// condition factor (field measurements, lined sections)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aging_factor: Option<f64>,

    /// Ambient conditions
    pub air: AirConditions,

    /// Pinned friction-factor method; `None` defaults to Swamee-Jain
    /// (bulk grade). Pin Colebrook-White for compliance-grade results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<FrictionFactorMethod>,
}

impl FrictionLossInput {
    /// Validate input parameters.
    pub fn validate(&self) -> DuctResult<()> {
        if self.airflow_cfm <= 0.0 {
            return Err(DuctError::invalid_input(
                "airflow_cfm",
                self.airflow_cfm.to_string(),
                "Airflow must be positive",
            ));
        }
        self.geometry.validate()?;
        if let Some(factor) = self.aging_factor {
            if factor <= 0.0 {
                return Err(DuctError::invalid_input(
                    "aging_factor",
                    factor.to_string(),
                    "Aging factor must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Results from a friction-loss calculation.
///
/// The headline number is `loss` (per 100 ft); the remaining fields are
/// the diagnostics that explain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrictionLossResult {
    /// Pressure loss per 100 ft of duct
    pub loss: CalculationResult,

    /// Mean velocity (fpm)
    pub velocity_fpm: f64,

    /// Reynolds number
    pub reynolds: f64,

    /// Flow regime
    pub regime: FlowRegime,

    /// Corrected Darcy friction factor actually applied
    pub friction_factor: f64,

    /// Combined aging/surface correction multiplier applied
    pub correction_factor: f64,

    /// Velocity pressure used in the Darcy-Weisbach conversion (in.wg)
    pub velocity_pressure_in_wg: f64,

    /// Hydraulic diameter (in)
    pub hydraulic_diameter_in: f64,

    /// Iterations spent in the friction-factor solver (0 for explicit)
    pub solver_iterations: u32,
}

/// Compute friction loss per 100 ft of duct.
///
/// The velocity-pressure sub-step uses the closed-form method for the
/// explicit (bulk-grade) correlations and the enhanced formula when the
/// caller pinned Colebrook-White, mirroring the method-selection guidance.
pub fn friction_loss(input: &FrictionLossInput, table: &VpTable) -> DuctResult<FrictionLossResult> {
    input.validate()?;

    let properties = compute_properties(&input.air)?;
    let flow = FlowState::from_airflow(input.airflow_cfm, &input.geometry, &properties)?;

    let method = input.method.unwrap_or(FrictionFactorMethod::SwameeJain);
    let dh_ft = input.geometry.hydraulic_diameter_ft();
    let relative_roughness = input.material.absolute_roughness_ft() / dh_ft;

    let factor = friction_factor(
        flow.reynolds,
        relative_roughness,
        method,
        &SolverParams::colebrook(),
    )?;

    let correction_factor = input.condition.aging_factor() * input.aging_factor.unwrap_or(1.0);
    let corrected = factor.value * correction_factor;

    let vp_method = match method {
        FrictionFactorMethod::ColebrookWhite => VelocityPressureMethod::EnhancedFormula,
        _ => VelocityPressureMethod::Formula,
    };
    let (velocity_pressure_in_wg, mut warnings) =
        vp_for_method(flow.velocity_fpm, &properties, vp_method, table);

    if factor.regime == FlowRegime::Transitional {
        warnings.push(format!(
            "transitional flow regime (Re {:.0}); turbulent correlation applied",
            flow.reynolds
        ));
    }

    let dh_in = input.geometry.hydraulic_diameter_in();
    let value = corrected * (DARCY_LENGTH_FACTOR_IN / dh_in) * velocity_pressure_in_wg;

    let uncertainty = combine_uncertainty_pct(&[
        method.accuracy_pct(),
        vp_method.accuracy_pct(),
        AIR_PROPERTY_UNCERTAINTY_PCT,
    ]);

    let loss = CalculationResult::new(
        value,
        Unit::InWgPer100Ft,
        CalculationMethod::FrictionFactor(method),
        uncertainty,
    )
    .with_warnings(warnings);

    Ok(FrictionLossResult {
        loss,
        velocity_fpm: flow.velocity_fpm,
        reynolds: flow.reynolds,
        regime: factor.regime,
        friction_factor: corrected,
        correction_factor,
        velocity_pressure_in_wg,
        hydraulic_diameter_in: dh_in,
        solver_iterations: factor.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_input() -> FrictionLossInput {
        FrictionLossInput {
            airflow_cfm: 2000.0,
            geometry: DuctGeometry::Rectangular {
                width_in: 24.0,
                height_in: 12.0,
            },
            material: DuctMaterial::GalvanizedSteel,
            condition: SurfaceCondition::New,
            aging_factor: None,
            air: AirConditions::standard(),
            method: None,
        }
    }

    #[test]
    fn test_colebrook_converges_across_regimes() {
        for reynolds in [2_300.0, 10_000.0, 1_000_000.0] {
            let cw = friction_factor(
                reynolds,
                0.0003,
                FrictionFactorMethod::ColebrookWhite,
                &SolverParams::colebrook(),
            )
            .unwrap();
            assert!(cw.iterations <= SolverParams::colebrook().max_iterations);
            assert!(cw.iterations > 0);

            let sj = friction_factor(
                reynolds,
                0.0003,
                FrictionFactorMethod::SwameeJain,
                &SolverParams::colebrook(),
            )
            .unwrap();
            let spread = (sj.value - cw.value).abs() / cw.value;
            assert!(
                spread < 0.03,
                "Swamee-Jain off Colebrook-White by {:.2}% at Re {reynolds}",
                spread * 100.0
            );
        }
    }

    #[test]
    fn test_colebrook_golden_value() {
        let cw = friction_factor(
            10_000.0,
            0.0003,
            FrictionFactorMethod::ColebrookWhite,
            &SolverParams::colebrook(),
        )
        .unwrap();
        assert!((cw.value - 0.031342693).abs() < 1e-6);
    }

    #[test]
    fn test_explicit_methods_agree() {
        let reynolds = 100_000.0;
        let rr = 0.0003;
        let params = SolverParams::colebrook();
        let reference = friction_factor(reynolds, rr, FrictionFactorMethod::ColebrookWhite, &params)
            .unwrap()
            .value;
        for method in FrictionFactorMethod::ALL {
            let value = friction_factor(reynolds, rr, method, &params).unwrap().value;
            let spread = (value - reference).abs() / reference;
            assert!(
                spread < 0.03,
                "{method} off reference by {:.2}%",
                spread * 100.0
            );
        }
    }

    #[test]
    fn test_laminar_override_applies_to_every_method() {
        let reynolds = 1_500.0;
        for method in FrictionFactorMethod::ALL {
            let factor =
                friction_factor(reynolds, 0.0003, method, &SolverParams::colebrook()).unwrap();
            assert!(factor.laminar_override);
            assert_eq!(factor.regime, FlowRegime::Laminar);
            assert!((factor.value - LAMINAR_FRICTION_CONSTANT / reynolds).abs() < 1e-12);
        }
    }

    #[test]
    fn test_iteration_cap_is_enforced() {
        let starved = SolverParams {
            max_iterations: 1,
            tolerance: 1e-15,
        };
        let err = friction_factor(
            100_000.0,
            0.0003,
            FrictionFactorMethod::ColebrookWhite,
            &starved,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "CONVERGENCE");
    }

    #[test]
    fn test_loss_golden_value() {
        let result = friction_loss(&test_input(), VpTable::reference()).unwrap();
        // 24x12 galvanized at 2000 cfm, standard air, Swamee-Jain
        assert!((result.velocity_fpm - 1000.0).abs() < 1e-9);
        assert!((result.loss.value - 0.085132608).abs() < 1e-6);
        assert_eq!(result.loss.unit, Unit::InWgPer100Ft);
        assert_eq!(result.hydraulic_diameter_in, 16.0);
    }

    #[test]
    fn test_loss_monotonic_in_velocity_for_every_method() {
        let table = VpTable::reference();
        for method in FrictionFactorMethod::ALL {
            let mut prev = 0.0;
            for airflow in [500.0, 1000.0, 2000.0, 4000.0, 8000.0] {
                let input = FrictionLossInput {
                    airflow_cfm: airflow,
                    method: Some(method),
                    ..test_input()
                };
                let loss = friction_loss(&input, table).unwrap().loss.value;
                assert!(
                    loss > prev,
                    "{method} loss not increasing at {airflow} cfm"
                );
                prev = loss;
            }
        }
    }

    #[test]
    fn test_aging_factor_scales_loss() {
        let table = VpTable::reference();
        let new = friction_loss(&test_input(), table).unwrap();
        let poor = friction_loss(
            &FrictionLossInput {
                condition: SurfaceCondition::Poor,
                ..test_input()
            },
            table,
        )
        .unwrap();
        let ratio = poor.loss.value / new.loss.value;
        assert!((ratio - 1.5).abs() < 1e-9);

        let doubled = friction_loss(
            &FrictionLossInput {
                aging_factor: Some(2.0),
                ..test_input()
            },
            table,
        )
        .unwrap();
        assert!((doubled.loss.value / new.loss.value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_transitional_regime_warns() {
        // Very low airflow in a big duct puts Re between 2,300 and 4,000
        let input = FrictionLossInput {
            airflow_cfm: 45.0,
            ..test_input()
        };
        let result = friction_loss(&input, VpTable::reference()).unwrap();
        assert_eq!(result.regime, FlowRegime::Transitional);
        assert!(result
            .loss
            .warnings
            .iter()
            .any(|w| w.contains("transitional")));
    }

    #[test]
    fn test_rougher_material_loses_more() {
        let table = VpTable::reference();
        let galvanized = friction_loss(&test_input(), table).unwrap().loss.value;
        let flex = friction_loss(
            &FrictionLossInput {
                material: DuctMaterial::FlexibleDuct,
                ..test_input()
            },
            table,
        )
        .unwrap()
        .loss
        .value;
        assert!(flex > galvanized * 1.3);
    }

    #[test]
    fn test_compliance_grade_uses_enhanced_vp() {
        let input = FrictionLossInput {
            method: Some(FrictionFactorMethod::ColebrookWhite),
            ..test_input()
        };
        let result = friction_loss(&input, VpTable::reference()).unwrap();
        assert!((result.loss.value - 0.085034918).abs() < 1e-6);
        assert!(result.solver_iterations > 0);
    }
}
