//! # Compliance Validation
//!
//! Evaluates a sized duct against a chosen standard and pressure class:
//! velocity limit, rectangular aspect ratio, elbow radius ratio along the
//! centerline, and the standard's friction-rate ceiling where it defines
//! one. Pure rule evaluation - no iteration, deterministic rule order,
//! every violation carries the exact numeric values and the standard
//! clause it maps to.
//!
//! Recommendations are heuristic and always advisory; they never affect
//! the compliance status.
//!
//! ## Example
//!
//! ```rust
//! use duct_core::compliance::{validate, ValidationInput};
//! use duct_core::compliance::standards::{DuctStandard, PressureClass, StandardsTable};
//! use duct_core::geometry::DuctGeometry;
//! use duct_core::tables::VpTable;
//!
//! let input = ValidationInput {
//!     label: "SA-1".to_string(),
//!     geometry: DuctGeometry::Rectangular { width_in: 24.0, height_in: 12.0 },
//!     airflow_cfm: 2000.0,
//!     centerline: Vec::new(),
//!     standard: DuctStandard::Smacna,
//!     pressure_class: PressureClass::Low,
//!     air: None,
//!     material: None,
//! };
//! let report = validate(&input, StandardsTable::reference(), VpTable::reference()).unwrap();
//! assert!(report.is_compliant);
//! ```

pub mod standards;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::air::AirConditions;
use crate::calculations::friction::{friction_loss, FrictionLossInput};
use crate::errors::{DuctError, DuctResult};
use crate::geometry::DuctGeometry;
use crate::materials::{DuctMaterial, SurfaceCondition};
use crate::methods::FrictionFactorMethod;
use crate::tables::VpTable;

pub use standards::{DuctStandard, PressureClass, StandardLimits, StandardsTable};

/// Fraction of the velocity limit above which a passing duct still warns
pub const VELOCITY_WARNING_FRACTION: f64 = 0.9;

/// Margin below the aspect-ratio limit inside which a passing duct warns
pub const ASPECT_RATIO_WARNING_MARGIN: f64 = 0.5;

// ============================================================================
// Centerline
// ============================================================================

/// One segment of a duct run's centerline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CenterlineSegment {
    /// Straight run
    Straight { length_ft: f64 },
    /// Curved elbow with a centerline radius
    Arc { radius_in: f64, angle_deg: f64 },
}

// ============================================================================
// Report Types
// ============================================================================

/// Violation severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Exceeds a hard limit with operational consequences
    Critical,
    /// Exceeds a construction-standard limit
    Major,
    /// Exceeds a design guideline
    Minor,
}

/// A failed compliance rule with its exact numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Stable rule code (e.g. "ASPECT_RATIO_LIMIT")
    pub code: String,
    pub severity: Severity,
    /// Engineering description of what failed
    pub description: String,
    /// Standard clause the rule maps to
    pub standard_reference: String,
    /// The value the duct has
    pub current_value: f64,
    /// The value the standard requires
    pub required_value: f64,
}

/// A near-threshold pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceWarning {
    /// Stable rule code the warning relates to
    pub code: String,
    pub description: String,
    /// Standard clause the warning maps to
    pub standard_reference: String,
}

/// Recommendation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

/// An advisory design improvement; never affects compliance status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub description: String,
    /// What the change buys
    pub benefit: String,
    pub priority: RecommendationPriority,
}

/// The validator's output. Produced fresh per call, never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// True when no rule produced a violation
    pub is_compliant: bool,

    /// Failed rules in evaluation order
    pub violations: Vec<Violation>,

    /// Near-threshold passes in evaluation order
    pub warnings: Vec<ComplianceWarning>,

    /// Advisory improvements
    pub recommendations: Vec<Recommendation>,

    /// The numbers the rules were evaluated against (ordered map for
    /// deterministic serialization)
    pub calculated_values: BTreeMap<String, f64>,

    /// Standards consulted for this report
    pub standards_applied: Vec<String>,
}

// ============================================================================
// Input
// ============================================================================

/// Input for a compliance validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationInput {
    /// User label for the segment under validation
    pub label: String,

    /// Duct cross-section
    pub geometry: DuctGeometry,

    /// Design airflow (cfm)
    pub airflow_cfm: f64,

    /// Centerline segments; arcs drive the radius-ratio rule
    #[serde(default)]
    pub centerline: Vec<CenterlineSegment>,

    /// Standard to validate against
    pub standard: DuctStandard,

    /// Pressure class within the standard
    pub pressure_class: PressureClass,

    /// Ambient conditions; required only for the friction-rate ceiling
    /// rule (skipped with a warning when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air: Option<AirConditions>,

    /// Duct material for the friction-rate ceiling rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<DuctMaterial>,
}

impl ValidationInput {
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
        for (index, segment) in self.centerline.iter().enumerate() {
            if let CenterlineSegment::Arc { radius_in, .. } = segment {
                if *radius_in <= 0.0 {
                    return Err(DuctError::invalid_input(
                        format!("centerline[{index}].radius_in"),
                        radius_in.to_string(),
                        "Arc radius must be positive",
                    ));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Validate a duct against a standard + pressure class.
///
/// Rule order is fixed (velocity, aspect ratio, radius ratio, friction
/// ceiling) so reports are deterministic and diffable.
pub fn validate(
    input: &ValidationInput,
    standards: &StandardsTable,
    vp_table: &VpTable,
) -> DuctResult<ComplianceReport> {
    input.validate()?;
    let limits = standards.limits(input.standard, input.pressure_class)?;

    let mut violations = Vec::new();
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();
    let mut calculated_values = BTreeMap::new();

    let velocity_fpm = input.airflow_cfm / input.geometry.area_ft2();
    let aspect_ratio = input.geometry.aspect_ratio();
    let equivalent_diameter_in = input.geometry.equivalent_diameter_in();

    calculated_values.insert("velocity_fpm".to_string(), velocity_fpm);
    calculated_values.insert("aspect_ratio".to_string(), aspect_ratio);
    calculated_values.insert("equivalent_diameter_in".to_string(), equivalent_diameter_in);
    calculated_values.insert(
        "hydraulic_diameter_in".to_string(),
        input.geometry.hydraulic_diameter_in(),
    );

    check_velocity(input, limits, velocity_fpm, &mut violations, &mut warnings, &mut recommendations);
    check_aspect_ratio(input, limits, aspect_ratio, &mut violations, &mut warnings, &mut recommendations);
    check_radius_ratio(
        input,
        limits,
        equivalent_diameter_in,
        &mut violations,
        &mut warnings,
        &mut recommendations,
        &mut calculated_values,
    );
    check_friction_ceiling(
        input,
        limits,
        vp_table,
        &mut violations,
        &mut warnings,
        &mut calculated_values,
    )?;

    Ok(ComplianceReport {
        is_compliant: violations.is_empty(),
        violations,
        warnings,
        recommendations,
        calculated_values,
        standards_applied: vec![format!(
            "{} ({} pressure class)",
            input.standard, input.pressure_class
        )],
    })
}

fn check_velocity(
    input: &ValidationInput,
    limits: &StandardLimits,
    velocity_fpm: f64,
    violations: &mut Vec<Violation>,
    warnings: &mut Vec<ComplianceWarning>,
    recommendations: &mut Vec<Recommendation>,
) {
    let limit = limits.max_velocity_fpm;
    if velocity_fpm > limit {
        violations.push(Violation {
            code: "VELOCITY_LIMIT".to_string(),
            severity: Severity::Critical,
            description: format!(
                "Velocity {velocity_fpm:.0} fpm exceeds the {limit:.0} fpm limit for the {} pressure class",
                input.pressure_class
            ),
            standard_reference: input.standard.velocity_clause().to_string(),
            current_value: velocity_fpm,
            required_value: limit,
        });
        recommendations.push(Recommendation {
            description: format!(
                "Increase the duct size; {:.0} cfm needs at least {:.2} ft2 of free area at this class",
                input.airflow_cfm,
                input.airflow_cfm / limit
            ),
            benefit: "Brings velocity under the class limit and reduces noise and friction loss"
                .to_string(),
            priority: RecommendationPriority::High,
        });
    } else if velocity_fpm > limit * VELOCITY_WARNING_FRACTION {
        warnings.push(ComplianceWarning {
            code: "VELOCITY_LIMIT".to_string(),
            description: format!(
                "Velocity {velocity_fpm:.0} fpm is within 10% of the {limit:.0} fpm limit"
            ),
            standard_reference: input.standard.velocity_clause().to_string(),
        });
        recommendations.push(Recommendation {
            description: "Consider one duct size larger to move away from the velocity limit"
                .to_string(),
            benefit: "Margin for future airflow increases without rebalancing".to_string(),
            priority: RecommendationPriority::Medium,
        });
    }
}

fn check_aspect_ratio(
    input: &ValidationInput,
    limits: &StandardLimits,
    aspect_ratio: f64,
    violations: &mut Vec<Violation>,
    warnings: &mut Vec<ComplianceWarning>,
    recommendations: &mut Vec<Recommendation>,
) {
    if !matches!(input.geometry, DuctGeometry::Rectangular { .. }) {
        return;
    }
    let limit = limits.max_aspect_ratio;
    if aspect_ratio > limit {
        violations.push(Violation {
            code: "ASPECT_RATIO_LIMIT".to_string(),
            severity: Severity::Major,
            description: format!(
                "Aspect ratio {aspect_ratio:.1}:1 exceeds the {limit:.0}:1 construction limit"
            ),
            standard_reference: input.standard.aspect_ratio_clause().to_string(),
            current_value: aspect_ratio,
            required_value: limit,
        });
        recommendations.push(Recommendation {
            description: "Switch to a round or flat-oval section, or split into parallel ducts"
                .to_string(),
            benefit: "Less sheet metal, lower friction, and no aspect-ratio reinforcement"
                .to_string(),
            priority: RecommendationPriority::High,
        });
    } else if aspect_ratio > limit - ASPECT_RATIO_WARNING_MARGIN {
        warnings.push(ComplianceWarning {
            code: "ASPECT_RATIO_LIMIT".to_string(),
            description: format!(
                "Aspect ratio {aspect_ratio:.1}:1 is close to the {limit:.0}:1 construction limit"
            ),
            standard_reference: input.standard.aspect_ratio_clause().to_string(),
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn check_radius_ratio(
    input: &ValidationInput,
    limits: &StandardLimits,
    equivalent_diameter_in: f64,
    violations: &mut Vec<Violation>,
    warnings: &mut Vec<ComplianceWarning>,
    recommendations: &mut Vec<Recommendation>,
    calculated_values: &mut BTreeMap<String, f64>,
) {
    let mut worst_ratio: Option<f64> = None;
    for (index, segment) in input.centerline.iter().enumerate() {
        let CenterlineSegment::Arc { radius_in, .. } = segment else {
            continue;
        };
        let ratio = radius_in / equivalent_diameter_in;
        worst_ratio = Some(worst_ratio.map_or(ratio, |w: f64| w.min(ratio)));

        if ratio < limits.min_radius_ratio {
            violations.push(Violation {
                code: "RADIUS_RATIO_MINIMUM".to_string(),
                severity: Severity::Major,
                description: format!(
                    "Centerline segment {index}: radius ratio {ratio:.2} is below the {:.2} construction minimum",
                    limits.min_radius_ratio
                ),
                standard_reference: input.standard.radius_ratio_clause().to_string(),
                current_value: ratio,
                required_value: limits.min_radius_ratio,
            });
            recommendations.push(Recommendation {
                description: format!(
                    "Increase the elbow centerline radius at segment {index} to at least {:.1} in, or add turning vanes",
                    limits.optimal_radius_ratio * equivalent_diameter_in
                ),
                benefit: "Sharp throats separate the flow and multiply the fitting loss"
                    .to_string(),
                priority: RecommendationPriority::High,
            });
        } else if ratio < limits.optimal_radius_ratio {
            warnings.push(ComplianceWarning {
                code: "RADIUS_RATIO_MINIMUM".to_string(),
                description: format!(
                    "Centerline segment {index}: radius ratio {ratio:.2} is below the {:.2} optimum",
                    limits.optimal_radius_ratio
                ),
                standard_reference: input.standard.radius_ratio_clause().to_string(),
            });
            recommendations.push(Recommendation {
                description: format!(
                    "A centerline radius of {:.1} in at segment {index} would reach the optimal ratio",
                    limits.optimal_radius_ratio * equivalent_diameter_in
                ),
                benefit: "Lower fitting loss and quieter turns".to_string(),
                priority: RecommendationPriority::Low,
            });
        }
    }
    if let Some(worst) = worst_ratio {
        calculated_values.insert("min_radius_ratio".to_string(), worst);
    }
}

fn check_friction_ceiling(
    input: &ValidationInput,
    limits: &StandardLimits,
    vp_table: &VpTable,
    violations: &mut Vec<Violation>,
    warnings: &mut Vec<ComplianceWarning>,
    calculated_values: &mut BTreeMap<String, f64>,
) -> DuctResult<()> {
    let Some(ceiling) = limits.max_friction_rate else {
        return Ok(());
    };
    let Some(air) = input.air else {
        warnings.push(ComplianceWarning {
            code: "FRICTION_RATE_LIMIT".to_string(),
            description: "Friction-rate ceiling not evaluated: no air conditions supplied"
                .to_string(),
            standard_reference: input.standard.friction_rate_clause().to_string(),
        });
        return Ok(());
    };

    let result = friction_loss(
        &FrictionLossInput {
            airflow_cfm: input.airflow_cfm,
            geometry: input.geometry,
            material: input.material.unwrap_or_default(),
            condition: SurfaceCondition::New,
            aging_factor: None,
            air,
            method: Some(FrictionFactorMethod::ColebrookWhite),
        },
        vp_table,
    )?;
    let rate = result
        .loss
        .expect_unit(crate::units::Unit::InWgPer100Ft, "friction-rate ceiling check")?;
    calculated_values.insert("friction_rate_in_wg_100ft".to_string(), rate);

    if rate > ceiling {
        violations.push(Violation {
            code: "FRICTION_RATE_LIMIT".to_string(),
            severity: Severity::Minor,
            description: format!(
                "Friction rate {rate:.3} in.wg/100ft exceeds the {ceiling:.2} in.wg/100ft design ceiling"
            ),
            standard_reference: input.standard.friction_rate_clause().to_string(),
            current_value: rate,
            required_value: ceiling,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> ValidationInput {
        ValidationInput {
            label: "SA-1".to_string(),
            geometry: DuctGeometry::Rectangular {
                width_in: 24.0,
                height_in: 12.0,
            },
            airflow_cfm: 2000.0,
            centerline: Vec::new(),
            standard: DuctStandard::Smacna,
            pressure_class: PressureClass::Low,
            air: None,
            material: None,
        }
    }

    fn run(input: &ValidationInput) -> ComplianceReport {
        validate(input, StandardsTable::reference(), VpTable::reference()).unwrap()
    }

    #[test]
    fn test_compliant_duct() {
        let report = run(&base_input());
        assert!(report.is_compliant);
        assert!(report.violations.is_empty());
        assert!((report.calculated_values["velocity_fpm"] - 1000.0).abs() < 1e-9);
        assert_eq!(report.standards_applied.len(), 1);
    }

    #[test]
    fn test_aspect_ratio_violation_is_exact() {
        // 36x6: aspect ratio 6.0 against the 4:1 limit, velocity kept low
        let input = ValidationInput {
            geometry: DuctGeometry::Rectangular {
                width_in: 36.0,
                height_in: 6.0,
            },
            airflow_cfm: 1500.0,
            ..base_input()
        };
        let report = run(&input);
        assert!(!report.is_compliant);
        assert_eq!(report.violations.len(), 1);

        let violation = &report.violations[0];
        assert_eq!(violation.code, "ASPECT_RATIO_LIMIT");
        assert_eq!(violation.current_value, 6.0);
        assert_eq!(violation.required_value, 4.0);
        assert_eq!(
            violation.standard_reference,
            standards::clause::SMACNA_ASPECT_RATIO
        );
        // Advisory only: a recommendation accompanies it
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn test_aspect_ratio_near_limit_warns() {
        // 28x7.5 = 3.73:1, inside the 0.5 warning margin of 4:1
        let input = ValidationInput {
            geometry: DuctGeometry::Rectangular {
                width_in: 28.0,
                height_in: 7.5,
            },
            airflow_cfm: 1000.0,
            ..base_input()
        };
        let report = run(&input);
        assert!(report.is_compliant);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.code == "ASPECT_RATIO_LIMIT"));
    }

    #[test]
    fn test_velocity_violation() {
        // 12x12 at 3000 cfm = 3000 fpm against SMACNA low's 2500 fpm
        let input = ValidationInput {
            geometry: DuctGeometry::Rectangular {
                width_in: 12.0,
                height_in: 12.0,
            },
            airflow_cfm: 3000.0,
            ..base_input()
        };
        let report = run(&input);
        let violation = report
            .violations
            .iter()
            .find(|v| v.code == "VELOCITY_LIMIT")
            .expect("velocity violation");
        assert_eq!(violation.current_value, 3000.0);
        assert_eq!(violation.required_value, 2500.0);
        assert_eq!(violation.severity, Severity::Critical);
    }

    #[test]
    fn test_velocity_limit_rises_with_class() {
        // The same duct passes at the high pressure class
        let input = ValidationInput {
            geometry: DuctGeometry::Rectangular {
                width_in: 12.0,
                height_in: 12.0,
            },
            airflow_cfm: 3000.0,
            pressure_class: PressureClass::High,
            ..base_input()
        };
        let report = run(&input);
        assert!(report.is_compliant);
    }

    #[test]
    fn test_radius_ratio_violation() {
        // 6 in radius into a 12 in round duct: ratio 0.5, below the 1.0
        // construction minimum
        let input = ValidationInput {
            geometry: DuctGeometry::Round { diameter_in: 12.0 },
            airflow_cfm: 700.0,
            centerline: vec![
                CenterlineSegment::Straight { length_ft: 10.0 },
                CenterlineSegment::Arc {
                    radius_in: 6.0,
                    angle_deg: 90.0,
                },
            ],
            ..base_input()
        };
        let report = run(&input);
        let violation = report
            .violations
            .iter()
            .find(|v| v.code == "RADIUS_RATIO_MINIMUM")
            .expect("radius-ratio violation");
        assert!((violation.current_value - 0.5).abs() < 1e-9);
        assert_eq!(violation.required_value, 1.0);
        assert!((report.calculated_values["min_radius_ratio"] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_radius_ratio_between_min_and_optimal_warns() {
        // 14.4 in radius into a 12 in round duct: ratio 1.2, between the
        // 1.0 minimum and the 1.5 optimum
        let input = ValidationInput {
            geometry: DuctGeometry::Round { diameter_in: 12.0 },
            airflow_cfm: 700.0,
            centerline: vec![CenterlineSegment::Arc {
                radius_in: 14.4,
                angle_deg: 45.0,
            }],
            ..base_input()
        };
        let report = run(&input);
        assert!(report.is_compliant);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.code == "RADIUS_RATIO_MINIMUM"));
    }

    #[test]
    fn test_generous_radius_is_clean() {
        let input = ValidationInput {
            geometry: DuctGeometry::Round { diameter_in: 12.0 },
            airflow_cfm: 700.0,
            centerline: vec![CenterlineSegment::Arc {
                radius_in: 20.0,
                angle_deg: 90.0,
            }],
            ..base_input()
        };
        let report = run(&input);
        assert!(report.is_compliant);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_friction_ceiling_violation() {
        // ASHRAE carries a 0.10 in.wg/100ft ceiling; a small duct at high
        // airflow blows through it (but stays under the velocity limit)
        let input = ValidationInput {
            geometry: DuctGeometry::Round { diameter_in: 10.0 },
            airflow_cfm: 1000.0,
            standard: DuctStandard::Ashrae,
            air: Some(AirConditions::standard()),
            material: Some(DuctMaterial::GalvanizedSteel),
            ..base_input()
        };
        let report = run(&input);
        let violation = report
            .violations
            .iter()
            .find(|v| v.code == "FRICTION_RATE_LIMIT")
            .expect("friction-rate violation");
        assert!(violation.current_value > 0.10);
        assert_eq!(violation.required_value, 0.10);
        assert!(report.calculated_values.contains_key("friction_rate_in_wg_100ft"));
    }

    #[test]
    fn test_friction_ceiling_skipped_without_air() {
        let input = ValidationInput {
            standard: DuctStandard::Ashrae,
            ..base_input()
        };
        let report = run(&input);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.code == "FRICTION_RATE_LIMIT" && w.description.contains("not evaluated")));
    }

    #[test]
    fn test_recommendations_never_block_compliance() {
        // Near-limit aspect ratio generates warnings but stays compliant
        let input = ValidationInput {
            geometry: DuctGeometry::Rectangular {
                width_in: 28.0,
                height_in: 7.5,
            },
            airflow_cfm: 1000.0,
            ..base_input()
        };
        let report = run(&input);
        assert!(report.is_compliant);
    }

    #[test]
    fn test_custom_standards_table() {
        let strict = StandardsTable::from_entries(vec![(
            DuctStandard::Smacna,
            PressureClass::Low,
            StandardLimits {
                max_velocity_fpm: 800.0,
                max_aspect_ratio: 2.0,
                min_radius_ratio: 1.0,
                optimal_radius_ratio: 1.5,
                max_friction_rate: None,
            },
        )]);
        let report = validate(&base_input(), &strict, VpTable::reference()).unwrap();
        // 1000 fpm and 2:1 against the stricter custom limits
        assert!(report
            .violations
            .iter()
            .any(|v| v.code == "VELOCITY_LIMIT"));
        assert!(!report
            .violations
            .iter()
            .any(|v| v.code == "ASPECT_RATIO_LIMIT"));
    }

    #[test]
    fn test_report_serialization() {
        let report = run(&base_input());
        let json = serde_json::to_string(&report).unwrap();
        let roundtrip: ComplianceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, roundtrip);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let bad_flow = ValidationInput {
            airflow_cfm: 0.0,
            ..base_input()
        };
        assert!(validate(&bad_flow, StandardsTable::reference(), VpTable::reference()).is_err());

        let bad_arc = ValidationInput {
            centerline: vec![CenterlineSegment::Arc {
                radius_in: -2.0,
                angle_deg: 90.0,
            }],
            ..base_input()
        };
        assert!(validate(&bad_arc, StandardsTable::reference(), VpTable::reference()).is_err());
    }
}
