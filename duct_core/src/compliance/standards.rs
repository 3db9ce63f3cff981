//! # Duct Construction Standards
//!
//! Limit tables for the compliance validator: maximum velocity by
//! standard and pressure class, rectangular aspect-ratio limits, elbow
//! radius-ratio thresholds, and optional friction-rate ceilings.
//!
//! ## Overview
//!
//! | Limit              | SMACNA             | ASHRAE             |
//! |--------------------|--------------------|--------------------|
//! | Velocity (L/M/H)   | 2500 / 3500 / 4500 | 2000 / 2500 / 3000 |
//! | Aspect ratio       | 4:1                | 4:1                |
//! | Radius ratio (min) | 1.0                | 1.0                |
//! | Radius ratio (opt) | 1.5                | 1.5                |
//! | Friction ceiling   | -                  | 0.10 in.wg/100ft   |
//!
//! The table is an explicitly constructed, immutable object injected into
//! the validator, so tests can substitute alternate limits;
//! [`StandardsTable::reference`] supplies the published values.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{DuctError, DuctResult};

// ============================================================================
// Standard Clause References
// ============================================================================

/// Standard clause references for compliance checks.
///
/// These constants provide traceable references for every violation and
/// warning the validator emits.
pub mod clause {
    /// SMACNA duct velocity by pressure class
    pub const SMACNA_VELOCITY: &str = "SMACNA HVAC-DCS Table 1-2";
    /// SMACNA rectangular aspect-ratio guidance
    pub const SMACNA_ASPECT_RATIO: &str = "SMACNA HVAC-DCS 1.6";
    /// SMACNA elbow centerline radius construction
    pub const SMACNA_RADIUS_RATIO: &str = "SMACNA HVAC-DCS 2.5";
    /// SMACNA duct design friction-rate discussion
    pub const SMACNA_FRICTION_RATE: &str = "SMACNA HVAC Systems Duct Design 5.8";
    /// ASHRAE duct velocity guidance
    pub const ASHRAE_VELOCITY: &str = "ASHRAE Fundamentals Ch. 21, Table 8";
    /// ASHRAE rectangular aspect-ratio guidance
    pub const ASHRAE_ASPECT_RATIO: &str = "ASHRAE Fundamentals Ch. 21.9";
    /// ASHRAE elbow loss-coefficient tables
    pub const ASHRAE_RADIUS_RATIO: &str = "ASHRAE Fundamentals Ch. 21, Table 10";
    /// ASHRAE low-pressure design friction-rate guideline
    pub const ASHRAE_FRICTION_RATE: &str = "ASHRAE Fundamentals Ch. 21.10";
}

// ============================================================================
// Standards and Pressure Classes
// ============================================================================

/// Recognized duct construction standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuctStandard {
    /// SMACNA HVAC Duct Construction Standards
    Smacna,
    /// ASHRAE Fundamentals duct design guidance
    Ashrae,
}

impl DuctStandard {
    /// All standards for UI selection
    pub const ALL: [DuctStandard; 2] = [DuctStandard::Smacna, DuctStandard::Ashrae];

    pub fn display_name(&self) -> &'static str {
        match self {
            DuctStandard::Smacna => "SMACNA HVAC Duct Construction Standards",
            DuctStandard::Ashrae => "ASHRAE Fundamentals",
        }
    }

    /// Clause reference for the velocity limit
    pub fn velocity_clause(&self) -> &'static str {
        match self {
            DuctStandard::Smacna => clause::SMACNA_VELOCITY,
            DuctStandard::Ashrae => clause::ASHRAE_VELOCITY,
        }
    }

    /// Clause reference for the aspect-ratio limit
    pub fn aspect_ratio_clause(&self) -> &'static str {
        match self {
            DuctStandard::Smacna => clause::SMACNA_ASPECT_RATIO,
            DuctStandard::Ashrae => clause::ASHRAE_ASPECT_RATIO,
        }
    }

    /// Clause reference for the radius-ratio thresholds
    pub fn radius_ratio_clause(&self) -> &'static str {
        match self {
            DuctStandard::Smacna => clause::SMACNA_RADIUS_RATIO,
            DuctStandard::Ashrae => clause::ASHRAE_RADIUS_RATIO,
        }
    }

    /// Clause reference for the friction-rate ceiling
    pub fn friction_rate_clause(&self) -> &'static str {
        match self {
            DuctStandard::Smacna => clause::SMACNA_FRICTION_RATE,
            DuctStandard::Ashrae => clause::ASHRAE_FRICTION_RATE,
        }
    }
}

impl std::fmt::Display for DuctStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Pressure class bounding the maximum allowable system static pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureClass {
    /// Up to 2 in.wg static
    Low,
    /// Up to 6 in.wg static
    Medium,
    /// Up to 10 in.wg static
    High,
}

impl PressureClass {
    /// All pressure classes for UI selection
    pub const ALL: [PressureClass; 3] =
        [PressureClass::Low, PressureClass::Medium, PressureClass::High];

    /// Maximum system static pressure for the class (in.wg)
    pub fn max_static_in_wg(&self) -> f64 {
        match self {
            PressureClass::Low => 2.0,
            PressureClass::Medium => 6.0,
            PressureClass::High => 10.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PressureClass::Low => "Low",
            PressureClass::Medium => "Medium",
            PressureClass::High => "High",
        }
    }
}

impl std::fmt::Display for PressureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Limits
// ============================================================================

/// The limit set for one standard + pressure class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardLimits {
    /// Maximum duct velocity (fpm)
    pub max_velocity_fpm: f64,

    /// Maximum rectangular aspect ratio
    pub max_aspect_ratio: f64,

    /// Elbow radius ratio below which construction is non-compliant
    pub min_radius_ratio: f64,

    /// Elbow radius ratio below which pressure loss is merely elevated
    /// (warning territory between this and `min_radius_ratio`)
    pub optimal_radius_ratio: f64,

    /// Friction-rate ceiling (in.wg/100ft) where the standard defines one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_friction_rate: Option<f64>,
}

/// Rectangular aspect-ratio limit shared by both standards
pub const MAX_ASPECT_RATIO: f64 = 4.0;

/// Radius ratio below which an elbow is a violation
pub const MIN_RADIUS_RATIO: f64 = 1.0;

/// Radius ratio below which an elbow only warns
pub const OPTIMAL_RADIUS_RATIO: f64 = 1.5;

/// ASHRAE low-pressure design friction-rate guideline (in.wg/100ft)
pub const ASHRAE_MAX_FRICTION_RATE: f64 = 0.10;

/// SMACNA velocity limits by pressure class (fpm)
pub const SMACNA_VELOCITY_LIMITS_FPM: [f64; 3] = [2500.0, 3500.0, 4500.0];

/// ASHRAE velocity limits by pressure class (fpm)
pub const ASHRAE_VELOCITY_LIMITS_FPM: [f64; 3] = [2000.0, 2500.0, 3000.0];

/// Immutable limits table keyed by standard and pressure class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardsTable {
    entries: Vec<(DuctStandard, PressureClass, StandardLimits)>,
}

static REFERENCE_STANDARDS: Lazy<StandardsTable> = Lazy::new(|| {
    let mut entries = Vec::with_capacity(6);
    for standard in DuctStandard::ALL {
        let velocities = match standard {
            DuctStandard::Smacna => SMACNA_VELOCITY_LIMITS_FPM,
            DuctStandard::Ashrae => ASHRAE_VELOCITY_LIMITS_FPM,
        };
        let max_friction_rate = match standard {
            DuctStandard::Smacna => None,
            DuctStandard::Ashrae => Some(ASHRAE_MAX_FRICTION_RATE),
        };
        for (class, &max_velocity_fpm) in PressureClass::ALL.iter().zip(velocities.iter()) {
            entries.push((
                standard,
                *class,
                StandardLimits {
                    max_velocity_fpm,
                    max_aspect_ratio: MAX_ASPECT_RATIO,
                    min_radius_ratio: MIN_RADIUS_RATIO,
                    optimal_radius_ratio: OPTIMAL_RADIUS_RATIO,
                    max_friction_rate,
                },
            ));
        }
    }
    StandardsTable { entries }
});

impl StandardsTable {
    /// The built-in table with the published limits.
    pub fn reference() -> &'static StandardsTable {
        &REFERENCE_STANDARDS
    }

    /// Build a table from caller-supplied entries (test doubles,
    /// project-specific limits).
    pub fn from_entries(entries: Vec<(DuctStandard, PressureClass, StandardLimits)>) -> Self {
        StandardsTable { entries }
    }

    /// Look up the limits for a standard + pressure class.
    pub fn limits(
        &self,
        standard: DuctStandard,
        pressure_class: PressureClass,
    ) -> DuctResult<&StandardLimits> {
        self.entries
            .iter()
            .find(|(s, c, _)| *s == standard && *c == pressure_class)
            .map(|(_, _, limits)| limits)
            .ok_or_else(|| {
                DuctError::invalid_input(
                    "standard",
                    format!("{standard} / {pressure_class}"),
                    "No limits entry for this standard and pressure class",
                )
            })
    }
}
