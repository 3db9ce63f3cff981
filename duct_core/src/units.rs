//! # Unit Types
//!
//! Type-safe wrappers for HVAC engineering units. These provide compile-time
//! safety against unit confusion while remaining lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Duct design uses a small, consistent set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## US Customary Units (Primary)
//!
//! The engine works in US customary units internally, matching SMACNA and
//! ASHRAE duct design practice:
//! - Velocity: feet per minute (fpm)
//! - Airflow: cubic feet per minute (cfm)
//! - Pressure: inches of water gauge (in.wg)
//! - Friction rate: in.wg per 100 ft of duct
//! - Dimensions: inches (duct cross-section), feet (duct run)
//!
//! SI conversions are provided at the boundary; a value tagged with one
//! unit system is never silently reinterpreted as another (see
//! [`crate::result::CalculationResult::expect_unit`]).
//!
//! ## Example
//!
//! ```rust
//! use duct_core::units::{Fpm, MetersPerSecond, InWg, Pascals};
//!
//! let velocity = Fpm(2000.0);
//! let si: MetersPerSecond = velocity.into();
//! assert!((si.0 - 10.16).abs() < 0.001);
//!
//! let vp = Pascals(249.089);
//! let imperial: InWg = vp.into();
//! assert!((imperial.0 - 1.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Feet per meter
pub const FT_PER_M: f64 = 3.280_839_895_013_123;

/// Seconds per minute
pub const S_PER_MIN: f64 = 60.0;

/// Pascals per inch of water gauge (at 4 degC reference density)
pub const PA_PER_IN_WG: f64 = 249.089;

/// Inches per millimeter
pub const IN_PER_MM: f64 = 1.0 / 25.4;

/// Cubic feet per cubic meter
pub const FT3_PER_M3: f64 = FT_PER_M * FT_PER_M * FT_PER_M;

/// Inches of water gauge per inch of mercury
pub const IN_WG_PER_IN_HG: f64 = 13.6087;

// ============================================================================
// Velocity Units
// ============================================================================

/// Velocity in feet per minute (fpm)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fpm(pub f64);

/// Velocity in meters per second (m/s)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetersPerSecond(pub f64);

impl From<Fpm> for MetersPerSecond {
    fn from(v: Fpm) -> Self {
        MetersPerSecond(v.0 / FT_PER_M / S_PER_MIN)
    }
}

impl From<MetersPerSecond> for Fpm {
    fn from(v: MetersPerSecond) -> Self {
        Fpm(v.0 * FT_PER_M * S_PER_MIN)
    }
}

// ============================================================================
// Airflow Units
// ============================================================================

/// Airflow in cubic feet per minute (cfm)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cfm(pub f64);

/// Airflow in cubic meters per hour (m3/h)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMetersPerHour(pub f64);

impl From<Cfm> for CubicMetersPerHour {
    fn from(q: Cfm) -> Self {
        CubicMetersPerHour(q.0 / FT3_PER_M3 * 60.0)
    }
}

impl From<CubicMetersPerHour> for Cfm {
    fn from(q: CubicMetersPerHour) -> Self {
        Cfm(q.0 * FT3_PER_M3 / 60.0)
    }
}

// ============================================================================
// Pressure Units
// ============================================================================

/// Pressure in inches of water gauge (in.wg)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InWg(pub f64);

/// Pressure in pascals (Pa)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

impl From<InWg> for Pascals {
    fn from(p: InWg) -> Self {
        Pascals(p.0 * PA_PER_IN_WG)
    }
}

impl From<Pascals> for InWg {
    fn from(p: Pascals) -> Self {
        InWg(p.0 / PA_PER_IN_WG)
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 * IN_PER_MM)
    }
}

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 / IN_PER_MM)
    }
}

// ============================================================================
// Temperature Helpers
// ============================================================================

/// Convert Fahrenheit to Celsius
pub fn fahrenheit_to_celsius(t_f: f64) -> f64 {
    (t_f - 32.0) / 1.8
}

/// Convert Celsius to Fahrenheit
pub fn celsius_to_fahrenheit(t_c: f64) -> f64 {
    t_c * 1.8 + 32.0
}

/// Convert Fahrenheit to Rankine (absolute)
pub fn fahrenheit_to_rankine(t_f: f64) -> f64 {
    t_f + 459.67
}

/// Convert Fahrenheit to Kelvin (absolute)
pub fn fahrenheit_to_kelvin(t_f: f64) -> f64 {
    fahrenheit_to_rankine(t_f) / 1.8
}

// ============================================================================
// Unit Tags
// ============================================================================

/// Unit system selector for engine inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitSystem {
    /// US customary (fpm, cfm, in.wg, inches) - the engine's native system
    #[default]
    Imperial,
    /// SI (m/s, m3/h, Pa, mm) - converted at the boundary
    Si,
}

/// Unit tag carried by every [`crate::result::CalculationResult`].
///
/// The tag travels verbatim through serialization so a calling layer can
/// never silently reinterpret a value in another unit system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Feet per minute
    #[serde(rename = "fpm")]
    Fpm,
    /// Cubic feet per minute
    #[serde(rename = "cfm")]
    Cfm,
    /// Inches of water gauge
    #[serde(rename = "in.wg")]
    InWg,
    /// Inches of water gauge per 100 ft of duct
    #[serde(rename = "in.wg/100ft")]
    InWgPer100Ft,
    /// Pounds per cubic foot
    #[serde(rename = "lb/ft3")]
    LbPerFt3,
    /// Pounds per foot-second (dynamic viscosity)
    #[serde(rename = "lb/(ft.s)")]
    LbPerFtS,
    /// Inches
    #[serde(rename = "in")]
    Inches,
    /// Dimensionless quantity (friction factor, ratio)
    #[serde(rename = "-")]
    Dimensionless,
}

impl Unit {
    /// Get the display string for this unit
    pub fn code(&self) -> &'static str {
        match self {
            Unit::Fpm => "fpm",
            Unit::Cfm => "cfm",
            Unit::InWg => "in.wg",
            Unit::InWgPer100Ft => "in.wg/100ft",
            Unit::LbPerFt3 => "lb/ft3",
            Unit::LbPerFtS => "lb/(ft.s)",
            Unit::Inches => "in",
            Unit::Dimensionless => "-",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_conversion() {
        let v = Fpm(2000.0);
        let si: MetersPerSecond = v.into();
        assert!((si.0 - 10.16).abs() < 0.001);
        let back: Fpm = si.into();
        assert!((back.0 - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_conversion() {
        let p = InWg(0.08);
        let pa: Pascals = p.into();
        assert!((pa.0 - 19.92712).abs() < 1e-4);
    }

    #[test]
    fn test_length_conversion() {
        let d = Inches(12.0);
        let ft: Feet = d.into();
        assert_eq!(ft.0, 1.0);
        let mm: Millimeters = d.into();
        assert!((mm.0 - 304.8).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_helpers() {
        assert!((fahrenheit_to_celsius(70.0) - 21.111_111).abs() < 1e-5);
        assert!((fahrenheit_to_rankine(70.0) - 529.67).abs() < 1e-12);
        assert!((celsius_to_fahrenheit(fahrenheit_to_celsius(123.4)) - 123.4).abs() < 1e-9);
    }

    #[test]
    fn test_airflow_conversion() {
        let q = Cfm(2000.0);
        let si: CubicMetersPerHour = q.into();
        assert!((si.0 - 3398.0).abs() < 1.0);
        let back: Cfm = si.into();
        assert!((back.0 - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_tag_serialization() {
        let json = serde_json::to_string(&Unit::InWgPer100Ft).unwrap();
        assert_eq!(json, "\"in.wg/100ft\"");
        let back: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Unit::InWgPer100Ft);
    }

    #[test]
    fn test_unit_system_default() {
        assert_eq!(UnitSystem::default(), UnitSystem::Imperial);
        let json = serde_json::to_string(&UnitSystem::Si).unwrap();
        let back: UnitSystem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UnitSystem::Si);
    }
}
