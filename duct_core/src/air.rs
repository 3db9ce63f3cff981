//! # Air Properties
//!
//! Thermodynamic and transport properties of moist air for duct
//! calculations: density, dynamic viscosity, specific heat, thermal
//! conductivity, and Prandtl number, all environment-corrected for
//! temperature, altitude, and humidity.
//!
//! ## Formulas
//!
//! - Density: ideal-gas law on altitude-corrected barometric pressure with
//!   a vapor partial-pressure correction
//! - Viscosity: Sutherland's formula
//! - Specific heat / thermal conductivity: polynomial fits valid over the
//!   documented envelope
//! - Prandtl number: Pr = cp * mu / k (unit-consistent)
//!
//! Every coefficient is a named public constant so an independent
//! implementation reproduces these results to within 1e-6 relative error.
//! Inputs outside the validated envelope fail with
//! [`DuctError::OutOfRange`]; values are never clamped or extrapolated.
//!
//! ## Example
//!
//! ```rust
//! use duct_core::air::{AirConditions, compute_properties};
//!
//! let conditions = AirConditions::standard();
//! let props = compute_properties(&conditions).unwrap();
//!
//! // Standard air at 70 F, sea level, dry
//! assert!((props.density_lb_ft3 - 0.0749).abs() < 0.0001);
//! assert!((props.prandtl - 0.72).abs() < 0.01);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{DuctError, DuctResult};

// ============================================================================
// Validated Envelope
// ============================================================================

/// Dry-bulb temperature envelope (degrees F)
pub const TEMPERATURE_RANGE_F: (f64, f64) = (-40.0, 200.0);

/// Altitude envelope (feet above sea level)
pub const ALTITUDE_RANGE_FT: (f64, f64) = (0.0, 15_000.0);

/// Relative humidity envelope (fraction, 0 = dry, 1 = saturated)
pub const HUMIDITY_RANGE: (f64, f64) = (0.0, 1.0);

/// Relative uncertainty attributed to the air-property model (+/- %),
/// combined in quadrature with method uncertainty by downstream
/// calculations.
pub const AIR_PROPERTY_UNCERTAINTY_PCT: f64 = 1.0;

// ============================================================================
// Standard Atmosphere
// ============================================================================

/// Sea-level barometric pressure (in Hg)
pub const SEA_LEVEL_PRESSURE_IN_HG: f64 = 29.921;

/// Standard-atmosphere lapse coefficient (per ft)
pub const ALTITUDE_LAPSE_COEFF_PER_FT: f64 = 6.8754e-6;

/// Standard-atmosphere lapse exponent
pub const ALTITUDE_LAPSE_EXPONENT: f64 = 5.2559;

// ============================================================================
// Ideal Gas (US customary)
// ============================================================================

/// Specific gas constant of dry air (ft-lbf per lb per degree R)
pub const DRY_AIR_GAS_CONSTANT: f64 = 53.352;

/// Pressure conversion: lb/ft2 per in Hg
pub const LB_PER_FT2_PER_IN_HG: f64 = 70.726;

/// Molecular weight ratio of water vapor to dry air
pub const MOLECULAR_WEIGHT_RATIO: f64 = 0.622;

/// Density correction factor for vapor partial pressure (1 - 0.622)
pub const VAPOR_DENSITY_FACTOR: f64 = 1.0 - MOLECULAR_WEIGHT_RATIO;

// ============================================================================
// Saturation Pressure (Tetens)
// ============================================================================

/// Tetens saturation-pressure base (kPa)
pub const TETENS_BASE_KPA: f64 = 0.61078;

/// Tetens exponential coefficient
pub const TETENS_COEFF: f64 = 17.27;

/// Tetens temperature offset (degrees C)
pub const TETENS_OFFSET_C: f64 = 237.3;

/// kPa per in Hg
pub const KPA_PER_IN_HG: f64 = 3.38639;

// ============================================================================
// Sutherland Viscosity
// ============================================================================

/// Reference dynamic viscosity of air (Pa-s) at [`SUTHERLAND_REFERENCE_TEMP_K`]
pub const SUTHERLAND_REFERENCE_VISCOSITY_PA_S: f64 = 1.716e-5;

/// Sutherland reference temperature (K)
pub const SUTHERLAND_REFERENCE_TEMP_K: f64 = 273.15;

/// Sutherland constant for air (K)
pub const SUTHERLAND_CONSTANT_K: f64 = 110.4;

/// lb/(ft-s) per Pa-s
pub const LB_FT_S_PER_PA_S: f64 = 0.671_968_994_813;

// ============================================================================
// Polynomial Fits (valid over the documented envelope)
// ============================================================================

/// Specific heat of dry air, Btu/(lb-F): cp = c0 + c1*T_F + c2*T_F^2
pub const SPECIFIC_HEAT_COEFFS: [f64; 3] = [0.2403, 2.75e-6, 5.0e-9];

/// Specific heat of water vapor, Btu/(lb-F); weighted by humidity ratio
pub const SPECIFIC_HEAT_WATER_VAPOR: f64 = 0.444;

/// Thermal conductivity of air, Btu/(hr-ft-F): k = k0 + k1*T_F + k2*T_F^2
pub const CONDUCTIVITY_COEFFS: [f64; 3] = [0.013094, 2.224e-5, -1.372e-9];

/// Seconds per hour, for the Prandtl-number unit reconciliation
/// (cp in Btu/lb-F, mu in lb/ft-s, k in Btu/hr-ft-F)
pub const SECONDS_PER_HOUR: f64 = 3600.0;

// ============================================================================
// Types
// ============================================================================

/// Ambient air conditions for a calculation.
///
/// Immutable value type, constructed per calculation call.
///
/// ## JSON Example
///
/// ```json
/// {
///   "temperature_f": 70.0,
///   "altitude_ft": 5000.0,
///   "relative_humidity": 0.5
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirConditions {
    /// Dry-bulb temperature (degrees F)
    pub temperature_f: f64,

    /// Altitude above sea level (ft); drives the barometric pressure model
    /// unless `barometric_in_hg` is supplied
    pub altitude_ft: f64,

    /// Relative humidity (0 to 1)
    pub relative_humidity: f64,

    /// Measured barometric pressure (in Hg); overrides the
    /// standard-atmosphere altitude model when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barometric_in_hg: Option<f64>,
}

impl AirConditions {
    /// Standard air: 70 F, sea level, dry
    pub fn standard() -> Self {
        AirConditions {
            temperature_f: 70.0,
            altitude_ft: 0.0,
            relative_humidity: 0.0,
            barometric_in_hg: None,
        }
    }

    /// Validate against the documented physical envelope.
    pub fn validate(&self) -> DuctResult<()> {
        if self.temperature_f < TEMPERATURE_RANGE_F.0 || self.temperature_f > TEMPERATURE_RANGE_F.1
        {
            return Err(DuctError::out_of_range(
                "temperature_f",
                self.temperature_f,
                TEMPERATURE_RANGE_F.0,
                TEMPERATURE_RANGE_F.1,
            ));
        }
        if self.altitude_ft < ALTITUDE_RANGE_FT.0 || self.altitude_ft > ALTITUDE_RANGE_FT.1 {
            return Err(DuctError::out_of_range(
                "altitude_ft",
                self.altitude_ft,
                ALTITUDE_RANGE_FT.0,
                ALTITUDE_RANGE_FT.1,
            ));
        }
        if self.relative_humidity < HUMIDITY_RANGE.0 || self.relative_humidity > HUMIDITY_RANGE.1 {
            return Err(DuctError::out_of_range(
                "relative_humidity",
                self.relative_humidity,
                HUMIDITY_RANGE.0,
                HUMIDITY_RANGE.1,
            ));
        }
        if let Some(p) = self.barometric_in_hg {
            if p <= 0.0 {
                return Err(DuctError::invalid_input(
                    "barometric_in_hg",
                    p.to_string(),
                    "Barometric pressure must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Absolute barometric pressure (in Hg): the caller-supplied reading,
    /// or the standard-atmosphere model at `altitude_ft`.
    pub fn absolute_pressure_in_hg(&self) -> f64 {
        match self.barometric_in_hg {
            Some(p) => p,
            None => {
                SEA_LEVEL_PRESSURE_IN_HG
                    * (1.0 - ALTITUDE_LAPSE_COEFF_PER_FT * self.altitude_ft)
                        .powf(ALTITUDE_LAPSE_EXPONENT)
            }
        }
    }
}

/// Derived thermodynamic and transport properties of moist air.
///
/// Pure function output of [`AirConditions`]; see [`compute_properties`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirProperties {
    /// Density (lb/ft3)
    pub density_lb_ft3: f64,

    /// Dynamic viscosity (lb/(ft-s))
    pub viscosity_lb_ft_s: f64,

    /// Specific heat at constant pressure (Btu/(lb-F))
    pub specific_heat_btu_lb_f: f64,

    /// Thermal conductivity (Btu/(hr-ft-F))
    pub thermal_conductivity_btu_hr_ft_f: f64,

    /// Prandtl number (dimensionless)
    pub prandtl: f64,

    /// Absolute ambient pressure (in Hg), altitude- or reading-derived
    pub absolute_pressure_in_hg: f64,

    /// Humidity ratio W (lb water vapor per lb dry air)
    pub humidity_ratio: f64,
}

// ============================================================================
// Calculator
// ============================================================================

/// Saturation vapor pressure by the Tetens formula (in Hg).
pub fn saturation_pressure_in_hg(temperature_f: f64) -> f64 {
    let t_c = crate::units::fahrenheit_to_celsius(temperature_f);
    let p_sat_kpa = TETENS_BASE_KPA * (TETENS_COEFF * t_c / (t_c + TETENS_OFFSET_C)).exp();
    p_sat_kpa / KPA_PER_IN_HG
}

/// Compute moist-air properties for the given conditions.
///
/// Fails with [`DuctError::OutOfRange`] when temperature, altitude, or
/// humidity fall outside the validated envelope, or when the vapor partial
/// pressure would reach the ambient absolute pressure (high temperature at
/// high altitude caps the admissible relative humidity below 1).
pub fn compute_properties(conditions: &AirConditions) -> DuctResult<AirProperties> {
    conditions.validate()?;

    let t_r = crate::units::fahrenheit_to_rankine(conditions.temperature_f);
    let t_k = crate::units::fahrenheit_to_kelvin(conditions.temperature_f);

    let p_total = conditions.absolute_pressure_in_hg();
    let p_sat = saturation_pressure_in_hg(conditions.temperature_f);
    let p_vapor = conditions.relative_humidity * p_sat;

    // The ideal-gas moist-air model requires pv < p; near the boiling
    // point at altitude this caps the admissible relative humidity.
    if p_vapor >= p_total {
        let max_rh = (p_total / p_sat).min(HUMIDITY_RANGE.1);
        return Err(DuctError::out_of_range(
            "relative_humidity",
            conditions.relative_humidity,
            HUMIDITY_RANGE.0,
            max_rh,
        ));
    }

    let density_lb_ft3 =
        (p_total - VAPOR_DENSITY_FACTOR * p_vapor) * LB_PER_FT2_PER_IN_HG / (DRY_AIR_GAS_CONSTANT * t_r);

    let humidity_ratio = if p_vapor > 0.0 {
        MOLECULAR_WEIGHT_RATIO * p_vapor / (p_total - p_vapor)
    } else {
        0.0
    };

    let viscosity_pa_s = SUTHERLAND_REFERENCE_VISCOSITY_PA_S
        * (t_k / SUTHERLAND_REFERENCE_TEMP_K).powf(1.5)
        * (SUTHERLAND_REFERENCE_TEMP_K + SUTHERLAND_CONSTANT_K)
        / (t_k + SUTHERLAND_CONSTANT_K);
    let viscosity_lb_ft_s = viscosity_pa_s * LB_FT_S_PER_PA_S;

    let t_f = conditions.temperature_f;
    let specific_heat_btu_lb_f = SPECIFIC_HEAT_COEFFS[0]
        + SPECIFIC_HEAT_COEFFS[1] * t_f
        + SPECIFIC_HEAT_COEFFS[2] * t_f * t_f
        + humidity_ratio * SPECIFIC_HEAT_WATER_VAPOR;

    let thermal_conductivity_btu_hr_ft_f =
        CONDUCTIVITY_COEFFS[0] + CONDUCTIVITY_COEFFS[1] * t_f + CONDUCTIVITY_COEFFS[2] * t_f * t_f;

    let prandtl = specific_heat_btu_lb_f * viscosity_lb_ft_s * SECONDS_PER_HOUR
        / thermal_conductivity_btu_hr_ft_f;

    Ok(AirProperties {
        density_lb_ft3,
        viscosity_lb_ft_s,
        specific_heat_btu_lb_f,
        thermal_conductivity_btu_hr_ft_f,
        prandtl,
        absolute_pressure_in_hg: p_total,
        humidity_ratio,
    })
}

// ============================================================================
// Batch Cache
// ============================================================================

/// Hash key over the exact bit patterns of the condition fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ConditionsKey {
    temperature: u64,
    altitude: u64,
    humidity: u64,
    barometric: Option<u64>,
}

impl ConditionsKey {
    fn of(conditions: &AirConditions) -> Self {
        ConditionsKey {
            temperature: conditions.temperature_f.to_bits(),
            altitude: conditions.altitude_ft.to_bits(),
            humidity: conditions.relative_humidity.to_bits(),
            barometric: conditions.barometric_in_hg.map(f64::to_bits),
        }
    }
}

/// Call-scoped property cache for batch calculations.
///
/// Sizing many segments under the same ambient conditions recomputes the
/// same properties repeatedly; the cache keys on the exact bit pattern of
/// the conditions so identical inputs hit, and nothing survives beyond the
/// batch that owns the cache.
#[derive(Debug, Default)]
pub struct PropertyCache {
    entries: HashMap<ConditionsKey, AirProperties>,
}

impl PropertyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or compute properties for the given conditions.
    pub fn get_or_compute(&mut self, conditions: &AirConditions) -> DuctResult<AirProperties> {
        let key = ConditionsKey::of(conditions);
        if let Some(props) = self.entries.get(&key) {
            return Ok(*props);
        }
        let props = compute_properties(conditions)?;
        self.entries.insert(key, props);
        Ok(props)
    }

    /// Number of distinct condition sets cached
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
