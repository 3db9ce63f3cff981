//! # Flow State
//!
//! Derived flow quantities for a duct segment: mean velocity, Reynolds
//! number, and flow regime. A [`FlowState`] is never assembled field by
//! field; it is always recomputed as a unit from airflow, geometry, and
//! air properties so velocity and Reynolds number stay consistent.

use serde::{Deserialize, Serialize};

use crate::air::AirProperties;
use crate::errors::{DuctError, DuctResult};
use crate::geometry::DuctGeometry;

/// Upper Reynolds number of the laminar regime (exclusive)
pub const REYNOLDS_LAMINAR_MAX: f64 = 2_300.0;

/// Lower Reynolds number of the fully turbulent regime (exclusive)
pub const REYNOLDS_TURBULENT_MIN: f64 = 4_000.0;

/// Flow regime classified by Reynolds number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRegime {
    /// Re < 2,300: viscous forces dominate; f = 64/Re
    Laminar,
    /// 2,300 <= Re <= 4,000: unstable region between regimes
    Transitional,
    /// Re > 4,000: turbulent correlations apply
    Turbulent,
}

impl FlowRegime {
    /// Classify a Reynolds number.
    pub fn classify(reynolds: f64) -> Self {
        if reynolds < REYNOLDS_LAMINAR_MAX {
            FlowRegime::Laminar
        } else if reynolds <= REYNOLDS_TURBULENT_MIN {
            FlowRegime::Transitional
        } else {
            FlowRegime::Turbulent
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FlowRegime::Laminar => "laminar",
            FlowRegime::Transitional => "transitional",
            FlowRegime::Turbulent => "turbulent",
        }
    }
}

impl std::fmt::Display for FlowRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Flow state of a duct segment at a given airflow.
///
/// Derived, not independently settable: construct through
/// [`FlowState::from_airflow`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    /// Volumetric airflow (cfm)
    pub airflow_cfm: f64,

    /// Mean velocity = airflow / area (fpm)
    pub velocity_fpm: f64,

    /// Reynolds number based on hydraulic diameter
    pub reynolds: f64,

    /// Flow regime classified from the Reynolds number
    pub regime: FlowRegime,
}

impl FlowState {
    /// Compute the flow state from airflow, geometry, and air properties.
    pub fn from_airflow(
        airflow_cfm: f64,
        geometry: &DuctGeometry,
        properties: &AirProperties,
    ) -> DuctResult<FlowState> {
        if airflow_cfm <= 0.0 {
            return Err(DuctError::invalid_input(
                "airflow_cfm",
                airflow_cfm.to_string(),
                "Airflow must be positive",
            ));
        }
        geometry.validate()?;

        let velocity_fpm = airflow_cfm / geometry.area_ft2();
        let velocity_ft_s = velocity_fpm / 60.0;
        let reynolds = properties.density_lb_ft3 * velocity_ft_s * geometry.hydraulic_diameter_ft()
            / properties.viscosity_lb_ft_s;

        Ok(FlowState {
            airflow_cfm,
            velocity_fpm,
            reynolds,
            regime: FlowRegime::classify(reynolds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::{compute_properties, AirConditions};

    fn standard_props() -> AirProperties {
        compute_properties(&AirConditions::standard()).unwrap()
    }

    #[test]
    fn test_regime_thresholds() {
        assert_eq!(FlowRegime::classify(1_000.0), FlowRegime::Laminar);
        assert_eq!(FlowRegime::classify(2_299.9), FlowRegime::Laminar);
        assert_eq!(FlowRegime::classify(2_300.0), FlowRegime::Transitional);
        assert_eq!(FlowRegime::classify(4_000.0), FlowRegime::Transitional);
        assert_eq!(FlowRegime::classify(4_000.1), FlowRegime::Turbulent);
    }

    #[test]
    fn test_velocity_from_airflow() {
        let duct = DuctGeometry::Rectangular {
            width_in: 24.0,
            height_in: 12.0,
        };
        let flow = FlowState::from_airflow(2000.0, &duct, &standard_props()).unwrap();
        // 2000 cfm / 2 ft2 = 1000 fpm
        assert!((flow.velocity_fpm - 1000.0).abs() < 1e-9);
        assert_eq!(flow.regime, FlowRegime::Turbulent);
    }

    #[test]
    fn test_reynolds_number() {
        let duct = DuctGeometry::Round { diameter_in: 12.0 };
        let props = standard_props();
        let flow = FlowState::from_airflow(785.398, &duct, &props).unwrap();
        // ~1000 fpm in a 12 in round duct at standard air
        let expected = props.density_lb_ft3 * (flow.velocity_fpm / 60.0) / props.viscosity_lb_ft_s;
        assert!((flow.reynolds - expected).abs() < 1.0);
        assert!(flow.reynolds > 100_000.0 && flow.reynolds < 110_000.0);
    }

    #[test]
    fn test_low_airflow_is_laminar() {
        let duct = DuctGeometry::Round { diameter_in: 12.0 };
        let flow = FlowState::from_airflow(1.0, &duct, &standard_props()).unwrap();
        assert_eq!(flow.regime, FlowRegime::Laminar);
    }

    #[test]
    fn test_rejects_nonpositive_airflow() {
        let duct = DuctGeometry::Round { diameter_in: 12.0 };
        assert!(FlowState::from_airflow(0.0, &duct, &standard_props()).is_err());
        assert!(FlowState::from_airflow(-10.0, &duct, &standard_props()).is_err());
    }
}
