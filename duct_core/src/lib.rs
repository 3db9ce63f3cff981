//! # duct_core - Duct Sizing & Compliance Calculation Engine
//!
//! `duct_core` sizes and validates air-duct segments for HVAC design with
//! a clean, LLM-friendly API. Given required airflow and system
//! constraints it determines duct geometry, the resulting velocity and
//! friction-driven pressure loss, and whether the result satisfies
//! recognized engineering standards. All inputs and outputs are
//! JSON-serializable, making it ideal for integration with AI assistants
//! via MCP or similar protocols.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results;
//!   the only long-lived state is read-only reference tables
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **No Bare Numbers**: Every computation returns a
//!   [`result::CalculationResult`] carrying unit, method, and uncertainty
//! - **Bounded Iteration**: Every solver takes explicit caps and
//!   tolerances, so worst-case latency is predictable and a cap overrun
//!   is a typed error
//!
//! Because every public function is pure over immutable tables, calls are
//! safe to issue concurrently from any number of threads; batch work
//! parallelizes trivially across segments.
//!
//! ## Quick Start
//!
//! ```rust
//! use duct_core::air::AirConditions;
//! use duct_core::calculations::sizing::{size_duct, SizingInput, SizingShape, SizingConstraints};
//! use duct_core::materials::{DuctMaterial, SurfaceCondition};
//! use duct_core::tables::VpTable;
//!
//! let input = SizingInput {
//!     label: "SA-1".to_string(),
//!     airflow_cfm: 2000.0,
//!     target_friction_rate: 0.08,
//!     shape: SizingShape::Rectangular { aspect_ratio: 2.5 },
//!     constraints: SizingConstraints::default(),
//!     material: DuctMaterial::GalvanizedSteel,
//!     condition: SurfaceCondition::New,
//!     air: AirConditions::standard(),
//!     method: None,
//! };
//! let sized = size_duct(&input, VpTable::reference()).unwrap();
//! assert!((sized.achieved_friction.value - 0.08).abs() / 0.08 <= 0.01);
//! ```
//!
//! ## Modules
//!
//! - [`air`] - Moist-air property calculation (density, viscosity, cp, k, Pr)
//! - [`calculations`] - Velocity pressure, friction loss, duct sizing
//! - [`compliance`] - Standards validation and compliance reports
//! - [`geometry`] - Duct cross-section geometry
//! - [`flow`] - Flow state and regime classification
//! - [`materials`] - Duct material roughness database
//! - [`methods`] - Calculation-method sum types and auto-selection
//! - [`tables`] - Injectable reference tables
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod air;
pub mod calculations;
pub mod compliance;
pub mod errors;
pub mod flow;
pub mod geometry;
pub mod materials;
pub mod methods;
pub mod result;
pub mod tables;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use air::{compute_properties, AirConditions, AirProperties, PropertyCache};
pub use calculations::{
    friction_loss, pressure_to_velocity, size_duct, velocity_to_pressure, FrictionLossInput,
    FrictionLossResult, SizingInput, SizingResult,
};
pub use compliance::{validate, ComplianceReport, ValidationInput};
pub use errors::{DuctError, DuctResult};
pub use flow::{FlowRegime, FlowState};
pub use geometry::DuctGeometry;
pub use materials::{DuctMaterial, SurfaceCondition};
pub use methods::{CalculationMethod, FrictionFactorMethod, VelocityPressureMethod};
pub use result::CalculationResult;
pub use tables::VpTable;
