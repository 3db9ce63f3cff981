//! # Duct Calculations
//!
//! This module contains the engine's calculation stages. Each calculation
//! follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - a pure function taking the input plus the injected reference tables
//!
//! Data flows strictly downward: velocity-pressure resolution feeds
//! friction loss, friction loss feeds sizing, and the compliance
//! validator consumes sized ducts without reaching back.
//!
//! ## Available Calculations
//!
//! - [`velocity_pressure`] - velocity <-> velocity pressure, five methods
//! - [`friction`] - friction factor and loss per 100 ft
//! - [`sizing`] - duct dimensions for a target friction rate

pub mod friction;
pub mod sizing;
pub mod velocity_pressure;

// Re-export commonly used types
pub use friction::{friction_factor, friction_loss, FrictionLossInput, FrictionLossResult};
pub use sizing::{size_duct, SizingConstraints, SizingInput, SizingResult, SizingShape};
pub use velocity_pressure::{
    pressure_to_velocity, velocity_to_pressure, PressureToVelocityInput, VelocityPressureInput,
};
