//! # Duct Materials
//!
//! Duct material definitions and surface-roughness lookups, following the
//! ASHRAE Fundamentals roughness categories. The absolute roughness feeds
//! the relative-roughness term of every turbulent friction-factor
//! correlation; the surface condition applies an aging multiplier on top.
//!
//! ## Example
//!
//! ```rust
//! use duct_core::materials::{DuctMaterial, SurfaceCondition};
//!
//! let material = DuctMaterial::GalvanizedSteel;
//! assert_eq!(material.absolute_roughness_ft(), 0.0003);
//! assert_eq!(SurfaceCondition::New.aging_factor(), 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{DuctError, DuctResult};

/// Duct wall materials, grouped by the ASHRAE roughness categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuctMaterial {
    /// Galvanized sheet steel, longitudinal seams (medium smooth)
    #[default]
    GalvanizedSteel,
    /// Aluminum sheet (smooth)
    Aluminum,
    /// Stainless steel sheet (smooth)
    StainlessSteel,
    /// Unplasticized PVC (smooth)
    Pvc,
    /// Fibrous glass duct board (average)
    FibrousGlassDuctBoard,
    /// Fibrous glass duct liner, air side (medium rough)
    FibrousGlassLiner,
    /// Flexible duct, fully extended (rough)
    FlexibleDuct,
}

impl DuctMaterial {
    /// All material variants for UI selection
    pub const ALL: [DuctMaterial; 7] = [
        DuctMaterial::GalvanizedSteel,
        DuctMaterial::Aluminum,
        DuctMaterial::StainlessSteel,
        DuctMaterial::Pvc,
        DuctMaterial::FibrousGlassDuctBoard,
        DuctMaterial::FibrousGlassLiner,
        DuctMaterial::FlexibleDuct,
    ];

    /// Absolute surface roughness (ft), per the ASHRAE Fundamentals
    /// duct-roughness categories.
    pub fn absolute_roughness_ft(&self) -> f64 {
        match self {
            DuctMaterial::Aluminum | DuctMaterial::StainlessSteel | DuctMaterial::Pvc => 0.0001,
            DuctMaterial::GalvanizedSteel => 0.0003,
            DuctMaterial::FibrousGlassDuctBoard => 0.0005,
            DuctMaterial::FibrousGlassLiner => 0.003,
            DuctMaterial::FlexibleDuct => 0.01,
        }
    }

    /// Roughness category name as published
    pub fn roughness_category(&self) -> &'static str {
        match self {
            DuctMaterial::Aluminum | DuctMaterial::StainlessSteel | DuctMaterial::Pvc => "smooth",
            DuctMaterial::GalvanizedSteel => "medium smooth",
            DuctMaterial::FibrousGlassDuctBoard => "average",
            DuctMaterial::FibrousGlassLiner => "medium rough",
            DuctMaterial::FlexibleDuct => "rough",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> DuctResult<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "galvanized_steel" | "galvanized" => Ok(DuctMaterial::GalvanizedSteel),
            "aluminum" => Ok(DuctMaterial::Aluminum),
            "stainless_steel" | "stainless" => Ok(DuctMaterial::StainlessSteel),
            "pvc" => Ok(DuctMaterial::Pvc),
            "fibrous_glass_duct_board" | "duct_board" => Ok(DuctMaterial::FibrousGlassDuctBoard),
            "fibrous_glass_liner" | "lined" => Ok(DuctMaterial::FibrousGlassLiner),
            "flexible_duct" | "flex" => Ok(DuctMaterial::FlexibleDuct),
            _ => Err(DuctError::invalid_input(
                "material",
                s,
                "Unknown duct material",
            )),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DuctMaterial::GalvanizedSteel => "Galvanized steel",
            DuctMaterial::Aluminum => "Aluminum",
            DuctMaterial::StainlessSteel => "Stainless steel",
            DuctMaterial::Pvc => "PVC",
            DuctMaterial::FibrousGlassDuctBoard => "Fibrous glass duct board",
            DuctMaterial::FibrousGlassLiner => "Fibrous glass liner",
            DuctMaterial::FlexibleDuct => "Flexible duct",
        }
    }
}

impl std::fmt::Display for DuctMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Surface condition, applying an aging multiplier to the friction factor.
///
/// Dust loading, joint degradation, and liner erosion all raise effective
/// roughness over a duct system's service life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceCondition {
    /// Newly installed: no correction
    #[default]
    New,
    /// A few years in service, filtered supply air
    Good,
    /// Typical mid-life system
    Average,
    /// Heavy dust loading or degraded liner
    Poor,
}

/// Friction multiplier for [`SurfaceCondition::New`]
pub const AGING_FACTOR_NEW: f64 = 1.0;
/// Friction multiplier for [`SurfaceCondition::Good`]
pub const AGING_FACTOR_GOOD: f64 = 1.1;
/// Friction multiplier for [`SurfaceCondition::Average`]
pub const AGING_FACTOR_AVERAGE: f64 = 1.25;
/// Friction multiplier for [`SurfaceCondition::Poor`]
pub const AGING_FACTOR_POOR: f64 = 1.5;

impl SurfaceCondition {
    /// All condition variants for UI selection
    pub const ALL: [SurfaceCondition; 4] = [
        SurfaceCondition::New,
        SurfaceCondition::Good,
        SurfaceCondition::Average,
        SurfaceCondition::Poor,
    ];

    /// Friction-factor multiplier for this condition
    pub fn aging_factor(&self) -> f64 {
        match self {
            SurfaceCondition::New => AGING_FACTOR_NEW,
            SurfaceCondition::Good => AGING_FACTOR_GOOD,
            SurfaceCondition::Average => AGING_FACTOR_AVERAGE,
            SurfaceCondition::Poor => AGING_FACTOR_POOR,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SurfaceCondition::New => "New",
            SurfaceCondition::Good => "Good",
            SurfaceCondition::Average => "Average",
            SurfaceCondition::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for SurfaceCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
