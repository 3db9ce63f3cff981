//! # Reference Tables
//!
//! Read-only constant data injected into the engine: the velocity-pressure
//! reference table. Tables are explicitly constructed, immutable objects
//! passed into calculations by reference rather than hidden global state,
//! so tests can substitute alternate data; [`VpTable::reference`] supplies
//! the published defaults, initialized once and never mutated.
//!
//! The reference table tabulates velocity pressure for standard air
//! (0.075 lb/ft3) on a uniform 50 fpm grid from 100 to 6,000 fpm, the
//! range covered by the published duct-design tables. Lookups are
//! density-scaled by the caller.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{DuctError, DuctResult};

/// Standard air density the reference table is tabulated at (lb/ft3)
pub const TABLE_REFERENCE_DENSITY_LB_FT3: f64 = 0.075;

/// Grid spacing of the reference table (fpm)
pub const TABLE_GRID_STEP_FPM: f64 = 50.0;

/// Velocity pressure at standard density, tabulated every 50 fpm
/// (velocity fpm, velocity pressure in.wg).
pub const VELOCITY_PRESSURE_REFERENCE: &[(f64, f64)] = &[
    (100.0, 0.000623), (150.0, 0.001403), (200.0, 0.002494),
    (250.0, 0.003897), (300.0, 0.005611), (350.0, 0.007637),
    (400.0, 0.009975), (450.0, 0.012625), (500.0, 0.015586),
    (550.0, 0.018859), (600.0, 0.022444), (650.0, 0.026340),
    (700.0, 0.030549), (750.0, 0.035069), (800.0, 0.039900),
    (850.0, 0.045044), (900.0, 0.050499), (950.0, 0.056265),
    (1000.0, 0.062344), (1050.0, 0.068734), (1100.0, 0.075436),
    (1150.0, 0.082450), (1200.0, 0.089775), (1250.0, 0.097413),
    (1300.0, 0.105361), (1350.0, 0.113622), (1400.0, 0.122194),
    (1450.0, 0.131078), (1500.0, 0.140274), (1550.0, 0.149782),
    (1600.0, 0.159601), (1650.0, 0.169732), (1700.0, 0.180174),
    (1750.0, 0.190929), (1800.0, 0.201995), (1850.0, 0.213372),
    (1900.0, 0.225062), (1950.0, 0.237063), (2000.0, 0.249376),
    (2050.0, 0.262001), (2100.0, 0.274937), (2150.0, 0.288185),
    (2200.0, 0.301745), (2250.0, 0.315617), (2300.0, 0.329800),
    (2350.0, 0.344295), (2400.0, 0.359102), (2450.0, 0.374220),
    (2500.0, 0.389650), (2550.0, 0.405392), (2600.0, 0.421446),
    (2650.0, 0.437811), (2700.0, 0.454488), (2750.0, 0.471477),
    (2800.0, 0.488777), (2850.0, 0.506389), (2900.0, 0.524313),
    (2950.0, 0.542549), (3000.0, 0.561096), (3050.0, 0.579955),
    (3100.0, 0.599126), (3150.0, 0.618609), (3200.0, 0.638403),
    (3250.0, 0.658509), (3300.0, 0.678927), (3350.0, 0.699656),
    (3400.0, 0.720697), (3450.0, 0.742050), (3500.0, 0.763715),
    (3550.0, 0.785691), (3600.0, 0.807979), (3650.0, 0.830579),
    (3700.0, 0.853490), (3750.0, 0.876713), (3800.0, 0.900248),
    (3850.0, 0.924095), (3900.0, 0.948253), (3950.0, 0.972723),
    (4000.0, 0.997505), (4050.0, 1.022598), (4100.0, 1.048003),
    (4150.0, 1.073720), (4200.0, 1.099749), (4250.0, 1.126089),
    (4300.0, 1.152741), (4350.0, 1.179705), (4400.0, 1.206981),
    (4450.0, 1.234568), (4500.0, 1.262467), (4550.0, 1.290678),
    (4600.0, 1.319200), (4650.0, 1.348034), (4700.0, 1.377180),
    (4750.0, 1.406637), (4800.0, 1.436407), (4850.0, 1.466488),
    (4900.0, 1.496880), (4950.0, 1.527585), (5000.0, 1.558601),
    (5050.0, 1.589929), (5100.0, 1.621569), (5150.0, 1.653520),
    (5200.0, 1.685783), (5250.0, 1.718358), (5300.0, 1.751244),
    (5350.0, 1.784442), (5400.0, 1.817952), (5450.0, 1.851774),
    (5500.0, 1.885907), (5550.0, 1.920352), (5600.0, 1.955109),
    (5650.0, 1.990178), (5700.0, 2.025558), (5750.0, 2.061250),
    (5800.0, 2.097254), (5850.0, 2.133569), (5900.0, 2.170196),
    (5950.0, 2.207135), (6000.0, 2.244386),
];

/// One entry of the velocity-pressure table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VpEntry {
    /// Velocity (fpm)
    pub velocity_fpm: f64,
    /// Velocity pressure at standard density (in.wg)
    pub vp_in_wg: f64,
}

/// Immutable velocity-pressure table.
///
/// Constructed once (from the built-in reference data or a caller-supplied
/// alternative) and shared by reference; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpTable {
    entries: Vec<VpEntry>,
}

static REFERENCE_TABLE: Lazy<VpTable> = Lazy::new(|| {
    VpTable::from_entries(
        VELOCITY_PRESSURE_REFERENCE
            .iter()
            .map(|&(velocity_fpm, vp_in_wg)| VpEntry {
                velocity_fpm,
                vp_in_wg,
            })
            .collect(),
    )
    .expect("built-in velocity-pressure table is well-formed")
});

impl VpTable {
    /// The built-in reference table (standard air, 100..6,000 fpm).
    pub fn reference() -> &'static VpTable {
        &REFERENCE_TABLE
    }

    /// Build a table from caller-supplied entries.
    ///
    /// Entries must be strictly increasing in both velocity and velocity
    /// pressure; anything else is an [`DuctError::InvalidInput`].
    pub fn from_entries(entries: Vec<VpEntry>) -> DuctResult<VpTable> {
        if entries.len() < 2 {
            return Err(DuctError::invalid_input(
                "entries",
                entries.len().to_string(),
                "A velocity-pressure table needs at least two entries",
            ));
        }
        for pair in entries.windows(2) {
            if pair[1].velocity_fpm <= pair[0].velocity_fpm
                || pair[1].vp_in_wg <= pair[0].vp_in_wg
            {
                return Err(DuctError::invalid_input(
                    "entries",
                    format!("({}, {})", pair[1].velocity_fpm, pair[1].vp_in_wg),
                    "Table entries must be strictly increasing",
                ));
            }
        }
        Ok(VpTable { entries })
    }

    /// Lowest tabulated velocity (fpm)
    pub fn min_velocity_fpm(&self) -> f64 {
        self.entries[0].velocity_fpm
    }

    /// Highest tabulated velocity (fpm)
    pub fn max_velocity_fpm(&self) -> f64 {
        self.entries[self.entries.len() - 1].velocity_fpm
    }

    /// Whether a velocity lies on the tabulated range
    pub fn covers(&self, velocity_fpm: f64) -> bool {
        velocity_fpm >= self.min_velocity_fpm() && velocity_fpm <= self.max_velocity_fpm()
    }

    /// Lowest tabulated velocity pressure (in.wg)
    pub fn min_vp_in_wg(&self) -> f64 {
        self.entries[0].vp_in_wg
    }

    /// Highest tabulated velocity pressure (in.wg)
    pub fn max_vp_in_wg(&self) -> f64 {
        self.entries[self.entries.len() - 1].vp_in_wg
    }

    /// Nearest-entry lookup: velocity pressure of the entry closest in
    /// velocity. The caller is responsible for range-checking via
    /// [`VpTable::covers`].
    pub fn nearest(&self, velocity_fpm: f64) -> VpEntry {
        let split = self
            .entries
            .partition_point(|e| e.velocity_fpm < velocity_fpm);
        if split == 0 {
            return self.entries[0];
        }
        if split == self.entries.len() {
            return self.entries[self.entries.len() - 1];
        }
        let below = self.entries[split - 1];
        let above = self.entries[split];
        if velocity_fpm - below.velocity_fpm <= above.velocity_fpm - velocity_fpm {
            below
        } else {
            above
        }
    }

    /// Linear interpolation between the bracketing entries (binary
    /// search). Outside the tabulated range the end segment's slope is
    /// extended and `extrapolated` is reported true so the caller can
    /// attach a warning.
    pub fn interpolate(&self, velocity_fpm: f64) -> Interpolation {
        let n = self.entries.len();
        let split = self
            .entries
            .partition_point(|e| e.velocity_fpm < velocity_fpm);
        let (lo, hi, extrapolated) = if split == 0 {
            (self.entries[0], self.entries[1], velocity_fpm < self.entries[0].velocity_fpm)
        } else if split == n {
            (self.entries[n - 2], self.entries[n - 1], velocity_fpm > self.entries[n - 1].velocity_fpm)
        } else {
            (self.entries[split - 1], self.entries[split], false)
        };
        let t = (velocity_fpm - lo.velocity_fpm) / (hi.velocity_fpm - lo.velocity_fpm);
        Interpolation {
            vp_in_wg: lo.vp_in_wg + t * (hi.vp_in_wg - lo.vp_in_wg),
            extrapolated,
        }
    }

    /// Inverse nearest lookup: the entry whose velocity pressure is
    /// closest to the target. This is the exact inverse of [`VpTable::nearest`]'s
    /// grid semantics, so a lookup round trip lands back on the grid.
    pub fn nearest_by_pressure(&self, vp_in_wg: f64) -> VpEntry {
        let split = self.entries.partition_point(|e| e.vp_in_wg < vp_in_wg);
        if split == 0 {
            return self.entries[0];
        }
        if split == self.entries.len() {
            return self.entries[self.entries.len() - 1];
        }
        let below = self.entries[split - 1];
        let above = self.entries[split];
        if vp_in_wg - below.vp_in_wg <= above.vp_in_wg - vp_in_wg {
            below
        } else {
            above
        }
    }
}

/// Result of a table interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation {
    pub vp_in_wg: f64,
    pub extrapolated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_table_shape() {
        let table = VpTable::reference();
        assert_eq!(table.min_velocity_fpm(), 100.0);
        assert_eq!(table.max_velocity_fpm(), 6000.0);
        assert!(table.covers(2000.0));
        assert!(!table.covers(6500.0));
    }

    #[test]
    fn test_nearest_lookup() {
        let table = VpTable::reference();
        // 1234 fpm sits closest to the 1250 entry
        let entry = table.nearest(1234.0);
        assert_eq!(entry.velocity_fpm, 1250.0);
        // Exactly on-grid
        assert_eq!(table.nearest(2000.0).velocity_fpm, 2000.0);
        // Clamped at the ends
        assert_eq!(table.nearest(10.0).velocity_fpm, 100.0);
        assert_eq!(table.nearest(9999.0).velocity_fpm, 6000.0);
    }

    #[test]
    fn test_interpolation_matches_formula() {
        let table = VpTable::reference();
        // Mid-bin interpolation stays within 0.1% of the closed form at
        // design velocities; the chord error of the 50 fpm grid grows
        // toward the bottom of the table
        for v in [1111.0, 2525.0, 4321.0, 5975.0] {
            let exact = (v / 4005.0) * (v / 4005.0);
            let interp = table.interpolate(v);
            assert!(!interp.extrapolated);
            assert!(
                (interp.vp_in_wg - exact).abs() / exact < 0.001,
                "interpolation off at {v} fpm"
            );
        }
        let low = table.interpolate(325.0);
        let exact = (325.0_f64 / 4005.0).powi(2);
        assert!((low.vp_in_wg - exact).abs() / exact < 0.007);
    }

    #[test]
    fn test_extrapolation_is_flagged() {
        let table = VpTable::reference();
        assert!(table.interpolate(50.0).extrapolated);
        assert!(table.interpolate(6400.0).extrapolated);
        assert!(!table.interpolate(100.0).extrapolated);
    }

    #[test]
    fn test_inverse_nearest() {
        let table = VpTable::reference();
        let forward = table.nearest(1234.0);
        let back = table.nearest_by_pressure(forward.vp_in_wg);
        assert_eq!(back.velocity_fpm, forward.velocity_fpm);
    }

    #[test]
    fn test_custom_table_validation() {
        let good = VpTable::from_entries(vec![
            VpEntry { velocity_fpm: 100.0, vp_in_wg: 0.001 },
            VpEntry { velocity_fpm: 200.0, vp_in_wg: 0.004 },
        ]);
        assert!(good.is_ok());

        let short = VpTable::from_entries(vec![VpEntry { velocity_fpm: 100.0, vp_in_wg: 0.001 }]);
        assert!(short.is_err());

        let unsorted = VpTable::from_entries(vec![
            VpEntry { velocity_fpm: 200.0, vp_in_wg: 0.004 },
            VpEntry { velocity_fpm: 100.0, vp_in_wg: 0.001 },
        ]);
        assert!(unsorted.is_err());
    }
}
