use serde::{Deserialize, Serialize};

/// Physical limits of an energy storage system (battery)
///
/// Sign convention used everywhere downstream: storage net power is
/// discharge minus charge, so a positive net power drains the energy state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSpec {
    /// Lowest allowed energy state in Wh
    pub min_energy_wh: f64,
    /// Highest allowed energy state in Wh
    pub max_energy_wh: f64,
    /// Energy state at the start of the horizon in Wh
    pub initial_energy_wh: f64,
    /// Maximum charging power in W (non-negative magnitude)
    pub max_charge_w: f64,
    /// Maximum discharging power in W (non-negative magnitude)
    pub max_discharge_w: f64,
    /// Optional round-trip efficiency in percent (0-100]
    ///
    /// When set, the charge leg of the energy recurrence is scaled by
    /// `pct / 100` and the discharge leg by `(200 - pct) / 100`. When
    /// `None`, both legs enter the recurrence unscaled.
    pub efficiency_pct: Option<f64>,
    /// Forbid discharging into the grid: per period, discharge power is
    /// capped at consumption minus production
    pub forbid_export: bool,
}

impl StorageSpec {
    /// A storage that cannot hold or move any energy
    ///
    /// Useful for scenarios without a battery; all storage variables are
    /// pinned to zero.
    pub fn disabled() -> Self {
        Self {
            min_energy_wh: 0.0,
            max_energy_wh: 0.0,
            initial_energy_wh: 0.0,
            max_charge_w: 0.0,
            max_discharge_w: 0.0,
            efficiency_pct: None,
            forbid_export: false,
        }
    }

    /// Charge-leg efficiency factor, `1.0` when no efficiency is configured
    pub fn charge_factor(&self) -> f64 {
        self.efficiency_pct.map_or(1.0, |pct| pct / 100.0)
    }

    /// Discharge-leg factor, `1.0` when no efficiency is configured
    ///
    /// With an efficiency of 90 % every discharged Wh drains the energy
    /// state by 1.1 Wh.
    pub fn discharge_factor(&self) -> f64 {
        self.efficiency_pct.map_or(1.0, |pct| (200.0 - pct) / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_storage_has_zero_bounds() {
        let spec = StorageSpec::disabled();
        assert_eq!(spec.max_energy_wh, 0.0);
        assert_eq!(spec.max_charge_w, 0.0);
        assert_eq!(spec.max_discharge_w, 0.0);
        assert_eq!(spec.charge_factor(), 1.0);
        assert_eq!(spec.discharge_factor(), 1.0);
    }

    #[test]
    fn efficiency_scales_legs_asymmetrically() {
        let spec = StorageSpec {
            efficiency_pct: Some(90.0),
            ..StorageSpec::disabled()
        };
        assert!((spec.charge_factor() - 0.9).abs() < 1e-12);
        assert!((spec.discharge_factor() - 1.1).abs() < 1e-12);
    }
}
