use dispatch_model::energy::StorageSpec;

use crate::model::flow::Flow;
use crate::solve::{ConstraintSystem, LinExpr, VarId};

/// Per-period variables of the energy storage system.
///
/// Net power is discharge minus charge, so positive net power drains the
/// energy state. Charging and discharging are mutually exclusive: the
/// implication pair "discharge > 0 => charge = 0" and "charge > 0 =>
/// discharge = 0" is lowered onto a single boolean selector gating both
/// legs, keeping the model linear.
#[derive(Debug, PartialEq)]
pub struct StorageModel {
    /// Charging leg, drawing from the bus.
    pub charge: Flow,
    /// Discharging leg, injecting into the bus.
    pub discharge: Flow,
    /// Bounded energy state at the end of the period in Wh.
    pub energy: VarId,
    discharging: VarId,
}

impl StorageModel {
    pub fn build(system: &mut ConstraintSystem, spec: &StorageSpec, label: &str) -> Self {
        let charge = system.variable(format!("charge_{label}"), 0.0, spec.max_charge_w);
        let discharge = system.variable(format!("discharge_{label}"), 0.0, spec.max_discharge_w);
        let energy = system.variable(
            format!("soc_{label}"),
            spec.min_energy_wh,
            spec.max_energy_wh,
        );

        let discharging = system.selector(format!("discharging_{label}"));
        system.gate_on(discharge, spec.max_discharge_w, discharging);
        system.gate_off(charge, spec.max_charge_w, discharging);

        Self {
            charge: Flow::sink(charge),
            discharge: Flow::source(discharge),
            energy,
            discharging,
        }
    }

    /// Signed net power, discharge-positive.
    pub fn net_power(&self) -> LinExpr {
        self.discharge.bus_term() + self.charge.bus_term()
    }

    /// Energy gained by the state over one period of `hours` length.
    ///
    /// The optional efficiency scales the legs asymmetrically: a 90 %
    /// efficient storage stores 0.9 Wh per Wh charged and drains 1.1 Wh
    /// per Wh discharged. Without efficiency this reduces to
    /// `-net_power * hours`.
    pub fn energy_step(&self, spec: &StorageSpec, hours: f64) -> LinExpr {
        LinExpr::term(self.charge.power, spec.charge_factor() * hours)
            - LinExpr::term(self.discharge.power, spec.discharge_factor() * hours)
    }

    /// Selector that is forced to 1 whenever the storage discharges.
    pub fn discharge_selector(&self) -> VarId {
        self.discharging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve::Assignment;

    fn spec() -> StorageSpec {
        StorageSpec {
            min_energy_wh: 0.0,
            max_energy_wh: 12000.0,
            initial_energy_wh: 6000.0,
            max_charge_w: 9000.0,
            max_discharge_w: 9000.0,
            efficiency_pct: None,
            forbid_export: false,
        }
    }

    #[test]
    fn net_power_is_discharge_minus_charge() {
        let mut sys = ConstraintSystem::new();
        let storage = StorageModel::build(&mut sys, &spec(), "00:00");
        // charge, discharge, soc, selector
        let assignment = Assignment::new(vec![100.0, 400.0, 0.0, 1.0]);
        assert_eq!(storage.net_power().evaluate(&assignment), 300.0);
    }

    #[test]
    fn energy_step_without_efficiency_mirrors_net_power() {
        let mut sys = ConstraintSystem::new();
        let spec = spec();
        let storage = StorageModel::build(&mut sys, &spec, "00:00");
        let assignment = Assignment::new(vec![100.0, 400.0, 0.0, 1.0]);
        let step = storage.energy_step(&spec, 0.5).evaluate(&assignment);
        let net = storage.net_power().evaluate(&assignment);
        assert!((step - (-net * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn efficiency_scales_legs_asymmetrically() {
        let mut sys = ConstraintSystem::new();
        let spec = StorageSpec {
            efficiency_pct: Some(90.0),
            ..spec()
        };
        let storage = StorageModel::build(&mut sys, &spec, "00:00");

        let charging = Assignment::new(vec![1000.0, 0.0, 0.0, 0.0]);
        assert!((storage.energy_step(&spec, 1.0).evaluate(&charging) - 900.0).abs() < 1e-9);

        let discharging = Assignment::new(vec![0.0, 1000.0, 0.0, 1.0]);
        assert!((storage.energy_step(&spec, 1.0).evaluate(&discharging) + 1100.0).abs() < 1e-9);
    }
}
