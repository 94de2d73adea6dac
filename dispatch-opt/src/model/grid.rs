use dispatch_model::energy::GridSpec;

use crate::model::flow::Flow;
use crate::solve::{ConstraintSystem, LinExpr, VarId};

/// Per-period variables of the grid connection.
///
/// Net power is signed and import-positive. The split into non-negative
/// buy/sell legs uses one boolean selector per period: importing forces
/// the sell leg to zero and vice versa, so `buy = net` when `net > 0`
/// and `sell = -net` when `net <= 0`.
#[derive(Debug, PartialEq)]
pub struct GridModel {
    /// Signed exchange with the grid in W, bounded by both caps.
    pub net: VarId,
    /// Power bought from the grid, `0..=max_buy_w`.
    pub buy: Flow,
    /// Power sold to the grid, `0..=max_sell_w` (feed-in limit).
    pub sell: Flow,
    importing: VarId,
}

impl GridModel {
    pub fn build(system: &mut ConstraintSystem, spec: &GridSpec, label: &str) -> Self {
        let net = system.variable(format!("grid_{label}"), -spec.max_sell_w, spec.max_buy_w);
        let buy = system.variable(format!("buy_{label}"), 0.0, spec.max_buy_w);
        let sell = system.variable(format!("sell_{label}"), 0.0, spec.max_sell_w);

        // buy - sell = net in every period; the selector then decides
        // which leg may be non-zero
        system.equal(
            LinExpr::from(buy) - LinExpr::from(sell),
            LinExpr::from(net),
        );

        let importing = system.selector(format!("importing_{label}"));
        system.gate_on(buy, spec.max_buy_w, importing);
        system.gate_off(sell, spec.max_sell_w, importing);

        Self {
            net,
            buy: Flow::source(buy),
            sell: Flow::sink(sell),
            importing,
        }
    }

    /// Selector that is forced to 1 whenever power is imported.
    pub fn import_selector(&self) -> VarId {
        self.importing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve::{Relation, backend::solve_single};

    #[test]
    fn sign_split_never_allows_both_legs() {
        let mut sys = ConstraintSystem::new();
        let grid = GridModel::build(
            &mut sys,
            &GridSpec {
                max_buy_w: 1000.0,
                max_sell_w: 1000.0,
            },
            "00:00",
        );
        // pin the net exchange to an export of 400 W
        sys.post(LinExpr::from(grid.net), Relation::Eq, -400.0);

        let objective = LinExpr::from(grid.buy.power) + LinExpr::from(grid.sell.power);
        let assignment = solve_single(&sys, &objective, &[], good_lp::highs).unwrap();
        assert!(assignment.value(grid.buy.power).abs() < 1e-6);
        assert!((assignment.value(grid.sell.power) - 400.0).abs() < 1e-6);
    }

    #[test]
    fn feed_in_limit_bounds_export() {
        let mut sys = ConstraintSystem::new();
        let grid = GridModel::build(&mut sys, &GridSpec::import_only(1000.0), "00:00");
        let (min, max) = sys.bounds(grid.sell.power);
        assert_eq!((min, max), (0.0, 0.0));
        let (net_min, _) = sys.bounds(grid.net);
        assert_eq!(net_min, 0.0);
    }
}
