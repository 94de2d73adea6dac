use std::fmt::Write as _;

use serde::Serialize;

use crate::model::horizon::Horizon;
use crate::solve::Assignment;

/// Resolved values of one period, keyed by its label.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodDispatch {
    pub label: String,
    pub production_w: f64,
    pub consumption_w: f64,
    pub charge_w: f64,
    pub discharge_w: f64,
    pub storage_net_w: f64,
    pub energy_wh: f64,
    pub grid_net_w: f64,
    pub buy_w: f64,
    pub sell_w: f64,
}

/// Aggregates over the whole horizon.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HorizonTotals {
    pub production_wh: f64,
    pub bought_wh: f64,
    pub sold_wh: f64,
    pub buy_cost: f64,
    pub sell_revenue: f64,
    pub net_revenue: f64,
}

/// Read-only snapshot of a solved horizon, for reporting and plotting.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSchedule {
    pub periods: Vec<PeriodDispatch>,
    pub totals: HorizonTotals,
}

impl DispatchSchedule {
    /// Extracts resolved values from a solve result. The horizon itself
    /// stays untouched; repeated extractions from different assignments
    /// (e.g. several frontier points) are independent.
    pub fn extract(horizon: &Horizon, assignment: &Assignment) -> Self {
        let hours = horizon.hours_per_period();
        let tariff = horizon.scenario().tariff.as_ref();

        let mut totals = HorizonTotals::default();
        let mut periods = Vec::with_capacity(horizon.periods.len());

        for period in &horizon.periods {
            let production_w = assignment.value(period.production);
            let charge_w = assignment.value(period.storage.charge.power);
            let discharge_w = assignment.value(period.storage.discharge.power);
            let buy_w = assignment.value(period.grid.buy.power);
            let sell_w = assignment.value(period.grid.sell.power);

            totals.production_wh += production_w * hours;
            totals.bought_wh += buy_w * hours;
            totals.sold_wh += sell_w * hours;
            if let Some(tariff) = tariff {
                totals.buy_cost += buy_w * hours / 1000.0 * tariff.buy_cost_per_kwh[period.index];
                totals.sell_revenue +=
                    sell_w * hours / 1000.0 * tariff.sell_price_per_kwh[period.index];
            }

            periods.push(PeriodDispatch {
                label: period.label.clone(),
                production_w,
                consumption_w: assignment.value(period.consumption),
                charge_w,
                discharge_w,
                storage_net_w: discharge_w - charge_w,
                energy_wh: assignment.value(period.storage.energy),
                grid_net_w: assignment.value(period.grid.net),
                buy_w,
                sell_w,
            });
        }

        totals.net_revenue = totals.sell_revenue - totals.buy_cost;
        Self { periods, totals }
    }

    /// Renders the schedule as an aligned text table.
    pub fn to_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<9} {:>10} {:>10} {:>9} {:>10} {:>9} {:>10} {:>9} {:>9} {:>9}",
            "period", "prod[W]", "cons[W]", "chg[W]", "dis[W]", "ess[W]", "soc[Wh]", "grid[W]",
            "buy[W]", "sell[W]",
        );
        for p in &self.periods {
            let _ = writeln!(
                out,
                "{:<9} {:>10.1} {:>10.1} {:>9.1} {:>10.1} {:>9.1} {:>10.1} {:>9.1} {:>9.1} {:>9.1}",
                p.label,
                p.production_w,
                p.consumption_w,
                p.charge_w,
                p.discharge_w,
                p.storage_net_w,
                p.energy_wh,
                p.grid_net_w,
                p.buy_w,
                p.sell_w,
            );
        }
        let _ = writeln!(
            out,
            "total production: {:.1} Wh, bought: {:.1} Wh, sold: {:.1} Wh",
            self.totals.production_wh, self.totals.bought_wh, self.totals.sold_wh,
        );
        let _ = writeln!(
            out,
            "buy cost: {:.2}, sell revenue: {:.2}, net revenue: {:.2}",
            self.totals.buy_cost, self.totals.sell_revenue, self.totals.net_revenue,
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::horizon::{HorizonBuilder, SolveOptions};
    use crate::solve::Direction;
    use dispatch_model::energy::{GridSpec, StorageSpec, TariffSchedule};
    use dispatch_model::scenario::{HorizonSpec, ScenarioSpec};

    #[test]
    fn extract_reports_resolved_values_and_totals() {
        let spec = ScenarioSpec {
            horizon: HorizonSpec {
                periods: 2,
                period_minutes: 60,
            },
            production_cap_w: vec![0.0, 0.0],
            consumption_w: vec![100.0, 300.0],
            storage: StorageSpec::disabled(),
            grid: GridSpec {
                max_buy_w: 1000.0,
                max_sell_w: 0.0,
            },
            tariff: Some(TariffSchedule::flat(2, 0.50, 0.10)),
        };
        let mut horizon = HorizonBuilder::build(&spec).unwrap();
        let revenue = horizon.net_revenue().unwrap();
        horizon.define_objective("net_revenue", revenue, Direction::Maximize);
        let outcome = horizon
            .solve(good_lp::highs, &SolveOptions::default())
            .unwrap();

        let schedule = DispatchSchedule::extract(&horizon, &outcome.assignment);
        assert_eq!(schedule.periods.len(), 2);
        assert_eq!(schedule.periods[0].label, "00:00");
        assert!((schedule.periods[0].buy_w - 100.0).abs() < 1e-4);
        assert!((schedule.periods[1].buy_w - 300.0).abs() < 1e-4);
        assert!((schedule.totals.bought_wh - 400.0).abs() < 1e-3);
        // 0.4 kWh at 0.50 per kWh
        assert!((schedule.totals.buy_cost - 0.20).abs() < 1e-6);
        assert!((schedule.totals.net_revenue + 0.20).abs() < 1e-6);
    }

    #[test]
    fn table_lists_every_period_and_the_totals() {
        let schedule = DispatchSchedule {
            periods: vec![PeriodDispatch {
                label: "D1_00:00".into(),
                production_w: 1234.5,
                consumption_w: 700.0,
                charge_w: 0.0,
                discharge_w: 0.0,
                storage_net_w: 0.0,
                energy_wh: 6000.0,
                grid_net_w: -534.5,
                buy_w: 0.0,
                sell_w: 534.5,
            }],
            totals: HorizonTotals {
                production_wh: 1234.5,
                sold_wh: 534.5,
                ..HorizonTotals::default()
            },
        };
        let table = schedule.to_table();
        assert!(table.contains("D1_00:00"));
        assert!(table.contains("1234.5"));
        assert!(table.contains("total production: 1234.5 Wh"));
    }
}
