use std::env;

use anyhow::{Context, Result};
use dispatch_model::energy::{GridSpec, StorageSpec, TariffSchedule};
use dispatch_model::scenario::{HorizonSpec, ScenarioSpec};
use dispatch_opt::error::SolveError;
use dispatch_opt::model::horizon::{HorizonBuilder, SolveOptions};
use dispatch_opt::plot::plot_schedule;
use dispatch_opt::report::DispatchSchedule;
use dispatch_opt::solve::{Direction, SolveStatus};

/// PV production 20./21.11.2020, one value per hour [W]
const PRODUCTION_W: [f64; 48] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 105.0, 951.0, 1467.0, 3669.0, 6077.0, 6865.0, 4555.0,
    5432.0, 697.0, 47.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    138.0, 770.0, 1436.0, 3437.0, 5579.0, 6036.0, 5672.0, 4888.0, 1663.0, 106.0, 0.0, 0.0, 0.0,
    0.0, 0.0, 0.0, 0.0,
];

/// Household consumption for the same two days, one value per hour [W]
const CONSUMPTION_W: [f64; 48] = [
    710.0, 1180.0, 1207.0, 1149.0, 1239.0, 1187.0, 1435.0, 3852.0, 2936.0, 2981.0, 3459.0, 3928.0,
    3560.0, 3560.0, 2634.0, 3253.0, 3289.0, 2776.0, 2198.0, 1299.0, 1359.0, 840.0, 1299.0, 233.0,
    442.0, 171.0, 434.0, 192.0, 437.0, 443.0, 663.0, 3012.0, 3685.0, 4498.0, 3010.0, 3743.0,
    5544.0, 3086.0, 2077.0, 2852.0, 3004.0, 2310.0, 1343.0, 1727.0, 750.0, 994.0, 2330.0, 1318.0,
];

fn two_day_scenario() -> ScenarioSpec {
    ScenarioSpec {
        horizon: HorizonSpec {
            periods: 48,
            period_minutes: 60,
        },
        production_cap_w: PRODUCTION_W.to_vec(),
        consumption_w: CONSUMPTION_W.to_vec(),
        storage: StorageSpec {
            min_energy_wh: 0.0,
            max_energy_wh: 12000.0,
            initial_energy_wh: 6000.0,
            max_charge_w: 9000.0,
            max_discharge_w: 9000.0,
            efficiency_pct: Some(90.0),
            forbid_export: true,
        },
        grid: GridSpec {
            max_buy_w: 30000.0,
            // 70 % feed-in rule
            max_sell_w: 2000.0,
        },
        tariff: Some(TariffSchedule::flat(48, 0.30, 0.10)),
    }
}

fn run(pareto: bool) -> Result<()> {
    let spec = two_day_scenario();
    let mut horizon = HorizonBuilder::build(&spec)?;
    let production = horizon.total_production();
    let revenue = horizon.net_revenue().context("scenario has no tariff")?;

    if pareto {
        horizon.define_objective("production", production, Direction::Maximize);
        horizon.define_objective("net_revenue", revenue, Direction::Maximize);
    } else {
        horizon.define_objective("net_revenue", revenue, Direction::Maximize);
    }

    match horizon.solve(good_lp::highs, &SolveOptions::default()) {
        Ok(outcome) => {
            if outcome.status == SolveStatus::TimeLimited {
                println!("Time budget expired, reporting best incumbent.");
            }
            if !outcome.frontier.is_empty() {
                println!("Pareto frontier ({} points):", outcome.frontier.len());
                for point in &outcome.frontier {
                    let rendered: Vec<String> = horizon
                        .objectives()
                        .iter()
                        .zip(&point.values)
                        .map(|(o, v)| format!("{}={:.1}", o.name, v))
                        .collect();
                    println!("  {}", rendered.join(", "));
                }
            }
            for (objective, value) in horizon.objectives().iter().zip(&outcome.objective_values) {
                println!("{}: {:.2}", objective.name, value);
            }

            let schedule = DispatchSchedule::extract(&horizon, &outcome.assignment);
            println!("{}", schedule.to_table());

            std::fs::create_dir_all("results")?;
            if let Err(e) = plot_schedule(&schedule, &spec.production_cap_w, "results/dispatch.png")
            {
                println!("Warning: Failed to create plot: {}", e);
            }
        }
        Err(SolveError::Infeasible) => {
            eprintln!("No feasible schedule. Constructed model:");
            eprintln!("{}", horizon.system);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let pareto = matches!(args.get(1).map(|s| s.as_str()), Some("pareto"));

    if let Err(e) = run(pareto) {
        eprintln!("Error running dispatch optimization: {}", e);
        std::process::exit(1);
    }
}
