use std::time::Duration;

use dispatch_model::ScenarioSpec;
use good_lp::{ResolutionError, Solver, SolverModel};

use crate::error::{ModelError, SolveError};
use crate::model::grid::GridModel;
use crate::model::period::{Period, period_label};
use crate::model::storage::StorageModel;
use crate::solve::pareto::{self, FrontierOptions, FrontierPoint};
use crate::solve::{Assignment, ConstraintSystem, Direction, LinExpr, SolveStatus, backend};

/// A declared linear objective.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub name: String,
    pub expr: LinExpr,
    pub direction: Direction,
}

/// Tuning of the solve phase.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Interior epsilon samples per secondary objective when enumerating
    /// a Pareto frontier.
    pub frontier_samples: usize,
    /// Wall-clock budget. The backend is synchronous, so the budget is
    /// enforced between subproblem solves; on expiry the best incumbent
    /// set is returned tagged [`SolveStatus::TimeLimited`].
    pub time_budget: Option<Duration>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            frontier_samples: 7,
            time_budget: None,
        }
    }
}

/// Result of a solve call.
///
/// For a multi-objective request `frontier` holds the enumerated
/// non-dominated points (objective values in declared direction) and the
/// top-level assignment is the lexicographic best of them.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub assignment: Assignment,
    /// Value of each declared objective under `assignment`, in
    /// declaration order and declared direction.
    pub objective_values: Vec<f64>,
    pub frontier: Vec<FrontierPoint>,
    pub status: SolveStatus,
}

/// A fully constrained planning horizon, ready to solve.
///
/// Built once from a [`ScenarioSpec`]; read-only afterwards. Several
/// independent horizons can coexist in one process.
#[derive(Debug, PartialEq)]
pub struct Horizon {
    pub periods: Vec<Period>,
    pub system: ConstraintSystem,
    spec: ScenarioSpec,
    objectives: Vec<Objective>,
    total_production_wh: LinExpr,
    buy_cost: Option<LinExpr>,
    sell_revenue: Option<LinExpr>,
}

pub struct HorizonBuilder;

impl HorizonBuilder {
    /// Builds the ordered period sequence and posts all constraints.
    ///
    /// Periods are wired strictly in increasing index order because each
    /// period's energy recurrence references the previous period's
    /// energy variable. Profile length mismatches abort here, before any
    /// solve call; contradictory bounds are left to the backend and
    /// surface as [`SolveError::Infeasible`].
    pub fn build(spec: &ScenarioSpec) -> Result<Horizon, ModelError> {
        let n = spec.horizon.periods;
        if n == 0 {
            return Err(ModelError::EmptyHorizon);
        }
        if spec.horizon.period_minutes == 0 {
            return Err(ModelError::ZeroPeriodLength);
        }
        check_profile("production_cap_w", &spec.production_cap_w, n)?;
        check_profile("consumption_w", &spec.consumption_w, n)?;
        if let Some(tariff) = &spec.tariff {
            check_profile("buy_cost_per_kwh", &tariff.buy_cost_per_kwh, n)?;
            check_profile("sell_price_per_kwh", &tariff.sell_price_per_kwh, n)?;
        }

        let hours = spec.horizon.hours_per_period();
        let mut system = ConstraintSystem::new();
        let mut periods: Vec<Period> = Vec::with_capacity(n);
        let mut total_production_wh = LinExpr::default();
        let mut buy_cost = spec.tariff.as_ref().map(|_| LinExpr::default());
        let mut sell_revenue = spec.tariff.as_ref().map(|_| LinExpr::default());

        for index in 0..n {
            let label = period_label(index, n, spec.horizon.period_minutes);

            let production = system.variable(
                format!("production_{label}"),
                0.0,
                spec.production_cap_w[index],
            );
            let consumption =
                system.fixed(format!("consumption_{label}"), spec.consumption_w[index]);

            let storage = StorageModel::build(&mut system, &spec.storage, &label);
            let grid = GridModel::build(&mut system, &spec.grid, &label);

            // Import-positive grid definition:
            // net = consumption + charge - production - discharge
            let bus = LinExpr::from(production)
                + storage.discharge.bus_term()
                + storage.charge.bus_term()
                - LinExpr::from(consumption);
            system.equal(LinExpr::from(grid.net), -bus);

            // Energy recurrence, chained to the previous period. Positive
            // storage net power (discharging) drains the state.
            let previous = match periods.last() {
                None => LinExpr::constant(spec.storage.initial_energy_wh),
                Some(prev) => LinExpr::from(prev.storage.energy),
            };
            system.equal(
                LinExpr::from(storage.energy),
                previous + storage.energy_step(&spec.storage, hours),
            );

            // Optionally keep storage power away from the grid:
            // discharging implies discharge + production <= consumption,
            // capping discharge at the residual demand. While the
            // selector is off the charge leg keeps net power <= 0, so a
            // single implication covers the constraint.
            if spec.storage.forbid_export {
                system.imply_le(
                    storage.discharge_selector(),
                    LinExpr::from(storage.discharge.power) + LinExpr::from(production),
                    spec.consumption_w[index],
                    spec.storage.max_discharge_w + spec.production_cap_w[index],
                );
            }

            total_production_wh.add_term(production, hours);
            if let Some(tariff) = &spec.tariff {
                if let Some(cost) = buy_cost.as_mut() {
                    cost.add_term(grid.buy.power, hours / 1000.0 * tariff.buy_cost_per_kwh[index]);
                }
                if let Some(revenue) = sell_revenue.as_mut() {
                    revenue.add_term(
                        grid.sell.power,
                        hours / 1000.0 * tariff.sell_price_per_kwh[index],
                    );
                }
            }

            periods.push(Period {
                index,
                label,
                production,
                consumption,
                storage,
                grid,
            });
        }

        Ok(Horizon {
            periods,
            system,
            spec: spec.clone(),
            objectives: Vec::new(),
            total_production_wh,
            buy_cost,
            sell_revenue,
        })
    }
}

impl Horizon {
    /// Declares an objective; repeatable. Two or more objectives turn the
    /// solve into a Pareto frontier enumeration.
    pub fn define_objective(
        &mut self,
        name: impl Into<String>,
        expr: LinExpr,
        direction: Direction,
    ) {
        self.objectives.push(Objective {
            name: name.into(),
            expr,
            direction,
        });
    }

    /// Total harvested production over the horizon in Wh.
    pub fn total_production(&self) -> LinExpr {
        self.total_production_wh.clone()
    }

    /// Net tariff revenue (sold minus bought) over the horizon, present
    /// when the scenario carries a tariff.
    pub fn net_revenue(&self) -> Option<LinExpr> {
        match (&self.sell_revenue, &self.buy_cost) {
            (Some(revenue), Some(cost)) => Some(revenue.clone() - cost.clone()),
            _ => None,
        }
    }

    pub fn scenario(&self) -> &ScenarioSpec {
        &self.spec
    }

    pub fn hours_per_period(&self) -> f64 {
        self.spec.horizon.hours_per_period()
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Hands the assembled model to the backend.
    ///
    /// Zero objectives solve for plain feasibility, one objective for its
    /// optimum. With several objectives the frontier is enumerated and
    /// the lexicographic best point (objective vector in declaration
    /// order) is selected, so the choice is deterministic across
    /// backends. An empty frontier maps to [`SolveError::NoSolution`].
    pub fn solve<S: Solver + Copy>(
        &self,
        solver: S,
        options: &SolveOptions,
    ) -> Result<DispatchOutcome, SolveError>
    where
        S::Model: SolverModel<Error = ResolutionError>,
    {
        let normalized: Vec<LinExpr> = self
            .objectives
            .iter()
            .map(|o| match o.direction {
                Direction::Maximize => o.expr.clone(),
                Direction::Minimize => -o.expr.clone(),
            })
            .collect();

        if normalized.len() < 2 {
            let objective = normalized.first().cloned().unwrap_or_default();
            let assignment = backend::solve_single(&self.system, &objective, &[], solver)?;
            return Ok(self.outcome(assignment, Vec::new(), SolveStatus::Optimal));
        }

        let frontier_options = FrontierOptions {
            samples: options.frontier_samples,
            time_budget: options.time_budget,
        };
        let (points, status) =
            pareto::enumerate(&self.system, &normalized, &frontier_options, solver)?;
        let best = pareto::lexicographic_best(&points).ok_or(SolveError::NoSolution)?;
        let assignment = best.assignment.clone();

        // report frontier values in the declared direction
        let frontier = points
            .iter()
            .map(|point| FrontierPoint {
                values: self
                    .objectives
                    .iter()
                    .zip(&point.values)
                    .map(|(o, &v)| match o.direction {
                        Direction::Maximize => v,
                        Direction::Minimize => -v,
                    })
                    .collect(),
                assignment: point.assignment.clone(),
            })
            .collect();
        Ok(self.outcome(assignment, frontier, status))
    }

    fn outcome(
        &self,
        assignment: Assignment,
        frontier: Vec<FrontierPoint>,
        status: SolveStatus,
    ) -> DispatchOutcome {
        let objective_values = self
            .objectives
            .iter()
            .map(|o| o.expr.evaluate(&assignment))
            .collect();
        DispatchOutcome {
            assignment,
            objective_values,
            frontier,
            status,
        }
    }
}

fn check_profile(name: &'static str, profile: &[f64], expected: usize) -> Result<(), ModelError> {
    if profile.len() != expected {
        return Err(ModelError::ProfileLength {
            name,
            expected,
            got: profile.len(),
        });
    }
    Ok(())
}
