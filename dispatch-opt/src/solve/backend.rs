//! Translation of a [`ConstraintSystem`] into a `good_lp` problem.
//!
//! The solve contract is synchronous: submit the model, block until the
//! backend answers, receive one assignment or an infeasibility signal.
//! Every call rebuilds the `good_lp` problem from scratch in variable
//! construction order, so the same immutable system can be solved
//! repeatedly with different objectives and extra constraints.

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, Solver, SolverModel, Variable,
    constraint, variable,
};

use crate::error::SolveError;
use crate::solve::{Assignment, ConstraintSystem, LinExpr, LinearConstraint, Relation};

/// Maximizes `objective` over `system` plus `extra` constraints.
///
/// `extra` rows are not part of the shared system; the Pareto sweep uses
/// them to bound secondary objectives without mutating the model.
pub fn solve_single<S: Solver + Copy>(
    system: &ConstraintSystem,
    objective: &LinExpr,
    extra: &[LinearConstraint],
    solver: S,
) -> Result<Assignment, SolveError>
where
    S::Model: SolverModel<Error = ResolutionError>,
{
    let mut problem = ProblemVariables::new();
    let mut vars: Vec<Variable> = Vec::with_capacity(system.num_variables());
    for (min, max, integer) in system.var_specs() {
        let def = if integer {
            variable().min(min).max(max).integer()
        } else {
            variable().min(min).max(max)
        };
        vars.push(problem.add(def));
    }

    let mut model = problem
        .maximise(to_expression(objective, &vars))
        .using(solver);
    for row in system.constraints().iter().chain(extra) {
        model = model.with(translate(row, &vars));
    }

    match model.solve() {
        Ok(solution) => Ok(Assignment::new(
            vars.iter().map(|&v| solution.value(v)).collect(),
        )),
        Err(ResolutionError::Infeasible) => Err(SolveError::Infeasible),
        Err(other) => Err(SolveError::BackendUnavailable(format!("{other:?}"))),
    }
}

fn translate(row: &LinearConstraint, vars: &[Variable]) -> good_lp::Constraint {
    let lhs = to_expression(&row.expr, vars);
    // constants live on the right-hand side of the emitted row
    let rhs = row.rhs - row.expr.constant_part();
    match row.relation {
        Relation::Eq => constraint!(lhs == rhs),
        Relation::Le => constraint!(lhs <= rhs),
        Relation::Ge => constraint!(lhs >= rhs),
    }
}

fn to_expression(expr: &LinExpr, vars: &[Variable]) -> Expression {
    let mut e = Expression::default();
    for (var, coef) in expr.terms() {
        if coef != 0.0 {
            e += coef * vars[var.index()];
        }
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximizes_bounded_sum() {
        let mut sys = ConstraintSystem::new();
        let x = sys.variable("x", 0.0, 2.0);
        let y = sys.variable("y", 0.0, 3.0);
        sys.post(
            LinExpr::from(x) + LinExpr::from(y),
            Relation::Le,
            4.0,
        );

        let objective = LinExpr::from(x) + LinExpr::from(y);
        let assignment = solve_single(&sys, &objective, &[], good_lp::highs).unwrap();
        assert!((objective.evaluate(&assignment) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn selector_makes_legs_mutually_exclusive() {
        let mut sys = ConstraintSystem::new();
        let x = sys.variable("x", 0.0, 5.0);
        let y = sys.variable("y", 0.0, 5.0);
        let s = sys.selector("s");
        sys.gate_on(x, 5.0, s);
        sys.gate_off(y, 5.0, s);

        let objective = LinExpr::from(x) + LinExpr::from(y);
        let assignment = solve_single(&sys, &objective, &[], good_lp::highs).unwrap();
        // one leg must be zero, so the sum caps at 5
        assert!((objective.evaluate(&assignment) - 5.0).abs() < 1e-6);
        assert!(assignment.value(x) * assignment.value(y) < 1e-6);
    }

    #[test]
    fn contradictory_rows_report_infeasible() {
        let mut sys = ConstraintSystem::new();
        let x = sys.variable("x", 0.0, 1.0);
        sys.post(LinExpr::from(x), Relation::Ge, 2.0);

        let result = solve_single(&sys, &LinExpr::from(x), &[], good_lp::highs);
        assert!(matches!(result, Err(SolveError::Infeasible)));
    }

    #[test]
    fn extra_rows_tighten_without_mutating_the_system() {
        let mut sys = ConstraintSystem::new();
        let x = sys.variable("x", 0.0, 10.0);
        let objective = LinExpr::from(x);

        let cap = LinearConstraint {
            expr: LinExpr::from(x),
            relation: Relation::Le,
            rhs: 4.0,
        };
        let capped = solve_single(&sys, &objective, &[cap], good_lp::highs).unwrap();
        assert!((capped.value(x) - 4.0).abs() < 1e-6);

        let free = solve_single(&sys, &objective, &[], good_lp::highs).unwrap();
        assert!((free.value(x) - 10.0).abs() < 1e-6);
    }
}
