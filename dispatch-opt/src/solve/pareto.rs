//! Pareto frontier enumeration over a shared constraint system.
//!
//! Linear frontiers are continuous, so the adapter returns a finite
//! sample: one anchor solve per objective plus an epsilon-constraint
//! sweep between the anchor values, with dominated points pruned. All
//! objectives are expected in maximize convention; the caller normalizes
//! minimize objectives by negation.

use std::time::{Duration, Instant};

use good_lp::{ResolutionError, Solver, SolverModel};

use crate::error::SolveError;
use crate::solve::backend::solve_single;
use crate::solve::{Assignment, ConstraintSystem, LinExpr, LinearConstraint, Relation, SolveStatus};

/// One non-dominated solution with its objective vector.
#[derive(Debug, Clone)]
pub struct FrontierPoint {
    /// Objective values in declaration order (maximize convention).
    pub values: Vec<f64>,
    pub assignment: Assignment,
}

impl FrontierPoint {
    /// True if `self` is at least as good as `other` on every objective
    /// and strictly better on at least one.
    pub fn dominates(&self, other: &FrontierPoint) -> bool {
        let mut strictly_better = false;
        for (&a, &b) in self.values.iter().zip(&other.values) {
            if a < b - tolerance(a, b) {
                return false;
            }
            if a > b + tolerance(a, b) {
                strictly_better = true;
            }
        }
        strictly_better
    }
}

/// Tuning knobs for the frontier enumeration.
#[derive(Debug, Clone)]
pub struct FrontierOptions {
    /// Interior epsilon-constraint samples per secondary objective.
    pub samples: usize,
    /// Wall-clock budget; checked between subproblem solves. On expiry
    /// the incumbent set found so far is returned tagged
    /// [`SolveStatus::TimeLimited`].
    pub time_budget: Option<Duration>,
}

impl Default for FrontierOptions {
    fn default() -> Self {
        Self {
            samples: 7,
            time_budget: None,
        }
    }
}

fn tolerance(a: f64, b: f64) -> f64 {
    1e-5 * (1.0 + a.abs().max(b.abs()))
}

fn same_vector(a: &[f64], b: &[f64]) -> bool {
    a.iter()
        .zip(b)
        .all(|(&x, &y)| (x - y).abs() <= tolerance(x, y))
}

/// Inserts a candidate, dropping it when dominated and pruning any
/// existing points it dominates.
fn insert_nondominated(points: &mut Vec<FrontierPoint>, candidate: FrontierPoint) {
    if points
        .iter()
        .any(|p| p.dominates(&candidate) || same_vector(&p.values, &candidate.values))
    {
        return;
    }
    points.retain(|p| !candidate.dominates(p));
    points.push(candidate);
}

/// Enumerates a Pareto-efficient sample of the frontier.
///
/// The first anchor solve propagates infeasibility; an infeasible
/// epsilon subproblem only means that bound combination is unattainable
/// and is skipped.
pub fn enumerate<S: Solver + Copy>(
    system: &ConstraintSystem,
    objectives: &[LinExpr],
    options: &FrontierOptions,
    solver: S,
) -> Result<(Vec<FrontierPoint>, SolveStatus), SolveError>
where
    S::Model: SolverModel<Error = ResolutionError>,
{
    let start = Instant::now();
    let mut points: Vec<FrontierPoint> = Vec::new();
    let mut status = SolveStatus::Optimal;

    let out_of_time = |elapsed_from: Instant| {
        options
            .time_budget
            .is_some_and(|budget| elapsed_from.elapsed() >= budget)
    };

    // Anchor solves: the optimum of each objective on its own.
    for (j, objective) in objectives.iter().enumerate() {
        if j > 0 && out_of_time(start) {
            status = SolveStatus::TimeLimited;
            break;
        }
        match solve_single(system, objective, &[], solver) {
            Ok(assignment) => {
                let values = objectives.iter().map(|o| o.evaluate(&assignment)).collect();
                insert_nondominated(&mut points, FrontierPoint { values, assignment });
            }
            Err(err) => return Err(err),
        }
    }

    // Epsilon-constraint sweep between the anchor values of each
    // secondary objective, re-optimizing the first objective.
    if status == SolveStatus::Optimal {
        'sweep: for j in 1..objectives.len() {
            let lo = points
                .iter()
                .map(|p| p.values[j])
                .fold(f64::INFINITY, f64::min);
            let hi = points
                .iter()
                .map(|p| p.values[j])
                .fold(f64::NEG_INFINITY, f64::max);
            if !(hi - lo).is_finite() || hi - lo <= tolerance(lo, hi) {
                continue;
            }

            for step in 1..=options.samples {
                if out_of_time(start) {
                    status = SolveStatus::TimeLimited;
                    break 'sweep;
                }
                let epsilon = lo + (hi - lo) * step as f64 / (options.samples + 1) as f64;
                let floor = LinearConstraint {
                    expr: objectives[j].clone(),
                    relation: Relation::Ge,
                    rhs: epsilon,
                };
                match solve_single(system, &objectives[0], &[floor], solver) {
                    Ok(assignment) => {
                        let values =
                            objectives.iter().map(|o| o.evaluate(&assignment)).collect();
                        insert_nondominated(&mut points, FrontierPoint { values, assignment });
                    }
                    Err(SolveError::Infeasible) => continue,
                    Err(err) => return Err(err),
                }
            }
        }
    }

    Ok((points, status))
}

/// Deterministic tie-break over a frontier: lexicographic maximum of the
/// objective vector in declaration order, never backend enumeration
/// order.
pub fn lexicographic_best(points: &[FrontierPoint]) -> Option<&FrontierPoint> {
    points.iter().reduce(|best, candidate| {
        for (&a, &b) in candidate.values.iter().zip(&best.values) {
            if a > b + tolerance(a, b) {
                return candidate;
            }
            if a < b - tolerance(a, b) {
                return best;
            }
        }
        best
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(values: Vec<f64>) -> FrontierPoint {
        FrontierPoint {
            values,
            assignment: Assignment::new(vec![]),
        }
    }

    #[test]
    fn dominance_requires_strict_improvement() {
        let a = point(vec![2.0, 2.0]);
        let b = point(vec![2.0, 1.0]);
        let c = point(vec![1.0, 3.0]);
        assert!(a.dominates(&b));
        assert!(!b.dominates(&a));
        assert!(!a.dominates(&c));
        assert!(!c.dominates(&a));
        assert!(!a.dominates(&a));
    }

    #[test]
    fn insert_prunes_dominated_points() {
        let mut points = vec![point(vec![1.0, 1.0]), point(vec![0.0, 3.0])];
        insert_nondominated(&mut points, point(vec![2.0, 2.0]));
        assert_eq!(points.len(), 2);
        assert!(points.iter().any(|p| p.values == vec![2.0, 2.0]));
        assert!(points.iter().any(|p| p.values == vec![0.0, 3.0]));
    }

    #[test]
    fn duplicate_vectors_are_not_inserted_twice() {
        let mut points = vec![point(vec![1.0, 2.0])];
        insert_nondominated(&mut points, point(vec![1.0, 2.0]));
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn lexicographic_pick_is_deterministic() {
        let points = vec![
            point(vec![1.0, 9.0]),
            point(vec![3.0, 1.0]),
            point(vec![3.0, 2.0]),
        ];
        let best = lexicographic_best(&points).unwrap();
        assert_eq!(best.values, vec![3.0, 2.0]);
        assert!(lexicographic_best(&[]).is_none());
    }
}
