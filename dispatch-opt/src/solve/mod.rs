//! Backend-agnostic constraint system.
//!
//! The formulation core only ever talks to these types; the translation
//! into an actual LP/MILP solver lives in [`backend`]. Keeping the system
//! immutable after construction lets the Pareto enumeration re-solve the
//! same model with varying objectives and extra bounds.

pub mod backend;
pub mod pareto;

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use indexmap::IndexMap;

/// Handle to one decision variable of a [`ConstraintSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Position of the variable in construction order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Optimization direction of a declared objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

/// Whether a returned result is proven optimal or only the best incumbent
/// found before the wall-clock budget expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    TimeLimited,
}

/// Comparison operator of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Le,
    Ge,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Eq => write!(f, "="),
            Relation::Le => write!(f, "<="),
            Relation::Ge => write!(f, ">="),
        }
    }
}

/// A linear combination of variables plus a constant.
///
/// Coefficients are kept in an [`IndexMap`] so iteration order (and with
/// it the emitted model) is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    terms: IndexMap<VarId, f64>,
    constant: f64,
}

impl LinExpr {
    /// An expression consisting of a constant only.
    pub fn constant(value: f64) -> Self {
        Self {
            terms: IndexMap::new(),
            constant: value,
        }
    }

    /// An expression consisting of a single scaled variable.
    pub fn term(var: VarId, coefficient: f64) -> Self {
        let mut expr = Self::default();
        expr.add_term(var, coefficient);
        expr
    }

    /// Adds `coefficient * var`, merging with an existing term.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        *self.terms.entry(var).or_insert(0.0) += coefficient;
    }

    /// Adds a constant offset.
    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// The constant part of the expression.
    pub fn constant_part(&self) -> f64 {
        self.constant
    }

    /// Iterates over `(variable, coefficient)` pairs in insertion order.
    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().map(|(&v, &c)| (v, c))
    }

    /// True if the expression has no variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.values().all(|&c| c == 0.0)
    }

    /// Value of the expression under a resolved assignment.
    pub fn evaluate(&self, assignment: &Assignment) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|(&v, &c)| c * assignment.value(v))
                .sum::<f64>()
    }
}

impl From<VarId> for LinExpr {
    fn from(var: VarId) -> Self {
        LinExpr::term(var, 1.0)
    }
}

impl AddAssign for LinExpr {
    fn add_assign(&mut self, rhs: Self) {
        for (var, coef) in rhs.terms {
            *self.terms.entry(var).or_insert(0.0) += coef;
        }
        self.constant += rhs.constant;
    }
}

impl SubAssign for LinExpr {
    fn sub_assign(&mut self, rhs: Self) {
        for (var, coef) in rhs.terms {
            *self.terms.entry(var).or_insert(0.0) -= coef;
        }
        self.constant -= rhs.constant;
    }
}

impl Add for LinExpr {
    type Output = LinExpr;
    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for LinExpr {
    type Output = LinExpr;
    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl Mul<f64> for LinExpr {
    type Output = LinExpr;
    fn mul(mut self, factor: f64) -> Self {
        for coef in self.terms.values_mut() {
            *coef *= factor;
        }
        self.constant *= factor;
        self
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;
    fn neg(self) -> Self {
        self * -1.0
    }
}

/// One resolved value per variable, in construction order.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.0]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
struct VarSpec {
    name: String,
    min: f64,
    max: f64,
    integer: bool,
}

/// A posted linear constraint: `expr <relation> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub expr: LinExpr,
    pub relation: Relation,
    pub rhs: f64,
}

/// A conjunction of bounded variables and linear constraints.
///
/// Implications ("if A holds then B must hold") are accepted through
/// [`gate_on`](ConstraintSystem::gate_on) /
/// [`gate_off`](ConstraintSystem::gate_off) /
/// [`imply_le`](ConstraintSystem::imply_le) and lowered to big-M rows at
/// post time, so the whole system stays linear/integer and any generic
/// MILP backend can consume it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSystem {
    specs: Vec<VarSpec>,
    constraints: Vec<LinearConstraint>,
}

impl ConstraintSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a bounded continuous variable.
    pub fn variable(&mut self, name: impl Into<String>, min: f64, max: f64) -> VarId {
        self.specs.push(VarSpec {
            name: name.into(),
            min,
            max,
            integer: false,
        });
        VarId(self.specs.len() - 1)
    }

    /// Declares a variable pinned to a fixed value.
    pub fn fixed(&mut self, name: impl Into<String>, value: f64) -> VarId {
        self.variable(name, value, value)
    }

    /// Declares a boolean selector used to gate implications.
    pub fn selector(&mut self, name: impl Into<String>) -> VarId {
        self.specs.push(VarSpec {
            name: name.into(),
            min: 0.0,
            max: 1.0,
            integer: true,
        });
        VarId(self.specs.len() - 1)
    }

    /// Posts `expr <relation> rhs`.
    pub fn post(&mut self, expr: LinExpr, relation: Relation, rhs: f64) {
        self.constraints.push(LinearConstraint {
            expr,
            relation,
            rhs,
        });
    }

    /// Posts `lhs == rhs`.
    pub fn equal(&mut self, lhs: LinExpr, rhs: LinExpr) {
        self.post(lhs - rhs, Relation::Eq, 0.0);
    }

    /// Implication "selector off => var = 0" for a non-negative `var`,
    /// lowered to `var <= cap * selector`.
    pub fn gate_on(&mut self, var: VarId, cap: f64, selector: VarId) {
        let mut expr = LinExpr::from(var);
        expr.add_term(selector, -cap);
        self.post(expr, Relation::Le, 0.0);
    }

    /// Implication "selector on => var = 0" for a non-negative `var`,
    /// lowered to `var <= cap * (1 - selector)`.
    pub fn gate_off(&mut self, var: VarId, cap: f64, selector: VarId) {
        let mut expr = LinExpr::from(var);
        expr.add_term(selector, cap);
        self.post(expr, Relation::Le, cap);
    }

    /// Implication "selector on => expr <= rhs", relaxed by `slack` while
    /// the selector is off: `expr + slack * selector <= rhs + slack`.
    pub fn imply_le(&mut self, selector: VarId, mut expr: LinExpr, rhs: f64, slack: f64) {
        expr.add_term(selector, slack);
        self.post(expr, Relation::Le, rhs + slack);
    }

    pub fn num_variables(&self) -> usize {
        self.specs.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn name(&self, var: VarId) -> &str {
        &self.specs[var.0].name
    }

    pub fn bounds(&self, var: VarId) -> (f64, f64) {
        let spec = &self.specs[var.0];
        (spec.min, spec.max)
    }

    pub(crate) fn var_specs(&self) -> impl Iterator<Item = (f64, f64, bool)> + '_ {
        self.specs.iter().map(|s| (s.min, s.max, s.integer))
    }

    fn render_expr(&self, expr: &LinExpr, out: &mut String) {
        use fmt::Write;
        let mut first = true;
        for (var, coef) in expr.terms() {
            if coef == 0.0 {
                continue;
            }
            if first {
                if coef < 0.0 {
                    out.push('-');
                }
                first = false;
            } else {
                out.push_str(if coef < 0.0 { " - " } else { " + " });
            }
            let magnitude = coef.abs();
            if (magnitude - 1.0).abs() > f64::EPSILON {
                let _ = write!(out, "{magnitude}*");
            }
            out.push_str(self.name(var));
        }
        if expr.constant != 0.0 || first {
            if first {
                let _ = write!(out, "{}", expr.constant);
            } else {
                let _ = write!(
                    out,
                    " {} {}",
                    if expr.constant < 0.0 { "-" } else { "+" },
                    expr.constant.abs()
                );
            }
        }
    }
}

/// Human-readable dump of the whole system, used to echo an infeasible
/// model for diagnosis.
impl fmt::Display for ConstraintSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} variables, {} constraints",
            self.specs.len(),
            self.constraints.len()
        )?;
        for spec in &self.specs {
            writeln!(
                f,
                "  {} in [{}, {}]{}",
                spec.name,
                spec.min,
                spec.max,
                if spec.integer { " (integer)" } else { "" }
            )?;
        }
        for c in &self.constraints {
            let mut line = String::from("  ");
            self.render_expr(&c.expr, &mut line);
            writeln!(f, "{line} {} {}", c.relation, c.rhs)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linexpr_merges_terms_and_evaluates() {
        let mut sys = ConstraintSystem::new();
        let a = sys.variable("a", 0.0, 10.0);
        let b = sys.variable("b", 0.0, 10.0);

        let mut expr = LinExpr::term(a, 2.0);
        expr.add_term(a, 0.5);
        expr += LinExpr::term(b, -1.0);
        expr.add_constant(3.0);

        let assignment = Assignment::new(vec![2.0, 4.0]);
        assert!((expr.evaluate(&assignment) - (2.5 * 2.0 - 4.0 + 3.0)).abs() < 1e-12);
    }

    #[test]
    fn linexpr_arithmetic() {
        let mut sys = ConstraintSystem::new();
        let a = sys.variable("a", 0.0, 1.0);
        let b = sys.variable("b", 0.0, 1.0);

        let expr = (LinExpr::from(a) - LinExpr::from(b)) * 2.0;
        let assignment = Assignment::new(vec![3.0, 1.0]);
        assert_eq!(expr.evaluate(&assignment), 4.0);
        assert_eq!((-expr).evaluate(&assignment), -4.0);
    }

    #[test]
    fn gate_on_lowered_to_big_m_row() {
        let mut sys = ConstraintSystem::new();
        let x = sys.variable("x", 0.0, 500.0);
        let s = sys.selector("s");
        sys.gate_on(x, 500.0, s);

        let row = &sys.constraints()[0];
        assert_eq!(row.relation, Relation::Le);
        assert_eq!(row.rhs, 0.0);
        // selector on: x - 500 <= 0 leaves x free up to its cap
        let on = Assignment::new(vec![500.0, 1.0]);
        assert!(row.expr.evaluate(&on) <= 0.0);
        // selector off: any positive x violates the row
        let off = Assignment::new(vec![1.0, 0.0]);
        assert!(row.expr.evaluate(&off) > 0.0);
    }

    #[test]
    fn dump_names_variables_and_relations() {
        let mut sys = ConstraintSystem::new();
        let p = sys.variable("production_00:00", 0.0, 500.0);
        sys.post(LinExpr::term(p, 2.0), Relation::Le, 1000.0);
        let dump = sys.to_string();
        assert!(dump.contains("production_00:00 in [0, 500]"));
        assert!(dump.contains("2*production_00:00 <= 1000"));
    }
}
