use thiserror::Error;

/// Configuration problems detected while building a horizon, before any
/// solve call.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("profile `{name}` has {got} entries, expected {expected}")]
    ProfileLength {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("horizon must contain at least one period")]
    EmptyHorizon,
    #[error("period length must be at least one minute")]
    ZeroPeriodLength,
}

/// Solve-time failures, returned as values and never panicked.
///
/// Contradictory bounds are deliberately not pre-validated; they surface
/// here as [`SolveError::Infeasible`]. A time-limited result is not an
/// error, it is tagged on the outcome instead.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("model is infeasible: no assignment satisfies all constraints")]
    Infeasible,
    #[error("the Pareto frontier is empty")]
    NoSolution,
    #[error("solver backend unavailable: {0}")]
    BackendUnavailable(String),
}
