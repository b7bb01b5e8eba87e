use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while invoking the LP/MILP solver collaborator.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] quorums_core::Error),

    /// The solver reported infeasible, unbounded, or an unknown status
    /// instead of an optimum. Carries the solver's own status string for
    /// diagnostics.
    #[error("solver failed to find an optimum: {status}")]
    OptimizationFailure { status: String },
}
