use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building expressions, nodes, or workload distributions.
///
/// This is the narrower of the two error enums in the workspace: it covers
/// everything that can go wrong without ever talking to a solver. See
/// `quorums_optimize::Error` for solver-facing failures and the root
/// `quorums::Error` for the unified, public-facing type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Or/And cannot be constructed with an empty list of children")]
    EmptyChildren,

    #[error("choose(k, es) requires 1 <= k <= {len}, got k = {k}")]
    InvalidChooseK { k: usize, len: usize },

    #[error("Node capacity must be given as either `capacity` or both \
             `read_capacity` and `write_capacity`, not a mix of the two")]
    ConflictingCapacity,

    #[error("a distribution cannot be empty")]
    EmptyDistribution,

    #[error("a distribution cannot have negative weight {0}")]
    NegativeWeight(f64),

    #[error("a distribution's weights cannot sum to zero")]
    ZeroTotalWeight,

    #[error("distribution value {0} is outside the range [0, 1]")]
    OutOfRange(f64),

    #[error("exactly one of read_fraction or write_fraction must be supplied")]
    ConflictingFraction,
}
