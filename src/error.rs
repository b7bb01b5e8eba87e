use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The unified, public-facing error type: everything `quorums-core` and
/// `quorums-optimize` can raise, plus the one error only the root crate can
/// detect (it's the only place that sees both sides of a `QuorumSystem` at
/// once).
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] quorums_core::Error),

    #[error(transparent)]
    Optimize(#[from] quorums_optimize::Error),

    #[error("a QuorumSystem must be constructed with read quorums, write quorums, or both")]
    NoQuorumsSpecified,

    #[error(
        "intersection invariant violated: read quorum {read_quorum} does not intersect write quorum {write_quorum}"
    )]
    IntersectionViolation {
        read_quorum: String,
        write_quorum: String,
    },
}
