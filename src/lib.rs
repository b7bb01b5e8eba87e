//! Quorums - read/write quorum systems: construction, resilience, and
//! load-optimal strategies.
//!
//! A quorum system is built from a symbolic [`Expression`] over [`Node`]s
//! denoting the read quorums (and, dually or explicitly, the write
//! quorums). [`QuorumSystem`] answers three questions about it: which sets
//! are quorums, how many node failures it tolerates (`resilience`), and —
//! given a workload's read/write mix — what randomized [`Strategy`]
//! minimizes the worst-case load on any single node.
//!
//! This crate does not schedule RPCs, maintain replica state, or persist
//! anything; it is a pure computation over the expression tree and an
//! external LP/MILP solver. See `quorums-core` for the expression algebra
//! and `quorums-optimize` for the solver-backed pieces.
//!
//! ## A known asymmetry
//!
//! `Strategy::load` optimizes for, and is evaluated at, the mean read
//! fraction of a distribution. For a spread-out (non-point-mass)
//! distribution, `load(dist)` (the expected worst-case node load) and
//! `max_node sum_f d(f) * node_load(node, f)` (the worst-case expected node
//! load) are different quantities — the optimizer only targets the former,
//! at the mean. This is preserved deliberately, not silently patched; see
//! `strategy::Strategy` for where it matters.

pub mod error;
pub mod system;

pub use error::{Error, Result};
pub use system::QuorumSystem;

pub use quorums_core::{and, canonicalize_rw, choose, majority, or, Distribution, Expression, Node};
pub use quorums_optimize::{SolverConfig, Strategy};

/// Re-export of the commonly used types, for `use quorums::prelude::*;`.
pub mod prelude {
    pub use crate::{Distribution, Expression, Node, QuorumSystem, SolverConfig, Strategy};
    pub use quorums_core::{and, choose, majority, or};
}
