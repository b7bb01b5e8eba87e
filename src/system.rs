use crate::error::{Error, Result};
use quorums_core::{canonicalize_rw, Distribution, Expression};
use quorums_optimize::{load_optimal_strategy, min_hitting_set, SolverConfig, Strategy};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// A read/write quorum system: a pair of `Expression`s satisfying the
/// intersection invariant (every read quorum intersects every write
/// quorum). Immutable once constructed; `resilience` and `strategy` are
/// computed on demand rather than cached, since they require an external
/// solver call each time.
#[derive(Debug, Clone)]
pub struct QuorumSystem<T> {
    reads: Expression<T>,
    writes: Expression<T>,
}

impl<T: Clone + Eq + Hash + Debug> QuorumSystem<T> {
    /// Construct from reads, writes, or both. Supplying only one side
    /// derives the other via `Expression::dual`. Supplying both validates
    /// the intersection invariant eagerly — this is required for
    /// correctness of every downstream query, so it is not an opt-in step.
    pub fn new(reads: Option<Expression<T>>, writes: Option<Expression<T>>) -> Result<Self> {
        match (reads, writes) {
            (Some(r), Some(w)) => {
                validate_intersection(&r, &w)?;
                Ok(Self { reads: r, writes: w })
            }
            (Some(r), None) => {
                let w = r.clone().dual();
                Ok(Self { reads: r, writes: w })
            }
            (None, Some(w)) => {
                let r = w.clone().dual();
                Ok(Self { reads: r, writes: w })
            }
            (None, None) => Err(Error::NoQuorumsSpecified),
        }
    }

    /// Construct from read quorums alone; writes are the dual.
    pub fn from_reads(reads: Expression<T>) -> Self {
        let writes = reads.clone().dual();
        Self { reads, writes }
    }

    /// Construct from write quorums alone; reads are the dual.
    pub fn from_writes(writes: Expression<T>) -> Self {
        let reads = writes.clone().dual();
        Self { reads, writes }
    }

    pub fn reads(&self) -> &Expression<T> {
        &self.reads
    }

    pub fn writes(&self) -> &Expression<T> {
        &self.writes
    }

    pub fn read_quorums(&self) -> Box<dyn Iterator<Item = HashSet<T>> + '_> {
        self.reads.quorums()
    }

    pub fn write_quorums(&self) -> Box<dyn Iterator<Item = HashSet<T>> + '_> {
        self.writes.quorums()
    }

    pub fn is_read_quorum(&self, xs: &HashSet<T>) -> bool {
        self.reads.is_quorum(xs)
    }

    pub fn is_write_quorum(&self, xs: &HashSet<T>) -> bool {
        self.writes.is_quorum(xs)
    }

    /// `min(read_resilience, write_resilience)`.
    pub fn resilience(&self, config: &SolverConfig) -> Result<i64> {
        Ok(self.read_resilience(config)?.min(self.write_resilience(config)?))
    }

    /// One less than the size of a minimum hitting set over the read
    /// quorums: the number of node failures the read side tolerates before
    /// no read quorum survives.
    pub fn read_resilience(&self, config: &SolverConfig) -> Result<i64> {
        let h = min_hitting_set(self.reads.quorums(), config)?;
        Ok(h as i64 - 1)
    }

    /// Symmetric with [`QuorumSystem::read_resilience`].
    pub fn write_resilience(&self, config: &SolverConfig) -> Result<i64> {
        let h = min_hitting_set(self.writes.quorums(), config)?;
        Ok(h as i64 - 1)
    }

    /// The load-optimal strategy for a workload distribution, accepted as
    /// exactly one of a read-fraction or write-fraction distribution.
    pub fn strategy(
        &self,
        read_fraction: Option<Distribution>,
        write_fraction: Option<Distribution>,
        config: &SolverConfig,
    ) -> Result<Strategy<T>> {
        let dist = canonicalize_rw(read_fraction, write_fraction)?;
        let strategy = load_optimal_strategy(&self.reads, &self.writes, &dist, config)?;
        Ok(strategy)
    }
}

/// Checks every `(read quorum, write quorum)` pair intersects, citing the
/// first violating pair found for diagnostics. O(|R| * |W| * average
/// quorum size), matching the bound the design notes call out.
fn validate_intersection<T: Clone + Eq + Hash + Debug>(
    reads: &Expression<T>,
    writes: &Expression<T>,
) -> Result<()> {
    let write_quorums: Vec<HashSet<T>> = writes.quorums().collect();
    let mut pairs_checked = 0usize;
    for r in reads.quorums() {
        for w in &write_quorums {
            pairs_checked += 1;
            if r.is_disjoint(w) {
                return Err(Error::IntersectionViolation {
                    read_quorum: format!("{r:?}"),
                    write_quorum: format!("{w:?}"),
                });
            }
        }
    }
    tracing::debug!(pairs_checked, "intersection invariant holds");
    Ok(())
}
