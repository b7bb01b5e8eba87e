use serde::{Deserialize, Serialize};

/// Tuning knobs for the LP/MILP solver collaborator, mirroring how the
/// replication/consensus configs elsewhere in this style of codebase carry
/// solver/protocol tuning as a plain, `Default`-able struct rather than a
/// builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Wall-clock budget for a single solve, in seconds. `None` means no
    /// limit. Pathological inputs can enumerate an exponential number of
    /// quorums (see `Expression::quorums`), so production callers should
    /// set this.
    pub time_limit_secs: Option<u64>,

    /// Relative MIP gap at which CBC accepts a hitting-set solution as
    /// optimal enough. `0.0` asks for a proven optimum.
    pub relative_gap: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: None,
            relative_gap: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_asks_for_a_proven_optimum() {
        let config = SolverConfig::default();
        assert_eq!(config.relative_gap, 0.0);
        assert!(config.time_limit_secs.is_none());
    }
}
