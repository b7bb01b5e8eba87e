use quorums_core::{canonicalize_rw, Distribution, Node};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution as _;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A frozen probability distribution over read quorums and over write
/// quorums, produced by [`crate::load_lp::load_optimal_strategy`]. Owns its
/// node set and quorum lists independently of the `QuorumSystem` it was
/// computed from (snapshot semantics — see the crate's concurrency notes).
#[derive(Debug, Clone)]
pub struct Strategy<T> {
    nodes: HashSet<Node<T>>,
    read_capacity: HashMap<T, f64>,
    write_capacity: HashMap<T, f64>,
    reads: Vec<HashSet<T>>,
    read_weights: Vec<f64>,
    writes: Vec<HashSet<T>>,
    write_weights: Vec<f64>,
    unweighted_read_load: HashMap<T, f64>,
    unweighted_write_load: HashMap<T, f64>,
}

impl<T: Eq + Hash + Clone> Strategy<T> {
    pub(crate) fn new(
        nodes: HashSet<Node<T>>,
        reads: Vec<HashSet<T>>,
        read_weights: Vec<f64>,
        writes: Vec<HashSet<T>>,
        write_weights: Vec<f64>,
    ) -> Self {
        let read_capacity = nodes.iter().map(|n| (n.x.clone(), n.read_capacity)).collect();
        let write_capacity = nodes.iter().map(|n| (n.x.clone(), n.write_capacity)).collect();

        let mut unweighted_read_load: HashMap<T, f64> = HashMap::new();
        for (quorum, &weight) in reads.iter().zip(read_weights.iter()) {
            for x in quorum {
                *unweighted_read_load.entry(x.clone()).or_insert(0.0) += weight;
            }
        }
        let mut unweighted_write_load: HashMap<T, f64> = HashMap::new();
        for (quorum, &weight) in writes.iter().zip(write_weights.iter()) {
            for x in quorum {
                *unweighted_write_load.entry(x.clone()).or_insert(0.0) += weight;
            }
        }

        Self {
            nodes,
            read_capacity,
            write_capacity,
            reads,
            read_weights,
            writes,
            write_weights,
            unweighted_read_load,
            unweighted_write_load,
        }
    }

    /// Node load at a fixed read fraction `fr`, omitting terms for sides a
    /// node isn't covered on.
    fn node_load_at(&self, x: &T, fr: f64) -> f64 {
        let read_term = self
            .unweighted_read_load
            .get(x)
            .map(|load| fr * load / self.read_capacity[x])
            .unwrap_or(0.0);
        let write_term = self
            .unweighted_write_load
            .get(x)
            .map(|load| (1.0 - fr) * load / self.write_capacity[x])
            .unwrap_or(0.0);
        read_term + write_term
    }

    fn load_at(&self, fr: f64) -> f64 {
        self.nodes
            .iter()
            .map(|n| self.node_load_at(&n.x, fr))
            .fold(f64::MIN, f64::max)
    }

    /// `sum_f d(f) * max_x node_load(x, f)`: the expected worst-case
    /// per-node load, distinct from `max_x sum_f d(f) * node_load(x, f)`
    /// (see the crate-level docs on this asymmetry).
    pub fn load(
        &self,
        read_fraction: Option<Distribution>,
        write_fraction: Option<Distribution>,
    ) -> quorums_core::Result<f64> {
        let d = canonicalize_rw(read_fraction, write_fraction)?;
        Ok(d.points().iter().map(|&(f, p)| p * self.load_at(f)).sum())
    }

    /// `1 / load(dist)`: expected total throughput in node-capacity units.
    pub fn capacity(
        &self,
        read_fraction: Option<Distribution>,
        write_fraction: Option<Distribution>,
    ) -> quorums_core::Result<f64> {
        Ok(1.0 / self.load(read_fraction, write_fraction)?)
    }

    /// `fr * sum_i |R_i| r_i + (1 - fr) * sum_j |W_j| w_j`, with `fr` the
    /// distribution's mean read fraction.
    pub fn network_load(
        &self,
        read_fraction: Option<Distribution>,
        write_fraction: Option<Distribution>,
    ) -> quorums_core::Result<f64> {
        let d = canonicalize_rw(read_fraction, write_fraction)?;
        let fr = d.mean();
        let read_network: f64 = self
            .reads
            .iter()
            .zip(&self.read_weights)
            .map(|(q, &w)| q.len() as f64 * w)
            .sum();
        let write_network: f64 = self
            .writes
            .iter()
            .zip(&self.write_weights)
            .map(|(q, &w)| q.len() as f64 * w)
            .sum();
        Ok(fr * read_network + (1.0 - fr) * write_network)
    }

    /// `sum_f d(f) * node_load(node.x, f)`.
    pub fn node_load(
        &self,
        node: &Node<T>,
        read_fraction: Option<Distribution>,
        write_fraction: Option<Distribution>,
    ) -> quorums_core::Result<f64> {
        let d = canonicalize_rw(read_fraction, write_fraction)?;
        Ok(d.points()
            .iter()
            .map(|&(f, p)| p * self.node_load_at(&node.x, f))
            .sum())
    }

    /// Sample a read quorum from the categorical distribution over
    /// `self.reads`. Samples a quorum *index* first, then returns the
    /// corresponding set, avoiding any identity-comparison pitfall that
    /// sampling the sets directly would raise.
    pub fn get_read_quorum(&self) -> HashSet<T> {
        sample(&self.reads, &self.read_weights)
    }

    /// Sample a write quorum, symmetric with [`Strategy::get_read_quorum`].
    pub fn get_write_quorum(&self) -> HashSet<T> {
        sample(&self.writes, &self.write_weights)
    }

    pub fn read_quorums(&self) -> &[HashSet<T>] {
        &self.reads
    }

    pub fn write_quorums(&self) -> &[HashSet<T>] {
        &self.writes
    }

    pub fn read_weights(&self) -> &[f64] {
        &self.read_weights
    }

    pub fn write_weights(&self) -> &[f64] {
        &self.write_weights
    }

    pub fn nodes(&self) -> &HashSet<Node<T>> {
        &self.nodes
    }
}

/// Sample an index from `weights` with `rand::thread_rng()` and return the
/// quorum at that index. A new generator per call keeps `Strategy` free of
/// interior mutability while remaining safe to call from any thread.
fn sample<T: Clone>(quorums: &[HashSet<T>], weights: &[f64]) -> HashSet<T> {
    let dist = WeightedIndex::new(weights).expect(
        "Strategy weights are validated non-negative and summing to 1 at construction",
    );
    let idx = dist.sample(&mut rand::thread_rng());
    quorums[idx].clone()
}
