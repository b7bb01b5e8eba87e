use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::strategy::Strategy;
use good_lp::{
    coin_cbc, constraint, variable, variables, Expression as LpExpression, Solution, SolverModel,
    Variable,
};
use quorums_core::{Distribution, Expression, Node};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Build and solve the load LP described in the workspace's design notes:
/// minimize the worst-case per-node load at the distribution's mean read
/// fraction, over a valid read strategy and a valid write strategy.
///
/// Returns a `Strategy` snapshotting the node set, the enumerated quorum
/// lists (in the order used by the LP), and the solved weight vectors
/// (negative near-zero artifacts clamped to zero, then renormalized to sum
/// exactly to `1.0`).
pub fn load_optimal_strategy<T: Eq + Hash + Clone>(
    reads: &Expression<T>,
    writes: &Expression<T>,
    dist: &Distribution,
    config: &SolverConfig,
) -> Result<Strategy<T>> {
    let fr = dist.mean();

    let read_quorums: Vec<HashSet<T>> = reads.quorums().collect();
    let write_quorums: Vec<HashSet<T>> = writes.quorums().collect();

    let mut nodes: HashSet<Node<T>> = reads.nodes();
    nodes.extend(writes.nodes());

    let mut vars = variables!();
    let read_vars: Vec<Variable> = read_quorums
        .iter()
        .map(|_| vars.add(variable().min(0.0).max(1.0)))
        .collect();
    let write_vars: Vec<Variable> = write_quorums
        .iter()
        .map(|_| vars.add(variable().min(0.0).max(1.0)))
        .collect();
    let load_bound = vars.add(variable().min(0.0).max(1.0));

    let mut x_to_read_vars: HashMap<T, Vec<Variable>> = HashMap::new();
    for (quorum, &v) in read_quorums.iter().zip(&read_vars) {
        for x in quorum {
            x_to_read_vars.entry(x.clone()).or_default().push(v);
        }
    }
    let mut x_to_write_vars: HashMap<T, Vec<Variable>> = HashMap::new();
    for (quorum, &v) in write_quorums.iter().zip(&write_vars) {
        for x in quorum {
            x_to_write_vars.entry(x.clone()).or_default().push(v);
        }
    }

    tracing::debug!(
        read_quorums = read_quorums.len(),
        write_quorums = write_quorums.len(),
        nodes = nodes.len(),
        mean_read_fraction = fr,
        "submitting load LP"
    );

    let mut model = vars.minimise(load_bound).using(coin_cbc);
    if let Some(secs) = config.time_limit_secs {
        model.set_parameter("sec", &secs.to_string());
    }

    let read_sum = read_vars
        .iter()
        .fold(LpExpression::from(0.0), |acc, &v| acc + v);
    let write_sum = write_vars
        .iter()
        .fold(LpExpression::from(0.0), |acc, &v| acc + v);
    model = model.with(constraint!(read_sum == 1));
    model = model.with(constraint!(write_sum == 1));

    for node in &nodes {
        let mut load_expr = LpExpression::from(0.0);
        if let Some(rvars) = x_to_read_vars.get(&node.x) {
            let sum = rvars.iter().fold(LpExpression::from(0.0), |acc, &v| acc + v);
            load_expr = load_expr + sum * (fr / node.read_capacity);
        }
        if let Some(wvars) = x_to_write_vars.get(&node.x) {
            let sum = wvars.iter().fold(LpExpression::from(0.0), |acc, &v| acc + v);
            load_expr = load_expr + sum * ((1.0 - fr) / node.write_capacity);
        }
        model = model.with(constraint!(load_expr <= load_bound));
    }

    let solution = model.solve().map_err(|e| {
        tracing::warn!(error = %e, "load LP did not solve to optimality");
        Error::OptimizationFailure { status: e.to_string() }
    })?;

    let mut read_weights: Vec<f64> = read_vars.iter().map(|&v| solution.value(v)).collect();
    let mut write_weights: Vec<f64> = write_vars.iter().map(|&v| solution.value(v)).collect();
    clamp_and_renormalize(&mut read_weights);
    clamp_and_renormalize(&mut write_weights);

    Ok(Strategy::new(
        nodes,
        read_quorums,
        read_weights,
        write_quorums,
        write_weights,
    ))
}

/// Clamp solver noise (weights that should be exactly zero but come back as
/// `-1e-12`-ish) to zero, then rescale so the vector sums to exactly `1.0`.
fn clamp_and_renormalize(weights: &mut [f64]) {
    for w in weights.iter_mut() {
        if *w < 0.0 {
            *w = 0.0;
        }
    }
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        for w in weights.iter_mut() {
            *w /= total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorums_core::majority;

    fn leaf(x: &str) -> Expression<String> {
        Expression::leaf(Node::new(x.to_string()))
    }

    #[test]
    fn majority_of_three_strategy_is_uniform() {
        let reads = majority(vec![leaf("a"), leaf("b"), leaf("c")]).unwrap();
        let writes = reads.clone().dual();
        let dist = Distribution::point(0.5).unwrap();
        let strategy =
            load_optimal_strategy(&reads, &writes, &dist, &SolverConfig::default()).unwrap();

        let read_total: f64 = strategy.read_weights().iter().sum();
        let write_total: f64 = strategy.write_weights().iter().sum();
        assert!((read_total - 1.0).abs() < 1e-6);
        assert!((write_total - 1.0).abs() < 1e-6);
        for &w in strategy.read_weights() {
            assert!((w - 1.0 / 3.0).abs() < 1e-3);
        }

        let load = strategy.load(Some(dist), None).unwrap();
        assert!((load - 2.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn two_node_or_at_read_fraction_one_splits_evenly() {
        let reads = quorums_core::or(leaf("a"), leaf("b"));
        let writes = reads.clone().dual();
        let dist = Distribution::point(1.0).unwrap();
        let strategy =
            load_optimal_strategy(&reads, &writes, &dist, &SolverConfig::default()).unwrap();
        let load = strategy.load(Some(dist), None).unwrap();
        assert!((load - 0.5).abs() < 1e-3);
    }

    #[test]
    fn asymmetric_read_capacities_split_two_to_one() {
        // S5: a (read_capacity 2) + b (read_capacity 1), evaluated at f_r = 1.
        let reads = quorums_core::or(
            Expression::leaf(Node::with_capacities("a".to_string(), 2.0, 1.0)),
            Expression::leaf(Node::with_capacities("b".to_string(), 1.0, 1.0)),
        );
        let writes = reads.clone().dual();
        let dist = Distribution::point(1.0).unwrap();
        let strategy =
            load_optimal_strategy(&reads, &writes, &dist, &SolverConfig::default()).unwrap();

        let a = Node::with_capacities("a".to_string(), 2.0, 1.0);
        let b = Node::with_capacities("b".to_string(), 1.0, 1.0);
        let weight_of = |node: &Node<String>| -> f64 {
            strategy
                .read_quorums()
                .iter()
                .zip(strategy.read_weights())
                .filter(|(q, _)| q.contains(&node.x))
                .map(|(_, &w)| w)
                .sum()
        };
        assert!((weight_of(&a) - 2.0 / 3.0).abs() < 1e-3);
        assert!((weight_of(&b) - 1.0 / 3.0).abs() < 1e-3);

        let load = strategy.load(Some(dist), None).unwrap();
        assert!((load - 1.0 / 3.0).abs() < 1e-3);
    }
}

#[cfg(test)]
mod proptests {
    use crate::config::SolverConfig;
    use crate::load_lp::load_optimal_strategy;
    use proptest::prelude::*;
    use quorums_core::{and, majority, or, Distribution, Expression, Node};

    fn leaf(x: u8) -> Expression<u8> {
        Expression::leaf(Node::new(x))
    }

    fn arb_small_system(
        leaves: u8,
    ) -> impl proptest::strategy::Strategy<Value = (Expression<u8>, Expression<u8>)> {
        let picks: Vec<Expression<u8>> = (0..leaves).map(leaf).collect();
        prop_oneof![
            Just(or(picks[0].clone(), picks[1].clone())),
            Just(and(picks[0].clone(), picks[1].clone())),
            Just(majority(picks.clone()).unwrap()),
        ]
        .prop_map(|reads| {
            let writes = reads.clone().dual();
            (reads, writes)
        })
    }

    proptest! {
        // Invariant #5: a solved Strategy's weights are a valid probability
        // vector on each side.
        #[test]
        fn strategy_weights_are_a_valid_distribution(
            (reads, writes) in arb_small_system(3),
            fr in 0.0f64..=1.0,
        ) {
            let dist = Distribution::point(fr).unwrap();
            let strategy =
                load_optimal_strategy(&reads, &writes, &dist, &SolverConfig::default()).unwrap();

            let read_total: f64 = strategy.read_weights().iter().sum();
            let write_total: f64 = strategy.write_weights().iter().sum();
            prop_assert!((read_total - 1.0).abs() < 1e-6);
            prop_assert!((write_total - 1.0).abs() < 1e-6);
            for &w in strategy.read_weights().iter().chain(strategy.write_weights()) {
                prop_assert!((-1e-9..=1.0 + 1e-9).contains(&w));
            }
        }

        // Invariant #6: the LP's objective is a genuine upper bound on
        // every node's load at the fraction it was solved for.
        #[test]
        fn no_node_exceeds_the_solved_load_bound(
            (reads, writes) in arb_small_system(3),
            fr in 0.0f64..=1.0,
        ) {
            let dist = Distribution::point(fr).unwrap();
            let strategy =
                load_optimal_strategy(&reads, &writes, &dist, &SolverConfig::default()).unwrap();
            let bound = strategy.load(Some(dist.clone()), None).unwrap();
            for node in strategy.nodes() {
                let node_load = strategy.node_load(node, Some(dist.clone()), None).unwrap();
                prop_assert!(node_load <= bound + 1e-6);
            }
        }
    }
}
