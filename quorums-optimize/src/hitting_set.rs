use crate::config::SolverConfig;
use crate::error::{Error, Result};
use good_lp::{constraint, coin_cbc, variable, variables, Expression as LpExpression, Solution, SolverModel, Variable};
use std::collections::HashMap;
use std::collections::HashSet;
use std::hash::Hash;

/// Minimum hitting set: given a collection of sets over a shared universe,
/// find the smallest subset of the universe that intersects every set.
///
/// Formulated as a 0/1 integer program (one binary variable per element,
/// one `>= 1` constraint per set, objective minimizing the variable sum)
/// and handed to CBC. Returns the size of the optimal hitting set; callers
/// (`QuorumSystem::read_resilience`/`write_resilience`) subtract one to get
/// a failure count.
pub fn min_hitting_set<T: Eq + Hash + Clone>(
    sets: impl Iterator<Item = HashSet<T>>,
    config: &SolverConfig,
) -> Result<usize> {
    let mut vars = variables!();
    let mut x_vars: HashMap<T, Variable> = HashMap::new();
    let mut rows: Vec<LpExpression> = Vec::new();

    for set in sets {
        if set.is_empty() {
            continue;
        }
        let mut row = LpExpression::from(0.0);
        for elem in &set {
            let var = *x_vars
                .entry(elem.clone())
                .or_insert_with(|| vars.add(variable().binary()));
            row += var;
        }
        rows.push(row);
    }

    if x_vars.is_empty() {
        // No non-empty set to hit: the empty set hits everything.
        return Ok(0);
    }

    let objective: LpExpression = x_vars.values().fold(LpExpression::from(0.0), |acc, &v| acc + v);

    tracing::debug!(
        variables = x_vars.len(),
        constraints = rows.len(),
        "submitting minimum hitting set ILP"
    );

    let mut model = vars.minimise(objective).using(coin_cbc);
    if let Some(secs) = config.time_limit_secs {
        model.set_parameter("sec", &secs.to_string());
    }
    if config.relative_gap > 0.0 {
        model.set_parameter("ratioGap", &config.relative_gap.to_string());
    }
    for row in rows {
        model = model.with(constraint!(row >= 1));
    }

    let solution = model.solve().map_err(|e| {
        tracing::warn!(error = %e, "hitting set ILP did not solve to optimality");
        Error::OptimizationFailure { status: e.to_string() }
    })?;

    let total: f64 = x_vars.values().map(|&v| solution.value(v)).sum();
    Ok(total.round() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(xs: &[&str]) -> HashSet<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn hitting_set_of_disjoint_singletons_is_all_of_them() {
        let sets = vec![set(&["a"]), set(&["b"]), set(&["c"])];
        let h = min_hitting_set(sets.into_iter(), &SolverConfig::default()).unwrap();
        assert_eq!(h, 3);
    }

    #[test]
    fn hitting_set_of_one_shared_set_is_one() {
        let sets = vec![set(&["a", "b", "c"])];
        let h = min_hitting_set(sets.into_iter(), &SolverConfig::default()).unwrap();
        assert_eq!(h, 1);
    }

    #[test]
    fn hitting_set_of_majority_of_three_is_two() {
        // Read quorums of majority(a, b, c): {a,b}, {a,c}, {b,c}.
        let sets = vec![set(&["a", "b"]), set(&["a", "c"]), set(&["b", "c"])];
        let h = min_hitting_set(sets.into_iter(), &SolverConfig::default()).unwrap();
        assert_eq!(h, 2);
    }
}
