//! Explicit-state enumerators backing `Expression::quorums()`.
//!
//! Both iterators track an index vector by hand rather than materializing
//! every combination up front, per the lazy-enumeration design used
//! throughout this crate: an `And`/`Choose` over wide trees can have an
//! exponential number of quorums, and callers frequently only want the
//! first few (e.g. to probe `is_quorum` against a sample).

use std::collections::HashSet;
use std::hash::Hash;

/// Cartesian product over a fixed set of already-materialized quorum pools,
/// one pool per child. The last pool varies fastest, matching the order
/// Python's `itertools.product` produces.
pub(crate) struct CartesianProduct<T> {
    pools: Vec<Vec<HashSet<T>>>,
    indices: Vec<usize>,
    done: bool,
}

impl<T> CartesianProduct<T> {
    pub(crate) fn new(pools: Vec<Vec<HashSet<T>>>) -> Self {
        let done = pools.is_empty() || pools.iter().any(|p| p.is_empty());
        let indices = vec![0; pools.len()];
        Self { pools, indices, done }
    }
}

impl<T: Clone + Eq + Hash> Iterator for CartesianProduct<T> {
    type Item = HashSet<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut combined = HashSet::new();
        for (pool, &idx) in self.pools.iter().zip(self.indices.iter()) {
            combined.extend(pool[idx].iter().cloned());
        }
        self.advance();
        Some(combined)
    }
}

impl<T> CartesianProduct<T> {
    fn advance(&mut self) {
        for i in (0..self.indices.len()).rev() {
            self.indices[i] += 1;
            if self.indices[i] < self.pools[i].len() {
                return;
            }
            self.indices[i] = 0;
        }
        self.done = true;
    }
}

/// All size-`k` combinations of `0..n` in lexicographic order, using the
/// standard "next combination" successor algorithm.
pub(crate) struct Combinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub(crate) fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            indices: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.k == 0 {
            self.done = true;
            return Some(Vec::new());
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        let mut i = self.k;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.indices[i] != i + self.n - self.k {
                break;
            }
        }
        self.indices[i] += 1;
        for j in (i + 1)..self.k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinations_of_3_choose_2() {
        let combos: Vec<Vec<usize>> = Combinations::new(3, 2).collect();
        assert_eq!(combos, vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
    }

    #[test]
    fn combinations_k_equals_n() {
        let combos: Vec<Vec<usize>> = Combinations::new(3, 3).collect();
        assert_eq!(combos, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn combinations_k_greater_than_n_is_empty() {
        let combos: Vec<Vec<usize>> = Combinations::new(2, 3).collect();
        assert!(combos.is_empty());
    }

    #[test]
    fn cartesian_product_varies_last_fastest() {
        let a: HashSet<i32> = [1].into_iter().collect();
        let b: HashSet<i32> = [2].into_iter().collect();
        let pools = vec![vec![a.clone(), b.clone()], vec![a, b]];
        let product: Vec<HashSet<i32>> = CartesianProduct::new(pools).collect();
        assert_eq!(product.len(), 4);
    }
}
