use crate::enumerate::{CartesianProduct, Combinations};
use crate::error::Error;
use crate::node::Node;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// A quorum expression: a tagged tree over [`Node`]s.
///
/// `Leaf` denotes a single node's quorum; `Or` the union of its children's
/// quorums; `And` every union of one quorum from each child; `Choose(k, _)`
/// every union formed by picking `k` of the children and unioning one
/// quorum from each. Every expression has at least one leaf by
/// construction: `Or`/`And` reject an empty child list, and `Choose`
/// rejects `k` outside `[1, len(children)]` (which implies `len(children)
/// >= 1`).
#[derive(Debug, Clone)]
pub enum Expression<T> {
    Leaf(Node<T>),
    Or(Vec<Expression<T>>),
    And(Vec<Expression<T>>),
    Choose(usize, Vec<Expression<T>>),
}

impl<T> Expression<T> {
    /// Lift a [`Node`] into a `Leaf` expression directly.
    pub fn leaf(node: Node<T>) -> Self {
        Expression::Leaf(node)
    }

    /// Raw `Or` constructor: the union of every child's quorums. Errors if
    /// `es` is empty.
    pub fn or_many(es: Vec<Expression<T>>) -> Result<Self, Error> {
        if es.is_empty() {
            return Err(Error::EmptyChildren);
        }
        Ok(Expression::Or(es))
    }

    /// Raw `And` constructor: every union of one quorum per child. Errors
    /// if `es` is empty.
    pub fn and_many(es: Vec<Expression<T>>) -> Result<Self, Error> {
        if es.is_empty() {
            return Err(Error::EmptyChildren);
        }
        Ok(Expression::And(es))
    }

    /// Raw `Choose` constructor. Errors unless `1 <= k <= es.len()`.
    pub fn choose_many(k: usize, es: Vec<Expression<T>>) -> Result<Self, Error> {
        if k < 1 || k > es.len() {
            return Err(Error::InvalidChooseK { k, len: es.len() });
        }
        Ok(Expression::Choose(k, es))
    }

    /// The structural dual: `Or` <-> `And`, `Choose(k, n)` <-> `Choose(n -
    /// k + 1, n)`, `Leaf` unchanged.
    pub fn dual(self) -> Self {
        match self {
            Expression::Leaf(node) => Expression::Leaf(node),
            Expression::Or(es) => Expression::And(es.into_iter().map(Expression::dual).collect()),
            Expression::And(es) => Expression::Or(es.into_iter().map(Expression::dual).collect()),
            Expression::Choose(k, es) => {
                let n = es.len();
                Expression::Choose(n - k + 1, es.into_iter().map(Expression::dual).collect())
            }
        }
    }
}

impl<T: Eq + Hash> Expression<T> {
    /// The Boolean recursion characterizing quorum-ness, independent of
    /// (and much cheaper than) enumerating `quorums()`.
    pub fn is_quorum(&self, xs: &HashSet<T>) -> bool {
        match self {
            Expression::Leaf(node) => xs.contains(&node.x),
            Expression::Or(es) => es.iter().any(|e| e.is_quorum(xs)),
            Expression::And(es) => es.iter().all(|e| e.is_quorum(xs)),
            Expression::Choose(k, es) => {
                es.iter().filter(|e| e.is_quorum(xs)).count() >= *k
            }
        }
    }
}

impl<T: Clone + Eq + Hash> Expression<T> {
    /// Every node appearing anywhere in the tree, deduplicated by identity.
    pub fn nodes(&self) -> HashSet<Node<T>> {
        match self {
            Expression::Leaf(node) => {
                let mut set = HashSet::new();
                set.insert(node.clone());
                set
            }
            Expression::Or(es) | Expression::And(es) => {
                es.iter().fold(HashSet::new(), |mut acc, e| {
                    acc.extend(e.nodes());
                    acc
                })
            }
            Expression::Choose(_, es) => es.iter().fold(HashSet::new(), |mut acc, e| {
                acc.extend(e.nodes());
                acc
            }),
        }
    }

    /// Lazily enumerate every quorum denoted by this expression. The
    /// returned iterator is single-consumer; materialize it (`.collect()`)
    /// or call `quorums()` again for repeated passes.
    pub fn quorums<'a>(&'a self) -> Box<dyn Iterator<Item = HashSet<T>> + 'a> {
        match self {
            Expression::Leaf(node) => {
                let mut set = HashSet::new();
                set.insert(node.x.clone());
                Box::new(std::iter::once(set))
            }
            Expression::Or(es) => Box::new(es.iter().flat_map(|e| e.quorums())),
            Expression::And(es) => {
                let pools: Vec<Vec<HashSet<T>>> =
                    es.iter().map(|e| e.quorums().collect()).collect();
                Box::new(CartesianProduct::new(pools))
            }
            Expression::Choose(k, es) => {
                let pools: Vec<Vec<HashSet<T>>> =
                    es.iter().map(|e| e.quorums().collect()).collect();
                let k = *k;
                let n = es.len();
                Box::new(Combinations::new(n, k).flat_map(move |combo| {
                    let picked: Vec<Vec<HashSet<T>>> =
                        combo.iter().map(|&i| pools[i].clone()).collect();
                    CartesianProduct::new(picked)
                }))
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Leaf(node) => write!(f, "{node}"),
            Expression::Or(es) => {
                write!(f, "(")?;
                for (i, e) in es.iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
            Expression::And(es) => {
                write!(f, "(")?;
                for (i, e) in es.iter().enumerate() {
                    if i > 0 {
                        write!(f, " * ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
            Expression::Choose(k, es) => {
                write!(f, "choose{k}(")?;
                for (i, e) in es.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl<T> From<Node<T>> for Expression<T> {
    fn from(node: Node<T>) -> Self {
        Expression::Leaf(node)
    }
}

/// Flattening `Or`: if either side is already an `Or`, the other side is
/// appended to its children rather than nesting a new nod.
pub fn or<T>(lhs: Expression<T>, rhs: Expression<T>) -> Expression<T> {
    match (lhs, rhs) {
        (Expression::Or(mut a), Expression::Or(b)) => {
            a.extend(b);
            Expression::Or(a)
        }
        (Expression::Or(mut a), rhs) => {
            a.push(rhs);
            Expression::Or(a)
        }
        (lhs, Expression::Or(mut b)) => {
            b.insert(0, lhs);
            Expression::Or(b)
        }
        (lhs, rhs) => Expression::Or(vec![lhs, rhs]),
    }
}

/// Flattening `And`, symmetric with [`or`].
pub fn and<T>(lhs: Expression<T>, rhs: Expression<T>) -> Expression<T> {
    match (lhs, rhs) {
        (Expression::And(mut a), Expression::And(b)) => {
            a.extend(b);
            Expression::And(a)
        }
        (Expression::And(mut a), rhs) => {
            a.push(rhs);
            Expression::And(a)
        }
        (lhs, Expression::And(mut b)) => {
            b.insert(0, lhs);
            Expression::And(b)
        }
        (lhs, rhs) => Expression::And(vec![lhs, rhs]),
    }
}

/// `choose(k, es)` collapses to `Or(es)` when `k == 1` and to `And(es)`
/// when `k == es.len()`, and is a raw `Choose` otherwise.
pub fn choose<T>(k: usize, es: Vec<Expression<T>>) -> Result<Expression<T>, Error> {
    let n = es.len();
    if k == 1 {
        Expression::or_many(es)
    } else if n != 0 && k == n {
        Expression::and_many(es)
    } else {
        Expression::choose_many(k, es)
    }
}

/// `choose(floor(n / 2) + 1, es)`.
pub fn majority<T>(es: Vec<Expression<T>>) -> Result<Expression<T>, Error> {
    let k = es.len() / 2 + 1;
    choose(k, es)
}

impl<T> std::ops::Add for Expression<T> {
    type Output = Expression<T>;
    fn add(self, rhs: Self) -> Self::Output {
        or(self, rhs)
    }
}

impl<T> std::ops::Mul for Expression<T> {
    type Output = Expression<T>;
    fn mul(self, rhs: Self) -> Self::Output {
        and(self, rhs)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn canonical_quorums(e: &Expression<u8>) -> HashSet<Vec<u8>> {
        e.quorums()
            .map(|q| {
                let mut v: Vec<u8> = q.into_iter().collect();
                v.sort();
                v
            })
            .collect()
    }

    fn arb_expr(leaves: usize, depth: u32) -> impl Strategy<Value = Expression<u8>> {
        let leaf = (0..leaves as u8).prop_map(|x| Expression::leaf(Node::new(x)));
        leaf.prop_recursive(depth, 16, 4, move |inner| {
            prop::collection::vec(inner.clone(), 1..4).prop_flat_map(move |es| {
                let n = es.len();
                prop_oneof![
                    Just(Expression::Or(es.clone())),
                    Just(Expression::And(es.clone())),
                    (1..=n).prop_map(move |k| Expression::Choose(k, es.clone())),
                ]
            })
        })
    }

    proptest! {
        #[test]
        fn dual_involution(e in arb_expr(5, 3)) {
            let original = canonical_quorums(&e);
            let double_dual = canonical_quorums(&e.clone().dual().dual());
            prop_assert_eq!(original, double_dual);
        }

        #[test]
        fn boolean_consistency(e in arb_expr(5, 3), mask in 0u8..32) {
            let xs: HashSet<u8> = (0..5u8).filter(|i| mask & (1 << i) != 0).collect();
            let is_quorum = e.is_quorum(&xs);
            let is_superset_of_some_quorum =
                e.quorums().any(|q| q.iter().all(|x| xs.contains(x)));
            prop_assert_eq!(is_quorum, is_superset_of_some_quorum);
        }

        #[test]
        fn flattening_idempotence(a in arb_expr(3, 1), b in arb_expr(3, 1), c in arb_expr(3, 1)) {
            let left = and(and(a.clone(), b.clone()), c.clone());
            let right = and(a.clone(), and(b.clone(), c.clone()));
            let flat = Expression::and_many(vec![a, b, c]).unwrap();
            prop_assert_eq!(canonical_quorums(&left), canonical_quorums(&right));
            prop_assert_eq!(canonical_quorums(&right), canonical_quorums(&flat));
        }
    }
}
