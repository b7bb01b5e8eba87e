use crate::error::Error;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A replica, identified by `x`, with independent read and write capacities.
///
/// Two nodes are equal (and hash equal) iff their identities are equal;
/// capacities do not participate in equality. This mirrors a replica set
/// where the same logical node can be looked up by identity regardless of
/// which capacity view produced it.
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub x: T,
    pub read_capacity: f64,
    pub write_capacity: f64,
}

impl<T> Node<T> {
    /// A node with both read and write capacity defaulted to `1.0`.
    pub fn new(x: T) -> Self {
        Self { x, read_capacity: 1.0, write_capacity: 1.0 }
    }

    /// A node whose read and write capacity are both `capacity`.
    pub fn with_capacity(x: T, capacity: f64) -> Self {
        Self { x, read_capacity: capacity, write_capacity: capacity }
    }

    /// A node with independently specified read and write capacity.
    pub fn with_capacities(x: T, read_capacity: f64, write_capacity: f64) -> Self {
        Self { x, read_capacity, write_capacity }
    }

    /// Mirrors the original constructor's three-way optional-argument
    /// contract: supply `capacity`, or both of `read_capacity` and
    /// `write_capacity`, or neither (defaulting both to `1.0`). Supplying
    /// `capacity` alongside either specific capacity is rejected.
    pub fn try_new(
        x: T,
        capacity: Option<f64>,
        read_capacity: Option<f64>,
        write_capacity: Option<f64>,
    ) -> Result<Self, Error> {
        match (capacity, read_capacity, write_capacity) {
            (None, None, None) => Ok(Self::new(x)),
            (Some(c), None, None) => Ok(Self::with_capacity(x, c)),
            (None, Some(r), Some(w)) => Ok(Self::with_capacities(x, r, w)),
            _ => Err(Error::ConflictingCapacity),
        }
    }
}

impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
    }
}

impl<T: Eq> Eq for Node<T> {}

impl<T: Hash> Hash for Node<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_capacity() {
        let a = Node::with_capacity("a", 1.0);
        let b = Node::with_capacities("a", 5.0, 9.0);
        assert_eq!(a, b);
    }

    #[test]
    fn default_capacities_are_one() {
        let n = Node::new("a");
        assert_eq!(n.read_capacity, 1.0);
        assert_eq!(n.write_capacity, 1.0);
    }

    #[test]
    fn try_new_rejects_mixed_capacity_arguments() {
        assert_eq!(
            Node::try_new("a", Some(1.0), Some(2.0), None).unwrap_err(),
            Error::ConflictingCapacity
        );
        assert!(Node::try_new("a", None, None, None).is_ok());
        assert!(Node::try_new("a", Some(2.0), None, None).is_ok());
        assert!(Node::try_new("a", None, Some(1.0), Some(2.0)).is_ok());
    }
}
