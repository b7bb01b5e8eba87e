use crate::error::Error;

/// A canonical mapping from read fraction `f in [0, 1]` to positive
/// probability, summing to `1.0`. Internally a sorted `Vec` rather than a
/// `HashMap`, since `f64` has no `Eq`/`Hash` impl and distributions are
/// small (a handful of workload points, not a dense table).
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    points: Vec<(f64, f64)>,
}

impl Distribution {
    /// A point mass at `f`.
    pub fn point(f: f64) -> Result<Self, Error> {
        Self::weighted(vec![(f, 1.0)])
    }

    /// Normalize a set of `(read_fraction, weight)` pairs. Weights must be
    /// non-negative and sum to a positive total; entries with exactly zero
    /// weight are dropped (matching the reference implementation) rather
    /// than rejected. Duplicate `f` values are summed before normalizing.
    pub fn weighted(pairs: Vec<(f64, f64)>) -> Result<Self, Error> {
        if pairs.is_empty() {
            return Err(Error::EmptyDistribution);
        }
        for &(f, weight) in &pairs {
            if weight < 0.0 {
                return Err(Error::NegativeWeight(weight));
            }
            if !(0.0..=1.0).contains(&f) {
                return Err(Error::OutOfRange(f));
            }
        }
        let total: f64 = pairs.iter().map(|&(_, w)| w).sum();
        if total == 0.0 {
            return Err(Error::ZeroTotalWeight);
        }

        let mut merged: Vec<(f64, f64)> = Vec::new();
        for (f, w) in pairs {
            if w == 0.0 {
                continue;
            }
            if let Some(existing) = merged.iter_mut().find(|(ef, _)| *ef == f) {
                existing.1 += w;
            } else {
                merged.push((f, w));
            }
        }
        if merged.is_empty() {
            return Err(Error::ZeroTotalWeight);
        }
        for (_, w) in merged.iter_mut() {
            *w /= total;
        }
        merged.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("read fractions are never NaN"));
        Ok(Self { points: merged })
    }

    /// The `(read_fraction, probability)` pairs, sorted by read fraction.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// The mean read fraction `sum(f * p(f))`, used as the LP's optimization
    /// target (see `quorums_optimize`'s load LP).
    pub fn mean(&self) -> f64 {
        self.points.iter().map(|&(f, p)| f * p).sum()
    }
}

/// Accept exactly one of a read-fraction or write-fraction distribution. A
/// write fraction `f_w` is translated to a read-fraction distribution via
/// `f_r = 1 - f_w`.
pub fn canonicalize_rw(
    read_fraction: Option<Distribution>,
    write_fraction: Option<Distribution>,
) -> Result<Distribution, Error> {
    match (read_fraction, write_fraction) {
        (Some(rf), None) => Ok(rf),
        (None, Some(wf)) => {
            let flipped: Vec<(f64, f64)> =
                wf.points.into_iter().map(|(f, p)| (1.0 - f, p)).collect();
            Distribution::weighted(flipped)
        }
        _ => Err(Error::ConflictingFraction),
    }
}
