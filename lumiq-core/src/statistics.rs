//! Empirical outcome statistics
//!
//! Converts a finite multiset of sampled measurement outcomes into a sparse
//! empirical probability distribution. Uses FxHashMap keyed by the outcome
//! bitstring for O(1) accumulation with minimal hashing overhead.

use rustc_hash::FxHashMap;

use crate::error::{LumiqError, Result};

/// A measurement outcome: one entry per logical qubit (0/1) or per optical
/// mode (non-negative photon count).
pub type Outcome = Vec<u8>;

/// Sparse probability distribution over outcomes.
///
/// Fully normalized distributions sum to 1.0 within [`NORM_TOLERANCE`];
/// intermediates produced during postselection may carry less mass until
/// renormalized.
pub type ProbDist = FxHashMap<Outcome, f64>;

/// Tolerance for the sum-to-one normalization check
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Build the empirical distribution of a sample sequence.
///
/// Each distinct outcome maps to `count / total`; outcomes never observed get
/// no entry. Fails on an empty sequence or on samples of inconsistent length.
pub fn empirical_distribution(samples: &[Outcome]) -> Result<ProbDist> {
    if samples.is_empty() {
        return Err(LumiqError::EmptySamples);
    }

    let arity = samples[0].len();
    let mut counts: FxHashMap<Outcome, usize> = FxHashMap::default();
    for sample in samples {
        if sample.len() != arity {
            return Err(LumiqError::ArityMismatch {
                expected: arity,
                found: sample.len(),
            });
        }
        *counts.entry(sample.clone()).or_insert(0) += 1;
    }

    let total = samples.len() as f64;
    Ok(counts
        .into_iter()
        .map(|(outcome, count)| (outcome, count as f64 / total))
        .collect())
}

/// Verify that a distribution's mass is 1.0 within [`NORM_TOLERANCE`].
///
/// A distribution outside tolerance is an upstream bug; it is rejected here
/// rather than silently renormalized a second time.
pub fn check_normalized(dist: &ProbDist) -> Result<()> {
    let total: f64 = dist.values().sum();
    if (total - 1.0).abs() > NORM_TOLERANCE {
        return Err(LumiqError::NotNormalized { total });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empirical_distribution_literal() {
        let samples: Vec<Outcome> = vec![
            vec![0, 0, 0],
            vec![0, 0, 1],
            vec![0, 0, 0],
            vec![0, 1, 0],
            vec![0, 0, 1],
        ];
        let dist = empirical_distribution(&samples).unwrap();

        assert_eq!(dist.len(), 3);
        assert_relative_eq!(dist[&vec![0, 0, 0]], 0.4);
        assert_relative_eq!(dist[&vec![0, 0, 1]], 0.4);
        assert_relative_eq!(dist[&vec![0, 1, 0]], 0.2);
    }

    #[test]
    fn test_empirical_distribution_sums_to_one() {
        let samples: Vec<Outcome> = (0..7u8)
            .map(|i| vec![i % 2, (i / 2) % 2, (i / 4) % 2])
            .collect();
        let dist = empirical_distribution(&samples).unwrap();

        let total: f64 = dist.values().sum();
        assert_relative_eq!(total, 1.0, epsilon = NORM_TOLERANCE);
        assert!(dist.values().all(|&p| p > 0.0));
        check_normalized(&dist).unwrap();
    }

    #[test]
    fn test_empirical_distribution_empty() {
        let err = empirical_distribution(&[]).unwrap_err();
        assert!(matches!(err, LumiqError::EmptySamples));
    }

    #[test]
    fn test_empirical_distribution_ragged() {
        let samples: Vec<Outcome> = vec![vec![0, 1], vec![0, 1, 0]];
        let err = empirical_distribution(&samples).unwrap_err();
        assert!(matches!(
            err,
            LumiqError::ArityMismatch {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_check_normalized_rejects() {
        let mut dist = ProbDist::default();
        dist.insert(vec![0], 0.5);
        dist.insert(vec![1], 0.4);
        let err = check_normalized(&dist).unwrap_err();
        assert!(matches!(err, LumiqError::NotNormalized { .. }));
    }
}
