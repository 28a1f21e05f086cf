//! Dual-rail decoding and postselection
//!
//! A dual-rail qubit occupies two consecutive optical modes (2i, 2i+1) and is
//! valid only when exactly one photon sits in the pair:
//!
//! | pair (2i, 2i+1) | logical bit |
//! |-----------------|-------------|
//! | (1, 0)          | 0           |
//! | (0, 1)          | 1           |
//! | anything else   | invalid     |
//!
//! Vacuum, bunching, or counts above one mark an encoding/loss error. One bad
//! pair invalidates the whole sample. The retained mass is renormalized so
//! energies are conditioned on successful encoding, not on raw photonic
//! yield.

use crate::error::{LumiqError, Result};
use crate::statistics::{empirical_distribution, Outcome, ProbDist};

/// Retained probability mass below this threshold counts as fully rejected
pub const MIN_RETAINED_MASS: f64 = 1e-12;

/// Decode one dual-rail mode pair into a logical bit.
///
/// Returns `None` when the pair does not hold exactly one photon.
pub fn decode_qubit(early: u8, late: u8) -> Option<u8> {
    match (early, late) {
        (1, 0) => Some(0),
        (0, 1) => Some(1),
        _ => None,
    }
}

/// Decode a full optical outcome into a logical outcome.
///
/// Validity is all-or-nothing: every pair must decode, otherwise the entire
/// sample is rejected. Odd-length outcomes cannot pair up and are invalid.
pub fn decode_outcome(optical: &[u8]) -> Option<Outcome> {
    if optical.len() % 2 != 0 {
        return None;
    }
    optical
        .chunks_exact(2)
        .map(|pair| decode_qubit(pair[0], pair[1]))
        .collect()
}

/// Condition an optical distribution on successful dual-rail encoding.
///
/// Valid outcomes map to their decoded logical key (distinct optical outcomes
/// decoding alike have their mass summed); invalid outcomes are discarded;
/// the survivors are renormalized by the retained mass. Fails with
/// [`LumiqError::NoValidStates`] when postselection rejects everything.
pub fn qubit_marginal(dist: &ProbDist, n_qubits: usize) -> Result<ProbDist> {
    let mut logical = ProbDist::default();
    let mut retained = 0.0;

    for (optical, &mass) in dist {
        if optical.len() != 2 * n_qubits {
            return Err(LumiqError::ArityMismatch {
                expected: 2 * n_qubits,
                found: optical.len(),
            });
        }
        if let Some(bits) = decode_outcome(optical) {
            *logical.entry(bits).or_insert(0.0) += mass;
            retained += mass;
        }
    }

    if retained < MIN_RETAINED_MASS {
        return Err(LumiqError::NoValidStates);
    }
    for mass in logical.values_mut() {
        *mass /= retained;
    }
    Ok(logical)
}

/// Decode a raw optical sample sequence into a logical distribution.
pub fn decode_samples(samples: &[Outcome], n_qubits: usize) -> Result<ProbDist> {
    let dist = empirical_distribution(samples)?;
    qubit_marginal(&dist, n_qubits)
}

/// Fraction of probability mass that survives postselection.
///
/// Diagnostic for encoding quality; 1.0 means every outcome was a valid
/// dual-rail state.
pub fn retained_fraction(dist: &ProbDist, n_qubits: usize) -> Result<f64> {
    let mut retained = 0.0;
    for (optical, &mass) in dist {
        if optical.len() != 2 * n_qubits {
            return Err(LumiqError::ArityMismatch {
                expected: 2 * n_qubits,
                found: optical.len(),
            });
        }
        if decode_outcome(optical).is_some() {
            retained += mass;
        }
    }
    Ok(retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::check_normalized;
    use approx::assert_relative_eq;

    fn dist_from(pairs: &[(&[u8], f64)]) -> ProbDist {
        pairs
            .iter()
            .map(|(outcome, mass)| (outcome.to_vec(), *mass))
            .collect()
    }

    #[test]
    fn test_decode_qubit_truth_table() {
        assert_eq!(decode_qubit(1, 0), Some(0));
        assert_eq!(decode_qubit(0, 1), Some(1));
        assert_eq!(decode_qubit(0, 0), None);
        assert_eq!(decode_qubit(1, 1), None);
        assert_eq!(decode_qubit(2, 0), None);
        assert_eq!(decode_qubit(0, 2), None);
    }

    #[test]
    fn test_decode_outcome_all_pairs_must_hold() {
        assert_eq!(decode_outcome(&[0, 1, 0, 1]), Some(vec![1, 1]));
        assert_eq!(decode_outcome(&[1, 0, 0, 1]), Some(vec![0, 1]));
        assert_eq!(decode_outcome(&[1, 0, 1, 0]), Some(vec![0, 0]));
        assert_eq!(decode_outcome(&[0, 1, 1, 0]), Some(vec![1, 0]));

        // one bad pair rejects the sample
        assert_eq!(decode_outcome(&[1, 1, 0, 1]), None);
        assert_eq!(decode_outcome(&[0, 1, 1, 1]), None);
        assert_eq!(decode_outcome(&[1, 1, 1, 1]), None);
        assert_eq!(decode_outcome(&[0, 0, 0, 1]), None);

        // odd length cannot pair up
        assert_eq!(decode_outcome(&[1, 0, 1]), None);
    }

    #[test]
    fn test_qubit_marginal_renormalizes() {
        let dist = dist_from(&[
            (&[0, 0, 0, 0], 0.4),
            (&[0, 1, 0, 1], 0.3),
            (&[1, 0, 0, 1], 0.3),
        ]);
        let logical = qubit_marginal(&dist, 2).unwrap();

        assert_eq!(logical.len(), 2);
        assert_relative_eq!(logical[&vec![1, 1]], 0.5);
        assert_relative_eq!(logical[&vec![0, 1]], 0.5);
        check_normalized(&logical).unwrap();
    }

    #[test]
    fn test_qubit_marginal_partial_pair_rejects_whole_sample() {
        // third pair (0, 0) of the first outcome is invalid even though its
        // first two pairs decode fine
        let dist = dist_from(&[
            (&[0, 1, 0, 1, 0, 0], 0.5),
            (&[0, 1, 1, 0, 1, 0], 0.4),
            (&[1, 0, 0, 1, 0, 1], 0.1),
        ]);
        let logical = qubit_marginal(&dist, 3).unwrap();

        assert_eq!(logical.len(), 2);
        assert_relative_eq!(logical[&vec![1, 0, 0]], 0.8);
        assert_relative_eq!(logical[&vec![0, 1, 1]], 0.2);
    }

    #[test]
    fn test_qubit_marginal_single_survivor() {
        let dist = dist_from(&[
            (&[1, 0, 0, 1], 0.6),
            (&[1, 1, 1, 1], 0.2),
            (&[2, 0, 0, 1], 0.2),
        ]);
        let logical = qubit_marginal(&dist, 2).unwrap();

        assert_eq!(logical.len(), 1);
        assert_relative_eq!(logical[&vec![0, 1]], 1.0);
    }

    #[test]
    fn test_qubit_marginal_no_valid_states() {
        let dist = dist_from(&[(&[0, 0, 0, 0], 0.7), (&[1, 1, 0, 0], 0.3)]);
        let err = qubit_marginal(&dist, 2).unwrap_err();
        assert!(matches!(err, LumiqError::NoValidStates));
    }

    #[test]
    fn test_qubit_marginal_arity_check() {
        let dist = dist_from(&[(&[0, 1, 0, 1], 1.0)]);
        let err = qubit_marginal(&dist, 3).unwrap_err();
        assert!(matches!(
            err,
            LumiqError::ArityMismatch {
                expected: 6,
                found: 4
            }
        ));
    }

    #[test]
    fn test_decode_samples_end_to_end() {
        let samples: Vec<Outcome> = vec![
            vec![0, 1, 0, 1],
            vec![0, 1, 0, 1],
            vec![1, 0, 0, 1],
            vec![1, 1, 0, 1], // rejected
        ];
        let logical = decode_samples(&samples, 2).unwrap();

        assert_relative_eq!(logical[&vec![1, 1]], 2.0 / 3.0);
        assert_relative_eq!(logical[&vec![0, 1]], 1.0 / 3.0);
    }

    #[test]
    fn test_retained_fraction() {
        let dist = dist_from(&[
            (&[0, 0, 0, 0], 0.4),
            (&[0, 1, 0, 1], 0.3),
            (&[1, 0, 0, 1], 0.3),
        ]);
        let yield_ = retained_fraction(&dist, 2).unwrap();
        assert_relative_eq!(yield_, 0.6);
    }
}
