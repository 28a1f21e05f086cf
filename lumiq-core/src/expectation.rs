//! Signed Pauli-term expectation from outcome statistics
//!
//! The estimator assumes the distribution was sampled in the eigenbasis of
//! the corresponding Pauli term; any X/Y basis rotation is the executor's
//! job and happens before sampling. Here a term reduces to its basis mask:
//! each outcome contributes its probability with the sign of the parity of
//! the masked bits.

use crate::statistics::ProbDist;

/// Expectation value of a Pauli term over an outcome distribution.
///
/// `basis_mask` is 1 at qubit positions carrying a non-identity label. For
/// each (outcome, p) pair the parity of `popcount(mask AND outcome) mod 2`
/// picks the sign of the contribution. An all-zero mask (pure identity term)
/// returns the total mass, 1.0 for a normalized distribution.
pub fn pauli_expectation(basis_mask: &[u8], dist: &ProbDist) -> f64 {
    dist.iter()
        .map(|(outcome, &p)| {
            let parity = basis_mask
                .iter()
                .zip(outcome.iter())
                .filter(|(mask, bit)| (*mask & *bit) & 1 == 1)
                .count();
            if parity % 2 == 0 {
                p
            } else {
                -p
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::Outcome;
    use approx::assert_relative_eq;

    fn dist_from(pairs: &[(&[u8], f64)]) -> ProbDist {
        pairs
            .iter()
            .map(|(outcome, mass)| (outcome.to_vec(), *mass))
            .collect()
    }

    #[test]
    fn test_identity_mask_returns_total_mass() {
        let dist = dist_from(&[
            (&[0, 0, 0], 0.5),
            (&[0, 0, 1], 0.3),
            (&[0, 1, 0], 0.1),
            (&[1, 0, 0], 0.1),
        ]);
        assert_relative_eq!(pauli_expectation(&[0, 0, 0], &dist), 1.0);
    }

    #[test]
    fn test_single_qubit_masks_literal() {
        let dist = dist_from(&[
            (&[0, 0, 0], 0.5),
            (&[0, 0, 1], 0.3),
            (&[0, 1, 0], 0.1),
            (&[1, 0, 0], 0.1),
        ]);
        assert_relative_eq!(pauli_expectation(&[0, 0, 1], &dist), 0.4);
        assert_relative_eq!(pauli_expectation(&[0, 1, 0], &dist), 0.8);
    }

    #[test]
    fn test_skewed_distribution_literal() {
        let dist = dist_from(&[
            (&[0, 0, 0], 0.45),
            (&[0, 0, 1], 0.23),
            (&[0, 1, 0], 0.1),
            (&[1, 0, 0], 0.32),
        ]);
        assert_relative_eq!(pauli_expectation(&[1, 0, 0], &dist), 0.46);
    }

    #[test]
    fn test_two_qubit_parity() {
        // |00> and |11> have even parity under a ZZ mask, |01>/|10> odd
        let dist = dist_from(&[
            (&[0, 0], 0.4),
            (&[1, 1], 0.4),
            (&[0, 1], 0.1),
            (&[1, 0], 0.1),
        ]);
        assert_relative_eq!(pauli_expectation(&[1, 1], &dist), 0.6);
    }

    #[test]
    fn test_identity_mask_independent_of_outcomes() {
        let outcomes: Vec<Outcome> = (0..8u8)
            .map(|i| vec![i & 1, (i >> 1) & 1, (i >> 2) & 1])
            .collect();
        let dist: ProbDist = outcomes.into_iter().map(|o| (o, 0.125)).collect();
        assert_relative_eq!(pauli_expectation(&[0, 0, 0], &dist), 1.0);
    }
}
