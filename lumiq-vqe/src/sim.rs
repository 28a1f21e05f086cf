//! Statevector reference executor
//!
//! A small exact simulator standing in for photonic hardware. It prepares a
//! hardware-efficient entangling ansatz (RY layer, CNOT chain, RY layer —
//! `2 * n_qubits` parameters), rotates into a Pauli term's measurement basis,
//! and samples computational-basis outcomes with a seedable generator.
//!
//! The dual-rail variant re-encodes each logical bit across two optical modes
//! and can inject photon loss, which shows up downstream as postselected
//! (0, 0) pairs.

use std::cell::RefCell;
use std::f64::consts::FRAC_1_SQRT_2;

use lumiq_core::{LumiqError, Outcome, Pauli, PauliTerm, ProbDist, Result};
use ndarray::Array1;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::evaluator::{Executor, OutcomeEncoding};

/// Default shot count for the reference executors
pub const DEFAULT_SHOTS: usize = 8192;

/// Amplitudes below this are dropped from exact distributions
const AMPLITUDE_CUTOFF: f64 = 1e-15;

// =============================================================================
// Statevector
// =============================================================================

/// Dense statevector over `2^n` amplitudes, qubit q at bit q of the index
#[derive(Debug, Clone)]
pub struct Statevector {
    n_qubits: usize,
    amplitudes: Array1<Complex64>,
}

impl Statevector {
    /// Create |0...0⟩
    pub fn new(n_qubits: usize) -> Self {
        let mut amplitudes = Array1::zeros(1 << n_qubits);
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            n_qubits,
            amplitudes,
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    /// Apply a 2x2 unitary to one qubit
    pub fn apply_single(&mut self, qubit: usize, gate: &[[Complex64; 2]; 2]) {
        let stride = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & stride == 0 {
                let a0 = self.amplitudes[i];
                let a1 = self.amplitudes[i | stride];
                self.amplitudes[i] = gate[0][0] * a0 + gate[0][1] * a1;
                self.amplitudes[i | stride] = gate[1][0] * a0 + gate[1][1] * a1;
            }
        }
    }

    /// Apply CNOT with the given control and target
    pub fn apply_cnot(&mut self, control: usize, target: usize) {
        let c = 1 << control;
        let t = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & c != 0 && i & t == 0 {
                self.amplitudes.swap(i, i | t);
            }
        }
    }

    /// Computational-basis probability of each index
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }
}

// =============================================================================
// Gates
// =============================================================================

fn ry(theta: f64) -> [[Complex64; 2]; 2] {
    let (sin, cos) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(cos, 0.0), Complex64::new(-sin, 0.0)],
        [Complex64::new(sin, 0.0), Complex64::new(cos, 0.0)],
    ]
}

fn hadamard() -> [[Complex64; 2]; 2] {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn s_dagger() -> [[Complex64; 2]; 2] {
    let zero = Complex64::new(0.0, 0.0);
    [
        [Complex64::new(1.0, 0.0), zero],
        [zero, Complex64::new(0.0, -1.0)],
    ]
}

// =============================================================================
// Ansatz and Basis Rotation
// =============================================================================

/// Parameter count of the entangling ansatz over `n_qubits`
pub fn ansatz_params(n_qubits: usize) -> usize {
    2 * n_qubits
}

/// Prepare the ansatz state and rotate into the term's measurement basis
fn prepare(n_qubits: usize, params: &[f64], basis: &PauliTerm) -> Result<Statevector> {
    if params.len() != ansatz_params(n_qubits) {
        return Err(LumiqError::Executor(format!(
            "ansatz takes {} parameters, got {}",
            ansatz_params(n_qubits),
            params.len()
        )));
    }
    if basis.n_qubits() != n_qubits {
        return Err(LumiqError::Executor(format!(
            "basis term acts on {} qubits, executor simulates {}",
            basis.n_qubits(),
            n_qubits
        )));
    }

    let mut state = Statevector::new(n_qubits);
    for q in 0..n_qubits {
        state.apply_single(q, &ry(params[q]));
    }
    for q in 0..n_qubits.saturating_sub(1) {
        state.apply_cnot(q, q + 1);
    }
    for q in 0..n_qubits {
        state.apply_single(q, &ry(params[n_qubits + q]));
    }

    // measurement basis change: X → H, Y → H·S†
    for (q, &pauli) in basis.paulis.iter().enumerate() {
        match pauli {
            Pauli::X => state.apply_single(q, &hadamard()),
            Pauli::Y => {
                state.apply_single(q, &s_dagger());
                state.apply_single(q, &hadamard());
            }
            Pauli::I | Pauli::Z => {}
        }
    }
    Ok(state)
}

fn index_to_outcome(index: usize, n_qubits: usize) -> Outcome {
    (0..n_qubits).map(|q| ((index >> q) & 1) as u8).collect()
}

fn sample_index(rng: &mut StdRng, probs: &[f64]) -> usize {
    let mut r: f64 = rng.gen();
    for (i, &p) in probs.iter().enumerate() {
        r -= p;
        if r <= 0.0 {
            return i;
        }
    }
    probs.len() - 1
}

// =============================================================================
// Logical Sampler
// =============================================================================

/// Shot-based executor over the exact ansatz state, logical encoding
pub struct SamplerExecutor {
    n_qubits: usize,
    shots: usize,
    rng: RefCell<StdRng>,
}

impl SamplerExecutor {
    pub fn new(n_qubits: usize, shots: usize) -> Self {
        Self {
            n_qubits,
            shots,
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    /// Builder: seed the shot generator for reproducible sampling
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Exact logical distribution of the rotated ansatz state (no sampling)
    pub fn logical_distribution(&self, params: &[f64], basis: &PauliTerm) -> Result<ProbDist> {
        let probs = prepare(self.n_qubits, params, basis)?.probabilities();
        Ok(probs
            .iter()
            .enumerate()
            .filter(|(_, &p)| p > AMPLITUDE_CUTOFF)
            .map(|(i, &p)| (index_to_outcome(i, self.n_qubits), p))
            .collect())
    }
}

impl Executor for SamplerExecutor {
    fn run(&self, params: &[f64], basis: &PauliTerm) -> Result<Vec<Outcome>> {
        let probs = prepare(self.n_qubits, params, basis)?.probabilities();
        let mut rng = self.rng.borrow_mut();
        Ok((0..self.shots)
            .map(|_| index_to_outcome(sample_index(&mut rng, &probs), self.n_qubits))
            .collect())
    }
}

// =============================================================================
// Dual-Rail Sampler
// =============================================================================

/// Shot-based executor emitting dual-rail optical outcomes.
///
/// Each logical bit b becomes the mode pair (1-b, b). With a nonzero loss
/// rate a qubit's photon vanishes with that probability per shot, leaving the
/// invalid pair (0, 0) for postselection to discard.
pub struct DualRailExecutor {
    n_qubits: usize,
    shots: usize,
    loss: f64,
    rng: RefCell<StdRng>,
}

impl DualRailExecutor {
    pub fn new(n_qubits: usize, shots: usize) -> Self {
        Self {
            n_qubits,
            shots,
            loss: 0.0,
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    /// Builder: seed the shot generator
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Builder: per-qubit photon loss probability
    pub fn with_loss(mut self, loss: f64) -> Self {
        self.loss = loss.clamp(0.0, 1.0);
        self
    }

    /// Exact loss-free optical distribution of the rotated ansatz state
    pub fn optical_distribution(&self, params: &[f64], basis: &PauliTerm) -> Result<ProbDist> {
        let probs = prepare(self.n_qubits, params, basis)?.probabilities();
        Ok(probs
            .iter()
            .enumerate()
            .filter(|(_, &p)| p > AMPLITUDE_CUTOFF)
            .map(|(i, &p)| (encode(&index_to_outcome(i, self.n_qubits)), p))
            .collect())
    }
}

/// Dual-rail encode a logical outcome: bit b → mode pair (1-b, b)
fn encode(bits: &[u8]) -> Outcome {
    bits.iter().flat_map(|&b| [1 - b, b]).collect()
}

impl Executor for DualRailExecutor {
    fn encoding(&self) -> OutcomeEncoding {
        OutcomeEncoding::DualRail
    }

    fn run(&self, params: &[f64], basis: &PauliTerm) -> Result<Vec<Outcome>> {
        let probs = prepare(self.n_qubits, params, basis)?.probabilities();
        let mut rng = self.rng.borrow_mut();
        Ok((0..self.shots)
            .map(|_| {
                let bits = index_to_outcome(sample_index(&mut rng, &probs), self.n_qubits);
                let mut optical = encode(&bits);
                for q in 0..self.n_qubits {
                    if self.loss > 0.0 && rng.gen::<f64>() < self.loss {
                        optical[2 * q] = 0;
                        optical[2 * q + 1] = 0;
                    }
                }
                optical
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lumiq_core::{pauli_expectation, qubit_marginal};
    use std::f64::consts::PI;

    #[test]
    fn test_zero_parameters_leave_ground_state() {
        let term = PauliTerm::from_label("ZZ", 1.0).unwrap();
        let state = prepare(2, &[0.0; 4], &term).unwrap();
        let probs = state.probabilities();
        assert_relative_eq!(probs[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_full_rotation_flips_and_entangles() {
        // RY(π) on qubit 0 then CNOT(0, 1) lands on |11⟩ (index 3)
        let term = PauliTerm::from_label("ZZ", 1.0).unwrap();
        let state = prepare(2, &[PI, 0.0, 0.0, 0.0], &term).unwrap();
        let probs = state.probabilities();
        assert_relative_eq!(probs[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_x_basis_rotation_of_ground_state() {
        // |0⟩ measured in the X basis is an even split
        let term = PauliTerm::from_label("X", 1.0).unwrap();
        let state = prepare(1, &[0.0, 0.0], &term).unwrap();
        let probs = state.probabilities();
        assert_relative_eq!(probs[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(probs[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_parameter_arity_enforced() {
        let term = PauliTerm::from_label("ZZ", 1.0).unwrap();
        let err = prepare(2, &[0.0; 3], &term).unwrap_err();
        assert!(matches!(err, LumiqError::Executor(_)));
    }

    #[test]
    fn test_sampler_tracks_exact_distribution() {
        let term = PauliTerm::from_label("ZZ", 1.0).unwrap();
        let params = [0.7, -0.3, 0.4, 0.1];
        let executor = SamplerExecutor::new(2, 20_000).with_seed(5);

        let exact = executor.logical_distribution(&params, &term).unwrap();
        let outcomes = executor.run(&params, &term).unwrap();
        let sampled = lumiq_core::empirical_distribution(&outcomes).unwrap();

        for (outcome, &p) in &exact {
            let observed = sampled.get(outcome).copied().unwrap_or(0.0);
            assert_relative_eq!(observed, p, epsilon = 0.02);
        }
    }

    #[test]
    fn test_dual_rail_matches_logical_after_decoding() {
        let term = PauliTerm::from_label("XX", 1.0).unwrap();
        let params = [0.3, -0.7, 1.1, 0.25];

        let logical = SamplerExecutor::new(2, 1)
            .logical_distribution(&params, &term)
            .unwrap();
        let optical = DualRailExecutor::new(2, 1)
            .optical_distribution(&params, &term)
            .unwrap();
        let decoded = qubit_marginal(&optical, 2).unwrap();

        let mask = term.basis_mask();
        assert_relative_eq!(
            pauli_expectation(&mask, &decoded),
            pauli_expectation(&mask, &logical),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_lossy_outcomes_carry_empty_pairs() {
        let term = PauliTerm::from_label("ZZ", 1.0).unwrap();
        let executor = DualRailExecutor::new(2, 500).with_seed(9).with_loss(0.5);
        let outcomes = executor.run(&[0.0; 4], &term).unwrap();

        let lost = outcomes
            .iter()
            .filter(|o| o.chunks_exact(2).any(|pair| pair == [0, 0]))
            .count();
        assert!(lost > 100, "expected substantial loss, saw {lost}/500");
    }
}
