//! # Lumiq Core: Outcome Statistics and Dual-Rail Decoding
//!
//! Building blocks for estimating Hamiltonian expectation values from
//! sampled measurement outcomes of photonic quantum circuits:
//!
//! - **Statistics**: empirical probability distributions over outcome
//!   bitstrings, sparse and normalization-checked
//! - **Dual-rail decoding**: postselection of physically-encoded optical
//!   outcomes into logical qubit statistics, with renormalization
//! - **Expectation estimation**: signed Pauli-term expectation values from
//!   basis masks and outcome parities
//! - **Hamiltonians**: ordered, weighted Pauli-string collections
//!
//! ## Quick Start
//!
//! ```
//! use lumiq_core::{decode_samples, pauli_expectation, PauliTerm};
//!
//! let samples = vec![vec![0, 1, 0, 1], vec![0, 1, 0, 1], vec![1, 0, 0, 1]];
//! let logical = decode_samples(&samples, 2).unwrap();
//!
//! let term = PauliTerm::from_label("ZZ", 1.0).unwrap();
//! let value = pauli_expectation(&term.basis_mask(), &logical);
//! assert!(value.is_finite());
//! ```

pub mod dual_rail;
pub mod error;
pub mod expectation;
pub mod hamiltonian;
pub mod statistics;

// Re-exports
pub use dual_rail::{
    decode_outcome, decode_qubit, decode_samples, qubit_marginal, retained_fraction,
    MIN_RETAINED_MASS,
};
pub use error::{LumiqError, Result};
pub use expectation::pauli_expectation;
pub use hamiltonian::{Hamiltonian, Pauli, PauliTerm};
pub use statistics::{check_normalized, empirical_distribution, Outcome, ProbDist, NORM_TOLERANCE};
