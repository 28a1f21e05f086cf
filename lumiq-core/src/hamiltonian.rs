//! Pauli-term Hamiltonians
//!
//! A Hamiltonian is an ordered, weighted sum of Pauli strings over a fixed
//! qubit count. Qubit i corresponds to position i of the label string, so
//! "ZI" puts Z on qubit 0 and identity on qubit 1.

use serde::Serialize;

use crate::error::{LumiqError, Result};

/// Single-qubit Pauli label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    /// Parse a label character
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'I' => Ok(Pauli::I),
            'X' => Ok(Pauli::X),
            'Y' => Ok(Pauli::Y),
            'Z' => Ok(Pauli::Z),
            other => Err(LumiqError::UnknownPauli(other)),
        }
    }

    /// Label character
    pub fn as_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

/// One weighted Pauli string (e.g. 0.18 * XX)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PauliTerm {
    /// Coefficient
    pub coeff: f64,
    /// Per-qubit labels, position i acting on qubit i
    pub paulis: Vec<Pauli>,
}

impl PauliTerm {
    /// Create from explicit labels
    pub fn new(coeff: f64, paulis: Vec<Pauli>) -> Self {
        Self { coeff, paulis }
    }

    /// Create from a label string like "IZZX"
    pub fn from_label(label: &str, coeff: f64) -> Result<Self> {
        let paulis = label
            .chars()
            .map(Pauli::from_char)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { coeff, paulis })
    }

    /// Pure identity term on `n_qubits` qubits
    pub fn identity(n_qubits: usize, coeff: f64) -> Self {
        Self {
            coeff,
            paulis: vec![Pauli::I; n_qubits],
        }
    }

    /// Number of qubits the term acts on
    pub fn n_qubits(&self) -> usize {
        self.paulis.len()
    }

    /// Check if every label is identity
    pub fn is_identity(&self) -> bool {
        self.paulis.iter().all(|&p| p == Pauli::I)
    }

    /// Binary mask marking non-identity positions.
    ///
    /// Feeds the parity computation of the expectation estimator.
    pub fn basis_mask(&self) -> Vec<u8> {
        self.paulis
            .iter()
            .map(|&p| u8::from(p != Pauli::I))
            .collect()
    }

    /// Label string, qubit 0 first
    pub fn label(&self) -> String {
        self.paulis.iter().map(|p| p.as_char()).collect()
    }
}

/// Weighted sum of Pauli terms over a fixed qubit count
#[derive(Debug, Clone, Serialize)]
pub struct Hamiltonian {
    terms: Vec<PauliTerm>,
    n_qubits: usize,
}

impl Hamiltonian {
    /// Create an empty Hamiltonian
    pub fn new(n_qubits: usize) -> Self {
        Self {
            terms: Vec::new(),
            n_qubits,
        }
    }

    /// Build from (label, coefficient) pairs
    pub fn from_terms(n_qubits: usize, terms: &[(&str, f64)]) -> Result<Self> {
        let mut h = Self::new(n_qubits);
        for &(label, coeff) in terms {
            h.add_term(label, coeff)?;
        }
        Ok(h)
    }

    /// Append a term, rejecting arity mismatches
    pub fn add(&mut self, term: PauliTerm) -> Result<()> {
        if term.n_qubits() != self.n_qubits {
            return Err(LumiqError::ArityMismatch {
                expected: self.n_qubits,
                found: term.n_qubits(),
            });
        }
        self.terms.push(term);
        Ok(())
    }

    /// Append a term from a label string
    pub fn add_term(&mut self, label: &str, coeff: f64) -> Result<()> {
        self.add(PauliTerm::from_label(label, coeff)?)
    }

    /// All terms, in insertion order
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    /// Qubit count
    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if no terms were added
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Summed coefficient of all pure-identity terms
    pub fn identity_coefficient(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(|t| t.coeff)
            .sum()
    }

    /// Terms that require a measurement (non-identity)
    pub fn measurable_terms(&self) -> Vec<&PauliTerm> {
        self.terms.iter().filter(|t| !t.is_identity()).collect()
    }

    /// Minimal 2-qubit H₂ Hamiltonian at equilibrium bond length.
    ///
    /// Literature coefficients (STO-3G, R = 0.735 Å), used by tests and demos.
    pub fn h2_minimal() -> Self {
        let mut h = Self::new(2);

        h.add_term("II", -1.052373).expect("fixed labels");
        h.add_term("IZ", -0.397937).expect("fixed labels");
        h.add_term("ZI", -0.397937).expect("fixed labels");
        h.add_term("ZZ", 0.011280).expect("fixed labels");
        h.add_term("XX", 0.180931).expect("fixed labels");

        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pauli_parsing() {
        assert_eq!(Pauli::from_char('x').unwrap(), Pauli::X);
        assert_eq!(Pauli::from_char('Z').unwrap(), Pauli::Z);
        assert!(matches!(
            Pauli::from_char('Q').unwrap_err(),
            LumiqError::UnknownPauli('Q')
        ));
    }

    #[test]
    fn test_term_basis_mask() {
        let term = PauliTerm::from_label("IZXI", 0.5).unwrap();
        assert_eq!(term.basis_mask(), vec![0, 1, 1, 0]);
        assert_eq!(term.label(), "IZXI");
        assert!(!term.is_identity());

        let identity = PauliTerm::identity(4, -7.5);
        assert!(identity.is_identity());
        assert_eq!(identity.basis_mask(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_hamiltonian_arity_check() {
        let mut h = Hamiltonian::new(3);
        h.add_term("IZI", 1.0).unwrap();
        let err = h.add_term("IZ", 1.0).unwrap_err();
        assert!(matches!(
            err,
            LumiqError::ArityMismatch {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_identity_partition() {
        let h = Hamiltonian::h2_minimal();
        assert_eq!(h.n_qubits(), 2);
        assert_eq!(h.len(), 5);
        assert_relative_eq!(h.identity_coefficient(), -1.052373);
        assert_eq!(h.measurable_terms().len(), 4);
    }

    #[test]
    fn test_from_terms() {
        let h = Hamiltonian::from_terms(2, &[("ZZ", 0.25), ("XX", -0.5)]).unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h.terms()[1].label(), "XX");
        assert!(Hamiltonian::from_terms(2, &[("ZZZ", 1.0)]).is_err());
    }
}
