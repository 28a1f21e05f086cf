//! Hamiltonian evaluation against a sampling executor
//!
//! Turns one parameter vector into one scalar energy: terms are grouped by
//! the measurement basis they require, each distinct basis costs one executor
//! invocation, and the sampled outcomes flow through statistics (and, for
//! dual-rail encodings, postselection) into signed expectation values.
//!
//! Any failure along the way aborts the whole evaluation; a partial energy is
//! never returned.

use std::collections::hash_map::Entry;
use std::time::{Duration, Instant};

use lumiq_core::{
    check_normalized, empirical_distribution, pauli_expectation, qubit_marginal, Hamiltonian,
    LumiqError, Outcome, Pauli, PauliTerm, Result,
};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

// =============================================================================
// Executor Capability
// =============================================================================

/// How an executor encodes the outcomes it returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeEncoding {
    /// One 0/1 entry per logical qubit
    Logical,
    /// Two photon-count entries per qubit, modes (2i, 2i+1)
    DualRail,
}

/// The injected sampling capability: map (parameters, measurement basis) to
/// measurement outcomes.
///
/// The Pauli term doubles as the basis descriptor and is passed through
/// unchanged. The executor owns basis rotation: X/Y labels must be rotated
/// into the computational basis before sampling. Outcomes are deterministic
/// only in distribution.
pub trait Executor {
    /// Encoding of the outcomes produced by [`Executor::run`]
    fn encoding(&self) -> OutcomeEncoding {
        OutcomeEncoding::Logical
    }

    /// Prepare the circuit at `params`, measure in the term's basis, sample
    fn run(&self, params: &[f64], basis: &PauliTerm) -> Result<Vec<Outcome>>;
}

/// Plain functions act as logical-encoding executors
impl<F> Executor for F
where
    F: Fn(&[f64], &PauliTerm) -> Result<Vec<Outcome>>,
{
    fn run(&self, params: &[f64], basis: &PauliTerm) -> Result<Vec<Outcome>> {
        self(params, basis)
    }
}

// =============================================================================
// Evaluator Configuration
// =============================================================================

/// Configuration for Hamiltonian evaluation
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluatorConfig {
    /// Evaluate each term with its own executor call instead of sharing one
    /// call per distinct basis
    pub ungrouped: bool,
    /// Wall-clock budget for a single executor call
    pub deadline: Option<Duration>,
}

impl EvaluatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable basis grouping (one executor call per term)
    pub fn with_ungrouped(mut self) -> Self {
        self.ungrouped = true;
        self
    }

    /// Set the per-call deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

// =============================================================================
// Basis Grouping
// =============================================================================

/// Partition measurable terms into groups sharing one executor invocation.
///
/// Terms identical up to their coefficient need the same circuit and the same
/// measurement rotations, so one outcome set serves them all. Insertion order
/// of first occurrence is preserved.
fn basis_groups(hamiltonian: &Hamiltonian, ungrouped: bool) -> Vec<Vec<&PauliTerm>> {
    let measurable = hamiltonian.measurable_terms();
    if ungrouped {
        return measurable.into_iter().map(|term| vec![term]).collect();
    }

    let mut groups: Vec<Vec<&PauliTerm>> = Vec::new();
    let mut index: FxHashMap<&[Pauli], usize> = FxHashMap::default();
    for term in measurable {
        match index.entry(term.paulis.as_slice()) {
            Entry::Occupied(slot) => groups[*slot.get()].push(term),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push(vec![term]);
            }
        }
    }
    groups
}

// =============================================================================
// Energy Evaluation
// =============================================================================

/// One executor invocation for a basis group, folded into the group's summed
/// weighted expectation value.
fn evaluate_group<E: Executor + ?Sized>(
    group: &[&PauliTerm],
    executor: &E,
    params: &[f64],
    n_qubits: usize,
    config: &EvaluatorConfig,
) -> Result<f64> {
    let basis = group[0];

    let start = Instant::now();
    let outcomes = executor.run(params, basis)?;
    if let Some(limit) = config.deadline {
        let elapsed = start.elapsed();
        if elapsed > limit {
            return Err(LumiqError::DeadlineExceeded {
                limit_ms: limit.as_millis() as u64,
                elapsed_ms: elapsed.as_millis() as u64,
            });
        }
    }

    if outcomes.is_empty() {
        return Err(LumiqError::MalformedOutcome(
            "executor returned an empty outcome set".into(),
        ));
    }
    let expected = match executor.encoding() {
        OutcomeEncoding::Logical => n_qubits,
        OutcomeEncoding::DualRail => 2 * n_qubits,
    };
    if let Some(bad) = outcomes.iter().find(|outcome| outcome.len() != expected) {
        return Err(LumiqError::MalformedOutcome(format!(
            "outcome of length {} where {} entries were declared",
            bad.len(),
            expected
        )));
    }

    let dist = empirical_distribution(&outcomes)?;
    let dist = match executor.encoding() {
        OutcomeEncoding::Logical => dist,
        OutcomeEncoding::DualRail => qubit_marginal(&dist, n_qubits)?,
    };
    check_normalized(&dist)?;

    Ok(group
        .iter()
        .map(|term| term.coeff * pauli_expectation(&term.basis_mask(), &dist))
        .sum())
}

/// Total energy of a Hamiltonian at the given parameters.
///
/// Pure identity terms contribute their coefficients without touching the
/// executor; every remaining basis group costs one executor invocation (or
/// one per term with grouping disabled). The first failure aborts the whole
/// evaluation.
pub fn total_energy<E: Executor + ?Sized>(
    hamiltonian: &Hamiltonian,
    executor: &E,
    params: &[f64],
    config: &EvaluatorConfig,
) -> Result<f64> {
    let mut energy = hamiltonian.identity_coefficient();
    for group in basis_groups(hamiltonian, config.ungrouped) {
        energy += evaluate_group(&group, executor, params, hamiltonian.n_qubits(), config)?;
    }
    Ok(energy)
}

/// Parallel variant of [`total_energy`].
///
/// Basis groups are independent for fixed parameters, so they fan out across
/// the rayon pool; partial results are summed only once every group has
/// completed. Identical semantics to the serial path, including fatal errors.
pub fn total_energy_parallel<E>(
    hamiltonian: &Hamiltonian,
    executor: &E,
    params: &[f64],
    config: &EvaluatorConfig,
) -> Result<f64>
where
    E: Executor + Sync,
{
    let groups = basis_groups(hamiltonian, config.ungrouped);
    let partials = groups
        .par_iter()
        .map(|group| evaluate_group(group, executor, params, hamiltonian.n_qubits(), config))
        .collect::<Result<Vec<f64>>>()?;
    Ok(hamiltonian.identity_coefficient() + partials.iter().sum::<f64>())
}
