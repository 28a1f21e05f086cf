//! VQE driver
//!
//! Ties the pieces together: a Hamiltonian, an injected sampling executor,
//! and the Nelder–Mead search over the sampled energy. The driver owns the
//! parameter vector; the executor sees it by value once per basis group and
//! never mutates it.
//!
//! Executor failures, malformed outcomes, and deadline overruns terminate the
//! run; nothing is retried here.

use std::f64::consts::PI;

use lumiq_core::{Hamiltonian, LumiqError, Result};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::evaluator::{total_energy, EvaluatorConfig, Executor};
use crate::minimizer::{minimize, NelderMeadConfig};

// =============================================================================
// Constants
// =============================================================================

/// Default maximum optimizer iterations
pub const DEFAULT_VQE_MAX_ITER: usize = 100;

/// Default convergence tolerance
pub const DEFAULT_VQE_TOLERANCE: f64 = 1e-6;

// =============================================================================
// Configuration
// =============================================================================

/// VQE run configuration
#[derive(Debug, Clone, Serialize)]
pub struct VqeConfig {
    /// Maximum minimizer iterations; 0 evaluates the initial point only
    pub max_iterations: usize,
    /// Convergence tolerance handed to the minimizer
    pub tolerance: f64,
    /// Print the energy of every evaluation
    pub verbose: bool,
    /// Seed for the initial-parameter draw; None draws from entropy
    pub seed: Option<u64>,
    /// Explicit starting point; None draws uniformly from [-π, π)
    pub initial_params: Option<Vec<f64>>,
    /// Evaluator settings (grouping, deadline)
    pub evaluator: EvaluatorConfig,
}

impl Default for VqeConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_VQE_MAX_ITER,
            tolerance: DEFAULT_VQE_TOLERANCE,
            verbose: false,
            seed: None,
            initial_params: None,
            evaluator: EvaluatorConfig::default(),
        }
    }
}

impl VqeConfig {
    /// Builder: set maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder: set convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder: enable per-evaluation reporting
    pub fn with_verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Builder: seed the initial-parameter draw
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder: supply an explicit starting point
    pub fn with_initial_params(mut self, params: Vec<f64>) -> Self {
        self.initial_params = Some(params);
        self
    }

    /// Builder: set evaluator options
    pub fn with_evaluator(mut self, evaluator: EvaluatorConfig) -> Self {
        self.evaluator = evaluator;
        self
    }
}

// =============================================================================
// Result
// =============================================================================

/// Result of a VQE run
#[derive(Debug, Clone, Serialize)]
pub struct VqeResult {
    /// Best energy observed
    pub energy: f64,
    /// Parameters at the best observed energy
    pub params: Vec<f64>,
    /// Best energy at the start of each minimizer cycle
    pub history: Vec<f64>,
    /// Minimizer cycles executed
    pub iterations: usize,
    /// Total energy evaluations (executor round trips per basis group)
    pub energy_evaluations: usize,
    /// Whether the minimizer met its convergence criterion
    pub converged: bool,
}

impl VqeResult {
    /// Check that the reported energy is a finite number
    pub fn is_valid(&self) -> bool {
        self.energy.is_finite()
    }

    /// Energy gained relative to the first recorded evaluation
    pub fn energy_improvement(&self) -> f64 {
        match self.history.first() {
            Some(first) => first - self.energy,
            None => 0.0,
        }
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Variational quantum eigensolver over an injected executor
pub struct Vqe<E: Executor> {
    hamiltonian: Hamiltonian,
    executor: E,
    num_params: usize,
    config: VqeConfig,
}

impl<E: Executor> Vqe<E> {
    /// Create a solver with default configuration
    pub fn new(hamiltonian: Hamiltonian, executor: E, num_params: usize) -> Self {
        Self {
            hamiltonian,
            executor,
            num_params,
            config: VqeConfig::default(),
        }
    }

    /// Builder: replace the configuration
    pub fn with_config(mut self, config: VqeConfig) -> Self {
        self.config = config;
        self
    }

    /// The Hamiltonian under optimization
    pub fn hamiltonian(&self) -> &Hamiltonian {
        &self.hamiltonian
    }

    /// Starting point: explicit if configured, else a uniform draw from
    /// [-π, π) (seeded when a seed is set).
    fn initial_point(&self) -> Result<Array1<f64>> {
        match &self.config.initial_params {
            Some(params) => {
                if params.len() != self.num_params {
                    return Err(LumiqError::Optimization(format!(
                        "initial parameter vector has length {}, expected {}",
                        params.len(),
                        self.num_params
                    )));
                }
                Ok(Array1::from(params.clone()))
            }
            None => {
                let mut rng = match self.config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                Ok((0..self.num_params).map(|_| rng.gen_range(-PI..PI)).collect())
            }
        }
    }

    fn energy_at(&self, params: &[f64]) -> Result<f64> {
        total_energy(
            &self.hamiltonian,
            &self.executor,
            params,
            &self.config.evaluator,
        )
    }

    /// Run the optimization and return the best energy observed.
    ///
    /// With `max_iterations == 0` the initial point is evaluated once and the
    /// minimizer never steps.
    pub fn run(&self) -> Result<VqeResult> {
        let initial = self.initial_point()?;

        if self.config.max_iterations == 0 {
            let energy = self.energy_at(&initial.to_vec())?;
            return Ok(VqeResult {
                energy,
                params: initial.to_vec(),
                history: vec![energy],
                iterations: 0,
                energy_evaluations: 1,
                converged: false,
            });
        }

        let minimizer_config = NelderMeadConfig::default()
            .with_max_iterations(self.config.max_iterations)
            .with_tolerance(self.config.tolerance);

        let verbose = self.config.verbose;
        let mut evaluations = 0usize;
        let mut best_seen = f64::INFINITY;
        let result = minimize(&minimizer_config, &initial, |point| {
            let energy = self.energy_at(&point.to_vec())?;
            evaluations += 1;
            if energy < best_seen {
                best_seen = energy;
            }
            if verbose {
                println!(
                    "eval {:>4}: E = {:.8} (best {:.8})",
                    evaluations, energy, best_seen
                );
            }
            Ok(energy)
        })?;

        Ok(VqeResult {
            energy: result.value,
            params: result.params.to_vec(),
            history: result.history,
            iterations: result.iterations,
            energy_evaluations: result.evaluations,
            converged: result.converged,
        })
    }
}
