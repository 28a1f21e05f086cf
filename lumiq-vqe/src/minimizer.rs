//! Gradient-free Nelder–Mead simplex search
//!
//! The VQE objective is a sampled expectation value: repeated evaluation at
//! the same point returns different values and no gradient is available. A
//! simplex direct search needs neither, which is why it drives the outer
//! loop. Convergence is declared when the spread of objective values across
//! the simplex falls below tolerance; because the objective is noisy, the
//! result reports the best value ever observed, not the last one.

use lumiq_core::error::{LumiqError, Result};
use ndarray::Array1;
use serde::Serialize;

// =============================================================================
// Constants
// =============================================================================

/// Default maximum iterations
pub const DEFAULT_MAX_ITER: usize = 200;

/// Default convergence tolerance on the simplex objective spread
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default initial simplex edge length
pub const DEFAULT_INITIAL_STEP: f64 = 0.5;

/// Reflection coefficient
pub const REFLECTION: f64 = 1.0;

/// Expansion coefficient
pub const EXPANSION: f64 = 2.0;

/// Contraction coefficient
pub const CONTRACTION: f64 = 0.5;

/// Shrink coefficient
pub const SHRINK: f64 = 0.5;

// =============================================================================
// Configuration
// =============================================================================

/// Nelder–Mead configuration
#[derive(Debug, Clone, Serialize)]
pub struct NelderMeadConfig {
    /// Maximum proposal cycles
    pub max_iterations: usize,
    /// Convergence tolerance on the simplex objective spread
    pub tolerance: f64,
    /// Edge length of the initial axis-aligned simplex
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITER,
            tolerance: DEFAULT_TOLERANCE,
            initial_step: DEFAULT_INITIAL_STEP,
        }
    }
}

impl NelderMeadConfig {
    /// Builder: set maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder: set tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder: set initial simplex step
    pub fn with_initial_step(mut self, initial_step: f64) -> Self {
        self.initial_step = initial_step;
        self
    }
}

// =============================================================================
// Result
// =============================================================================

/// Result of a minimization run
#[derive(Debug, Clone)]
pub struct MinimizeResult {
    /// Point with the best observed objective value
    pub params: Array1<f64>,
    /// Best observed objective value
    pub value: f64,
    /// Proposal cycles executed
    pub iterations: usize,
    /// Objective evaluations spent
    pub evaluations: usize,
    /// Whether the spread criterion was met
    pub converged: bool,
    /// Best simplex value at the start of each cycle
    pub history: Vec<f64>,
}

// =============================================================================
// Best-seen Tracking
// =============================================================================

/// Tracks the best point across every objective evaluation
struct Tracker {
    best_point: Array1<f64>,
    best_value: f64,
    evaluations: usize,
}

impl Tracker {
    fn new(n: usize) -> Self {
        Self {
            best_point: Array1::zeros(n),
            best_value: f64::INFINITY,
            evaluations: 0,
        }
    }

    fn eval<F>(&mut self, objective: &mut F, point: &Array1<f64>) -> Result<f64>
    where
        F: FnMut(&Array1<f64>) -> Result<f64>,
    {
        let value = objective(point)?;
        if !value.is_finite() {
            return Err(LumiqError::Optimization(format!(
                "objective returned non-finite value {value}"
            )));
        }
        self.evaluations += 1;
        if value < self.best_value {
            self.best_value = value;
            self.best_point = point.clone();
        }
        Ok(value)
    }
}

// =============================================================================
// Minimization
// =============================================================================

/// Minimize a fallible black-box objective with Nelder–Mead.
///
/// Any objective error aborts the search immediately. Non-finite objective
/// values are rejected as optimization failures.
pub fn minimize<F>(
    config: &NelderMeadConfig,
    initial: &Array1<f64>,
    mut objective: F,
) -> Result<MinimizeResult>
where
    F: FnMut(&Array1<f64>) -> Result<f64>,
{
    let n = initial.len();
    if n == 0 {
        return Err(LumiqError::Optimization(
            "cannot minimize over an empty parameter vector".into(),
        ));
    }

    let mut tracker = Tracker::new(n);

    // initial simplex: the starting point plus one step along each axis
    let mut simplex: Vec<(Array1<f64>, f64)> = Vec::with_capacity(n + 1);
    let value = tracker.eval(&mut objective, initial)?;
    simplex.push((initial.clone(), value));
    for axis in 0..n {
        let mut vertex = initial.clone();
        vertex[axis] += config.initial_step;
        let value = tracker.eval(&mut objective, &vertex)?;
        simplex.push((vertex, value));
    }

    let mut history = Vec::with_capacity(config.max_iterations);
    let mut converged = false;
    let mut iterations = 0;

    for _ in 0..config.max_iterations {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        history.push(simplex[0].1);

        if simplex[n].1 - simplex[0].1 < config.tolerance {
            converged = true;
            break;
        }
        iterations += 1;

        // centroid of all vertices but the worst
        let mut centroid = Array1::<f64>::zeros(n);
        for (vertex, _) in &simplex[..n] {
            centroid += vertex;
        }
        centroid /= n as f64;

        let worst = simplex[n].0.clone();
        let f_best = simplex[0].1;
        let f_second_worst = simplex[n - 1].1;
        let f_worst = simplex[n].1;

        let reflected = &centroid + &((&centroid - &worst) * REFLECTION);
        let f_reflected = tracker.eval(&mut objective, &reflected)?;

        if f_reflected < f_best {
            let expanded = &centroid + &((&reflected - &centroid) * EXPANSION);
            let f_expanded = tracker.eval(&mut objective, &expanded)?;
            simplex[n] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
        } else if f_reflected < f_second_worst {
            simplex[n] = (reflected, f_reflected);
        } else {
            // contract toward the better of the worst vertex and the
            // reflected point; shrink the whole simplex if that fails too
            let (anchor, f_anchor) = if f_reflected < f_worst {
                (reflected, f_reflected)
            } else {
                (worst, f_worst)
            };
            let contracted = &centroid + &((&anchor - &centroid) * CONTRACTION);
            let f_contracted = tracker.eval(&mut objective, &contracted)?;
            if f_contracted < f_anchor {
                simplex[n] = (contracted, f_contracted);
            } else {
                let best_vertex = simplex[0].0.clone();
                for entry in simplex.iter_mut().skip(1) {
                    let shrunk = &best_vertex + &((&entry.0 - &best_vertex) * SHRINK);
                    let value = tracker.eval(&mut objective, &shrunk)?;
                    *entry = (shrunk, value);
                }
            }
        }
    }

    Ok(MinimizeResult {
        params: tracker.best_point,
        value: tracker.best_value,
        iterations,
        evaluations: tracker.evaluations,
        converged,
        history,
    })
}
