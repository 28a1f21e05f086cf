//! # Lumiq VQE: Variational Ground-State Search
//!
//! The optimization half of the lumiq workspace:
//!
//! - **Executor**: the injected capability mapping (parameters, measurement
//!   basis) to sampled outcomes, logical or dual-rail encoded
//! - **Evaluator**: one scalar energy per parameter vector, one executor
//!   call per distinct measurement basis, optional per-call deadline and
//!   rayon fan-out over independent basis groups
//! - **Minimizer**: Nelder–Mead direct search, tolerant of the stochastic
//!   objective a sampling executor produces
//! - **Driver**: the iterate-until-converged loop with seedable initial
//!   parameters and a structured result
//! - **Sim**: a seedable statevector reference executor (logical and
//!   dual-rail) for tests, benches, and demos
//!
//! ## Quick Start
//!
//! ```
//! use lumiq_core::Hamiltonian;
//! use lumiq_vqe::{SamplerExecutor, Vqe, VqeConfig};
//!
//! let hamiltonian = Hamiltonian::h2_minimal();
//! let executor = SamplerExecutor::new(2, 2048).with_seed(7);
//!
//! let config = VqeConfig::default()
//!     .with_max_iterations(20)
//!     .with_seed(7);
//! let result = Vqe::new(hamiltonian, executor, 4)
//!     .with_config(config)
//!     .run()
//!     .unwrap();
//!
//! assert!(result.is_valid());
//! ```

pub mod evaluator;
pub mod minimizer;
pub mod sim;
pub mod vqe;

// Re-exports
pub use evaluator::{
    total_energy, total_energy_parallel, EvaluatorConfig, Executor, OutcomeEncoding,
};
pub use minimizer::{
    minimize, MinimizeResult, NelderMeadConfig, DEFAULT_INITIAL_STEP, DEFAULT_MAX_ITER,
    DEFAULT_TOLERANCE,
};
pub use sim::{
    ansatz_params, DualRailExecutor, SamplerExecutor, Statevector, DEFAULT_SHOTS,
};
pub use vqe::{Vqe, VqeConfig, VqeResult, DEFAULT_VQE_MAX_ITER, DEFAULT_VQE_TOLERANCE};
