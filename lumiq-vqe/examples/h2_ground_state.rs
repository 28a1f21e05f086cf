//! Ground-state search for minimal-basis H₂ over a dual-rail executor.
//!
//! Run with: cargo run --example h2_ground_state

use lumiq_core::Hamiltonian;
use lumiq_vqe::{ansatz_params, DualRailExecutor, Vqe, VqeConfig, DEFAULT_SHOTS};

fn main() {
    let hamiltonian = Hamiltonian::h2_minimal();
    let n_qubits = hamiltonian.n_qubits();

    // 2% photon loss per qubit; postselection conditions it away
    let executor = DualRailExecutor::new(n_qubits, DEFAULT_SHOTS)
        .with_seed(42)
        .with_loss(0.02);

    let config = VqeConfig::default()
        .with_max_iterations(80)
        .with_seed(42)
        .with_verbose();

    let result = Vqe::new(hamiltonian, executor, ansatz_params(n_qubits))
        .with_config(config)
        .run()
        .expect("VQE run failed");

    println!();
    println!("best energy:   {:.6} Ha", result.energy);
    println!("iterations:    {}", result.iterations);
    println!("evaluations:   {}", result.energy_evaluations);
    println!("converged:     {}", result.converged);
    println!("parameters:    {:?}", result.params);
}
