// src/lib.rs

//! `grover_sat` - CNF satisfiability search by amplitude amplification
//!
//! A formula is compiled into a reversible phase oracle, paired with a
//! diffuser, and run on a dense state-vector simulator. Sampling the
//! amplified distribution yields a candidate assignment, which is checked
//! classically before it is reported.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod decoder;
pub mod dimacs;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use core::{Assignment, Clause, Formula, GroverError, Literal, QubitId, RegisterLayout};
pub use operations::Gate;
pub use circuits::{Circuit, CircuitBuilder};
pub use circuits::diffuser::compile_diffuser;
pub use circuits::oracle::compile_oracle;
pub use simulation::{
    iteration_count,
    iteration_count_for,
    search,
    CancelToken,
    IterationPolicy,
    SearchConfig,
    SearchResult,
    Searcher,
};
pub use decoder::{decode, DecisionReport, LabelMap};
pub use validation::{check_normalization, validate_state, ValidationMode};

// Example 1: Search and decode
// Runs the full pipeline on a small formula with a fixed seed.
/// ```
/// use grover_sat::{decode, Formula, SearchConfig, Searcher, GroverError};
///
/// # fn main() -> Result<(), GroverError> {
/// // (x1 ∨ x2) ∧ (¬x3 ∨ ¬x4) ∧ (¬x5 ∨ x1)
/// let formula = Formula::from_clauses([vec![1, 2], vec![-3, -4], vec![-5, 1]])?;
///
/// let searcher = Searcher::new(SearchConfig { seed: Some(42), ..SearchConfig::default() });
/// let counts = searcher.search(&formula, 2048)?;
/// let report = decode(&counts, &formula, None)?;
///
/// println!("{}", counts);
/// println!("{}", report);
/// assert!(report.valid);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = ();

// Example 2: A hand-built oracle
// Marks the satisfying assignment of x1 ∧ ¬x2 and shows the phase flip.
/// ```
/// use grover_sat::{compile_oracle, Formula, RegisterLayout, GroverError};
/// use grover_sat::core::AmplitudeRegister;
/// use grover_sat::simulation::engine::SimulationEngine;
///
/// # fn main() -> Result<(), GroverError> {
/// let formula = Formula::from_clauses([vec![1], vec![-2]])?;
/// let layout = RegisterLayout::for_formula(&formula);
/// let oracle = compile_oracle(&formula)?;
/// println!("{}", oracle);
///
/// // x1 = 1, x2 = 0 is pattern 0b01
/// let start = AmplitudeRegister::basis(layout.num_qubits(), 0b01);
/// let mut engine = SimulationEngine::with_register(start, usize::MAX);
/// engine.apply_circuit(&oracle);
/// assert!((engine.state().amplitudes()[0b01].re + 1.0).abs() < 1e-12);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = ();
