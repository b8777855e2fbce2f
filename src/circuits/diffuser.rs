// src/circuits/diffuser.rs

//! Inversion about the mean over the variable register.

use super::{Circuit, CircuitBuilder};
use crate::core::{GroverError, QubitId};
use crate::operations::Gate;

/// Compiles the diffuser for an `n`-bit variable register (qubits `0..n`).
///
/// Sequence: `H⊗n · X⊗n · (H · MCX · H on the last bit) · X⊗n · H⊗n`.
/// Conjugating the multi-controlled flip by `superpose` on its target turns it
/// into a phase flip of `|1...1>`, which the surrounding bit flips move onto
/// `|0...0>`. The result is `I − 2|s><s|`, inversion about the mean up to a
/// global phase of −1.
///
/// Rejects `n < 2`; a single variable has no control bit to condition on.
pub fn compile_diffuser(n: usize) -> Result<Circuit, GroverError> {
    if n < 2 {
        return Err(GroverError::degenerate(format!(
            "diffuser needs at least 2 variable qubits, got {}",
            n
        )));
    }
    let vars: Vec<QubitId> = (0..n).map(QubitId).collect();
    let last = vars[n - 1];
    let controls = vars[..n - 1].to_vec();

    Ok(CircuitBuilder::new()
        .add_gate(Gate::superpose(vars.iter().copied()))
        .add_gates(vars.iter().map(|&q| Gate::bit_flip(q)))
        .add_gate(Gate::superpose([last]))
        .add_gate(Gate::multi_controlled_flip(controls, last))
        .add_gate(Gate::superpose([last]))
        .add_gates(vars.iter().map(|&q| Gate::bit_flip(q)))
        .add_gate(Gate::superpose(vars.iter().copied()))
        .build())
}

/// Reflection about the uniform state for any `n >= 1`.
///
/// For one variable, `2|+><+| − I` is exactly a bit flip, so the degenerate
/// case gets that single gate instead of a diffuser.
pub fn reflection_about_mean(n: usize) -> Result<Circuit, GroverError> {
    match n {
        0 => Err(GroverError::degenerate("cannot reflect an empty variable register")),
        1 => Ok(CircuitBuilder::new().add_gate(Gate::bit_flip(QubitId(0))).build()),
        _ => compile_diffuser(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::engine::SimulationEngine;

    const TOL: f64 = 1e-10;

    #[test]
    fn test_rejects_small_registers() {
        assert!(matches!(compile_diffuser(0), Err(GroverError::DegenerateInput { .. })));
        assert!(matches!(compile_diffuser(1), Err(GroverError::DegenerateInput { .. })));
        assert!(matches!(reflection_about_mean(0), Err(GroverError::DegenerateInput { .. })));
        assert_eq!(reflection_about_mean(1).map(|c| c.len()), Ok(1));
    }

    #[test]
    fn test_uniform_state_is_fixed_up_to_phase() -> Result<(), GroverError> {
        let n = 3;
        let diffuser = compile_diffuser(n)?;
        let mut engine = SimulationEngine::init(n, usize::MAX)?;
        engine.superpose(&(0..n).map(QubitId).collect::<Vec<_>>());
        let before = engine.state().clone();
        engine.apply_circuit(&diffuser);
        // I - 2|s><s| maps |s> to -|s>
        for (a, b) in engine.state().amplitudes().iter().zip(before.amplitudes()) {
            assert!((a + b).norm() < TOL, "expected -|s>, got {} vs {}", a, b);
        }
        Ok(())
    }

    #[test]
    fn test_inverts_about_mean() -> Result<(), GroverError> {
        // Start from |s> with |101> phase-flipped, as after one oracle call.
        let n = 3;
        let marked = 0b101;
        let mut engine = SimulationEngine::init(n, usize::MAX)?;
        engine.superpose(&(0..n).map(QubitId).collect::<Vec<_>>());
        let mut amps = engine.state().amplitudes().to_vec();
        amps[marked] = -amps[marked];
        let mean = amps.iter().sum::<num_complex::Complex<f64>>() / amps.len() as f64;
        let expected: Vec<_> = amps.iter().map(|a| mean * 2.0 - a).collect();

        let mut engine = SimulationEngine::with_register(
            crate::core::AmplitudeRegister::from_amplitudes(amps),
            usize::MAX,
        );
        engine.apply_circuit(&compile_diffuser(n)?);
        for (actual, wanted) in engine.state().amplitudes().iter().zip(&expected) {
            // global phase of -1
            assert!((actual + wanted).norm() < TOL, "got {}, expected {}", actual, -wanted);
        }
        Ok(())
    }

    #[test]
    fn test_applying_twice_is_identity() -> Result<(), GroverError> {
        let n = 4;
        let diffuser = compile_diffuser(n)?;
        let mut engine = SimulationEngine::with_register(crate::core::AmplitudeRegister::basis(n, 0b0110), usize::MAX);
        engine.apply_circuit(&diffuser);
        engine.apply_circuit(&diffuser);
        assert!((engine.state().probability(0b0110) - 1.0).abs() < TOL);
        Ok(())
    }
}
