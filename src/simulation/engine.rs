// src/simulation/engine.rs

use crate::circuits::Circuit;
use crate::core::constants::grover_constants::FRAC_1_SQRT_2;
use crate::core::{AmplitudeRegister, GroverError, QubitId};
use crate::operations::Gate;
use num_complex::Complex;
use rayon::prelude::*;

/// Applies gates to an owned [`AmplitudeRegister`] by in-place pair updates.
///
/// Every primitive walks the vector in blocks of `2^(t+1)` amplitudes for
/// target bit `t`; each block splits into the `t = 0` half and the `t = 1`
/// half, and the two halves are updated element-wise. Blocks are independent,
/// so above the parallel threshold they are handed to rayon.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    register: AmplitudeRegister,
    parallel: bool,
}

impl SimulationEngine {
    /// Starts a `num_qubits` register in `|0...0>`.
    ///
    /// Gate application fans out across the rayon pool when
    /// `num_qubits >= parallel_threshold`.
    pub fn init(num_qubits: usize, parallel_threshold: usize) -> Result<Self, GroverError> {
        if num_qubits >= usize::BITS as usize {
            return Err(GroverError::ResourceExceeded {
                required_qubits: num_qubits,
                max_qubits: usize::BITS as usize - 1,
            });
        }
        Ok(Self {
            register: AmplitudeRegister::zeroed(num_qubits),
            parallel: num_qubits >= parallel_threshold,
        })
    }

    /// Wraps an existing register, e.g. a prepared basis state.
    pub fn with_register(register: AmplitudeRegister, parallel_threshold: usize) -> Self {
        let parallel = register.num_qubits() >= parallel_threshold;
        Self { register, parallel }
    }

    pub fn state(&self) -> &AmplitudeRegister {
        &self.register
    }

    /// Consumes the engine, handing back the register.
    pub fn into_state(self) -> AmplitudeRegister {
        self.register
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: AmplitudeRegister) -> Result<(), GroverError> {
        if state.dim() != self.register.dim() {
            return Err(GroverError::InvalidOperation {
                message: format!(
                    "Cannot set state: provided dimension {} does not match engine dimension {}",
                    state.dim(),
                    self.register.dim()
                ),
            });
        }
        self.register = state;
        Ok(())
    }

    pub fn num_qubits(&self) -> usize {
        self.register.num_qubits()
    }

    /// Applies every gate of `circuit` in order.
    pub fn apply_circuit(&mut self, circuit: &Circuit) {
        for gate in circuit.gates() {
            self.apply_gate(gate);
        }
    }

    /// Applies a single gate.
    ///
    /// Panics if the gate names a qubit outside the register; run
    /// [`Circuit::validate`] first to turn that into an error.
    pub fn apply_gate(&mut self, gate: &Gate) {
        match gate {
            Gate::BitFlip { target } => self.bit_flip(*target),
            Gate::Superpose { targets } => self.superpose(targets),
            Gate::MultiControlledFlip { controls, target } => self.multi_controlled_flip(controls, *target),
            Gate::PhaseFlip { target } => self.phase_flip(*target),
        }
    }

    /// Swaps the amplitude pairs differing only in `target`.
    pub fn bit_flip(&mut self, target: QubitId) {
        self.multi_controlled_flip(&[], target);
    }

    /// Hadamard-style mixing on each target bit in turn.
    pub fn superpose(&mut self, targets: &[QubitId]) {
        for &target in targets {
            self.check_qubit(target);
            self.for_each_pair(target, |_, a, b| {
                let (x, y) = (*a, *b);
                *a = (x + y) * FRAC_1_SQRT_2;
                *b = (x - y) * FRAC_1_SQRT_2;
            });
        }
    }

    /// Flips `target` wherever every control bit is 1. No controls means an
    /// unconditional flip.
    pub fn multi_controlled_flip(&mut self, controls: &[QubitId], target: QubitId) {
        self.check_qubit(target);
        let mut control_mask = 0usize;
        for &control in controls {
            self.check_qubit(control);
            assert!(control != target, "{} cannot control its own flip", target);
            control_mask |= control.mask();
        }
        self.for_each_pair(target, |index, a, b| {
            if index & control_mask == control_mask {
                std::mem::swap(a, b);
            }
        });
    }

    /// Negates every amplitude whose `target` bit is 1.
    pub fn phase_flip(&mut self, target: QubitId) {
        self.check_qubit(target);
        self.for_each_pair(target, |_, _, b| {
            *b = -*b;
        });
    }

    /// Probability of each pattern of the low `num_bits` qubits, summed over
    /// every value of the remaining qubits.
    pub fn marginal_probabilities(&self, num_bits: usize) -> Vec<f64> {
        assert!(num_bits <= self.num_qubits(), "cannot marginalize onto more bits than the register holds");
        let width = 1usize << num_bits;
        let amplitudes = self.register.amplitudes();
        let accumulate = |mut acc: Vec<f64>, block: &[Complex<f64>]| {
            for (slot, amp) in acc.iter_mut().zip(block) {
                *slot += amp.norm_sqr();
            }
            acc
        };
        if self.parallel {
            amplitudes
                .par_chunks(width)
                .fold(|| vec![0.0; width], accumulate)
                .reduce(
                    || vec![0.0; width],
                    |mut left, right| {
                        for (l, r) in left.iter_mut().zip(right) {
                            *l += r;
                        }
                        left
                    },
                )
        } else {
            amplitudes.chunks(width).fold(vec![0.0; width], accumulate)
        }
    }

    fn check_qubit(&self, qubit: QubitId) {
        assert!(
            qubit.0 < self.num_qubits(),
            "{} lies outside a {}-qubit register",
            qubit,
            self.num_qubits()
        );
    }

    /// Calls `f(index0, amp0, amp1)` for every pair of basis states that differ
    /// only in `target`, where `index0` is the index with the target bit clear.
    fn for_each_pair<F>(&mut self, target: QubitId, f: F)
    where
        F: Fn(usize, &mut Complex<f64>, &mut Complex<f64>) + Sync + Send,
    {
        let half = target.mask();
        let stride = half << 1;
        let amplitudes = self.register.amplitudes_mut();
        if self.parallel {
            amplitudes
                .par_chunks_mut(stride)
                .enumerate()
                .for_each(|(block, chunk)| update_block(block * stride, chunk, half, &f));
        } else {
            for (block, chunk) in amplitudes.chunks_mut(stride).enumerate() {
                update_block(block * stride, chunk, half, &f);
            }
        }
    }
}

fn update_block<F>(base: usize, chunk: &mut [Complex<f64>], half: usize, f: &F)
where
    F: Fn(usize, &mut Complex<f64>, &mut Complex<f64>),
{
    let (low, high) = chunk.split_at_mut(half);
    for (offset, (a, b)) in low.iter_mut().zip(high.iter_mut()).enumerate() {
        f(base + offset, a, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use num_traits::Zero;

    const TEST_TOLERANCE: f64 = 1e-12;

    fn q(i: usize) -> QubitId {
        QubitId(i)
    }

    fn assert_complex_vec_approx_equal(actual: &[Complex<f64>], expected: &[Complex<f64>], context: &str) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                i,
                actual[i],
                expected[i],
                context
            );
        }
    }

    fn real(values: &[f64]) -> Vec<Complex<f64>> {
        values.iter().map(|&v| Complex::new(v, 0.0)).collect()
    }

    #[test]
    fn test_bit_flip_moves_basis_state() -> Result<(), GroverError> {
        let mut engine = SimulationEngine::init(3, usize::MAX)?;
        engine.bit_flip(q(1));
        assert_complex_vec_approx_equal(
            engine.state().amplitudes(),
            &real(&[0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            "X on q1 of |000>",
        );
        Ok(())
    }

    #[test]
    fn test_superpose_and_undo() -> Result<(), GroverError> {
        let mut engine = SimulationEngine::init(2, usize::MAX)?;
        engine.superpose(&[q(0), q(1)]);
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &real(&[0.5, 0.5, 0.5, 0.5]), "H⊗H |00>");
        engine.superpose(&[q(0), q(1)]);
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &real(&[1.0, 0.0, 0.0, 0.0]), "H⊗H twice");
        Ok(())
    }

    #[test]
    fn test_superpose_on_one_state() -> Result<(), GroverError> {
        let mut engine = SimulationEngine::init(1, usize::MAX)?;
        engine.set_state(AmplitudeRegister::basis(1, 1))?;
        engine.superpose(&[q(0)]);
        let s = FRAC_1_SQRT_2;
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &real(&[s, -s]), "H|1>");
        Ok(())
    }

    #[test]
    fn test_multi_controlled_flip_requires_all_controls() -> Result<(), GroverError> {
        // |011> (q0 = q1 = 1) with controls q0, q1 flips q2 -> |111>
        let mut engine = SimulationEngine::with_register(AmplitudeRegister::basis(3, 0b011), usize::MAX);
        engine.multi_controlled_flip(&[q(0), q(1)], q(2));
        assert!((engine.state().probability(0b111) - 1.0).abs() < TEST_TOLERANCE);

        // |001> has q1 = 0, so nothing happens
        let mut engine = SimulationEngine::with_register(AmplitudeRegister::basis(3, 0b001), usize::MAX);
        engine.multi_controlled_flip(&[q(0), q(1)], q(2));
        assert!((engine.state().probability(0b001) - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_single_control_is_cnot() -> Result<(), GroverError> {
        let mut engine = SimulationEngine::init(2, usize::MAX)?;
        engine.superpose(&[q(0)]);
        engine.multi_controlled_flip(&[q(0)], q(1));
        let s = FRAC_1_SQRT_2;
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &real(&[s, 0.0, 0.0, s]), "Bell state");
        Ok(())
    }

    #[test]
    fn test_phase_flip_negates_set_bit() -> Result<(), GroverError> {
        let mut engine = SimulationEngine::init(2, usize::MAX)?;
        engine.superpose(&[q(0), q(1)]);
        engine.phase_flip(q(1));
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &real(&[0.5, 0.5, -0.5, -0.5]), "Z on q1");
        Ok(())
    }

    #[test]
    fn test_parallel_path_matches_sequential() -> Result<(), GroverError> {
        let circuit = CircuitBuilder::new()
            .add_gate(Gate::superpose([q(0), q(1), q(2), q(3)]))
            .add_gate(Gate::multi_controlled_flip([q(0), q(2)], q(4)))
            .add_gate(Gate::phase_flip(q(4)))
            .add_gate(Gate::bit_flip(q(1)))
            .add_gate(Gate::multi_controlled_flip([q(1), q(3)], q(0)))
            .add_gate(Gate::superpose([q(2)]))
            .build();
        let mut sequential = SimulationEngine::init(5, usize::MAX)?;
        let mut parallel = SimulationEngine::init(5, 0)?;
        sequential.apply_circuit(&circuit);
        parallel.apply_circuit(&circuit);
        assert_complex_vec_approx_equal(
            parallel.state().amplitudes(),
            sequential.state().amplitudes(),
            "rayon vs sequential",
        );
        assert_eq!(parallel.marginal_probabilities(2).len(), 4);
        for (p, s) in parallel.marginal_probabilities(3).iter().zip(sequential.marginal_probabilities(3)) {
            assert!((p - s).abs() < TEST_TOLERANCE);
        }
        Ok(())
    }

    #[test]
    fn test_marginal_sums_over_high_bits() -> Result<(), GroverError> {
        // 0.6|00> + 0.8|11>: marginal on q0 is [0.36, 0.64]
        let state = AmplitudeRegister::from_amplitudes(vec![
            Complex::new(0.6, 0.0),
            Complex::zero(),
            Complex::zero(),
            Complex::new(0.8, 0.0),
        ]);
        let engine = SimulationEngine::with_register(state, usize::MAX);
        let marginal = engine.marginal_probabilities(1);
        assert!((marginal[0] - 0.36).abs() < TEST_TOLERANCE);
        assert!((marginal[1] - 0.64).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_target_panics() {
        let mut engine = SimulationEngine::init(2, usize::MAX).unwrap();
        engine.bit_flip(q(2));
    }
}
