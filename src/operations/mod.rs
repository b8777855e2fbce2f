// src/operations/mod.rs

//! Gate records understood by the simulation engine.
//!
//! Each variant is a tagged record (kind, targets, controls). Compilers emit
//! these as plain values; nothing here touches an amplitude vector.

use crate::core::QubitId;

/// A single unitary applied to the amplitude register.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Swaps every amplitude pair differing only in `target`. Self-inverse.
    ///
    /// Analogy: X gate.
    BitFlip {
        target: QubitId,
    },

    /// Applies `(a, b) → ((a+b)/√2, (a−b)/√2)` independently on each target bit.
    ///
    /// Analogy: a layer of Hadamard gates.
    Superpose {
        targets: Vec<QubitId>,
    },

    /// Flips `target` on every basis state whose control bits are all 1.
    ///
    /// An empty control set is an unconditional bit flip and a single control
    /// is a CNOT, so this one variant covers every controlled-flip arity.
    /// Self-inverse.
    MultiControlledFlip {
        controls: Vec<QubitId>,
        target: QubitId,
    },

    /// Negates the amplitude of every basis state with `target` set.
    ///
    /// Analogy: Z gate.
    PhaseFlip {
        target: QubitId,
    },
}

impl Gate {
    pub fn bit_flip(target: QubitId) -> Self {
        Gate::BitFlip { target }
    }

    pub fn superpose<I: IntoIterator<Item = QubitId>>(targets: I) -> Self {
        Gate::Superpose { targets: targets.into_iter().collect() }
    }

    pub fn multi_controlled_flip<I: IntoIterator<Item = QubitId>>(controls: I, target: QubitId) -> Self {
        Gate::MultiControlledFlip { controls: controls.into_iter().collect(), target }
    }

    pub fn phase_flip(target: QubitId) -> Self {
        Gate::PhaseFlip { target }
    }

    /// All qubits named by this gate, controls first.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::BitFlip { target } | Gate::PhaseFlip { target } => vec![*target],
            Gate::Superpose { targets } => targets.clone(),
            Gate::MultiControlledFlip { controls, target } => {
                let mut qubits = controls.clone();
                qubits.push(*target);
                qubits
            }
        }
    }

    /// The inverse gate. Every primitive here is its own inverse.
    pub fn inverse(&self) -> Gate {
        self.clone()
    }

    /// Short symbol used when drawing circuits.
    pub fn symbol(&self) -> &'static str {
        match self {
            Gate::BitFlip { .. } => "X",
            Gate::Superpose { .. } => "H",
            Gate::MultiControlledFlip { .. } => "X",
            Gate::PhaseFlip { .. } => "Z",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involved_qubits_lists_controls_then_target() {
        let gate = Gate::multi_controlled_flip([QubitId(0), QubitId(2)], QubitId(5));
        assert_eq!(gate.involved_qubits(), vec![QubitId(0), QubitId(2), QubitId(5)]);
        assert_eq!(gate.inverse(), gate);
    }
}
