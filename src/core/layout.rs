// src/core/layout.rs

use super::error::{GroverError, QubitId};
use super::formula::Formula;

/// Maps the three logical registers onto contiguous qubit ranges:
/// variables `[0, n)`, one ancilla per clause `[n, n + m)`, then the output flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterLayout {
    num_vars: usize,
    num_clauses: usize,
}

impl RegisterLayout {
    pub fn new(num_vars: usize, num_clauses: usize) -> Self {
        Self { num_vars, num_clauses }
    }

    pub fn for_formula(formula: &Formula) -> Self {
        Self::new(formula.num_vars(), formula.num_clauses())
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn num_clauses(&self) -> usize {
        self.num_clauses
    }

    /// Total register width `Q = n + m + 1`.
    pub fn num_qubits(&self) -> usize {
        self.num_vars + self.num_clauses + 1
    }

    /// Qubit holding the 1-based variable `var`.
    pub fn variable(&self, var: usize) -> QubitId {
        debug_assert!(var >= 1 && var <= self.num_vars);
        QubitId(var - 1)
    }

    /// Ancilla for the 0-based clause index.
    pub fn ancilla(&self, clause: usize) -> QubitId {
        debug_assert!(clause < self.num_clauses);
        QubitId(self.num_vars + clause)
    }

    pub fn output(&self) -> QubitId {
        QubitId(self.num_vars + self.num_clauses)
    }

    pub fn variable_qubits(&self) -> Vec<QubitId> {
        (0..self.num_vars).map(QubitId).collect()
    }

    pub fn ancilla_qubits(&self) -> Vec<QubitId> {
        (self.num_vars..self.num_vars + self.num_clauses).map(QubitId).collect()
    }

    /// Mask selecting the variable bits of a basis-state index.
    pub fn variable_mask(&self) -> usize {
        (1usize << self.num_vars) - 1
    }

    /// Rejects layouts whose `2^Q` amplitudes would exceed the ceiling.
    pub fn check_ceiling(&self, max_qubits: usize) -> Result<(), GroverError> {
        let required_qubits = self.num_qubits();
        if required_qubits > max_qubits || required_qubits >= usize::BITS as usize {
            return Err(GroverError::ResourceExceeded { required_qubits, max_qubits });
        }
        Ok(())
    }
}
