// src/circuits/mod.rs

//! Ordered gate sequences and the compilers that produce them.
//!
//! A [`Circuit`] is an immutable value: the oracle and diffuser compilers
//! return one, the search controller replays it against an amplitude register.

pub mod diffuser;
pub mod oracle;

use crate::core::{GroverError, QubitId};
use crate::operations::Gate;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// An ordered sequence of gates over a set of qubits.
#[derive(Clone, PartialEq, Eq)]
pub struct Circuit {
    /// Every qubit touched by at least one gate.
    qubits: BTreeSet<QubitId>,
    /// Application order matters; gates do not commute in general.
    gates: Vec<Gate>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self { qubits: BTreeSet::new(), gates: Vec::new() }
    }

    /// Appends a gate, registering the qubits it touches.
    pub fn add_gate(&mut self, gate: Gate) {
        self.qubits.extend(gate.involved_qubits());
        self.gates.push(gate);
    }

    pub fn add_gates<I>(&mut self, gates: I)
    where
        I: IntoIterator<Item = Gate>,
    {
        for gate in gates {
            self.add_gate(gate);
        }
    }

    pub fn qubits(&self) -> &BTreeSet<QubitId> {
        &self.qubits
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Smallest register width able to hold every qubit used here.
    pub fn min_width(&self) -> usize {
        self.qubits.iter().next_back().map(|q| q.0 + 1).unwrap_or(0)
    }

    /// The reversed sequence of inverted gates.
    pub fn inverse(&self) -> Circuit {
        let mut inverse = Circuit::new();
        inverse.add_gates(self.gates.iter().rev().map(Gate::inverse));
        inverse
    }

    /// Checks that every gate fits a `num_qubits`-wide register and that no
    /// controlled flip uses its target (or a repeated qubit) as a control.
    pub fn validate(&self, num_qubits: usize) -> Result<(), GroverError> {
        if let Some(q) = self.qubits.iter().find(|q| q.0 >= num_qubits) {
            return Err(GroverError::InvalidOperation {
                message: format!("{} lies outside a {}-qubit register", q, num_qubits),
            });
        }
        for gate in &self.gates {
            match gate {
                Gate::MultiControlledFlip { controls, target } => {
                    if controls.contains(target) {
                        return Err(GroverError::InvalidOperation {
                            message: format!("{} is both control and target of a controlled flip", target),
                        });
                    }
                    let distinct: BTreeSet<_> = controls.iter().collect();
                    if distinct.len() != controls.len() {
                        return Err(GroverError::InvalidOperation {
                            message: "controlled flip lists a control qubit twice".to_string(),
                        });
                    }
                }
                Gate::Superpose { targets } => {
                    let distinct: BTreeSet<_> = targets.iter().collect();
                    if distinct.len() != targets.len() {
                        return Err(GroverError::InvalidOperation {
                            message: "superpose lists a target qubit twice".to_string(),
                        });
                    }
                }
                Gate::BitFlip { .. } | Gate::PhaseFlip { .. } => {}
            }
        }
        Ok(())
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Method-chaining helper for assembling a [`Circuit`].
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    pub fn add_gate(mut self, gate: Gate) -> Self {
        self.circuit.add_gate(gate);
        self
    }

    pub fn add_gates<I>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        self.circuit.add_gates(gates);
        self
    }

    /// Appends every gate of another circuit.
    pub fn append(mut self, other: &Circuit) -> Self {
        self.circuit.add_gates(other.gates().iter().cloned());
        self
    }

    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gates.is_empty() {
            return writeln!(f, "Circuit[0 gates on 0 qubits]");
        }

        let gates = &self.gates;
        let num_gates = gates.len();

        let rows: Vec<QubitId> = self.qubits.iter().copied().collect();
        let num_rows = rows.len();
        let row_of: HashMap<QubitId, usize> = rows.iter().enumerate().map(|(i, q)| (*q, i)).collect();

        let label_width = rows.iter().map(|q| q.to_string().len()).max().unwrap_or(0);
        let label_padding = " ".repeat(label_width + 2);

        const GATE_WIDTH: usize = 7;
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        let mut grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_gates]; num_rows];
        // v_connect[row][t] is the connector drawn between `row` and `row + 1`
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_gates]; num_rows];

        fn format_gate(symbol: &str) -> String {
            let len = symbol.chars().count();
            if len >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let pad = GATE_WIDTH - len;
                let pre = pad / 2;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre), symbol, H_WIRE.to_string().repeat(pad - pre))
            }
        }

        for (t, gate) in gates.iter().enumerate() {
            match gate {
                Gate::BitFlip { target } | Gate::PhaseFlip { target } => {
                    grid[row_of[target]][t] = format_gate(gate.symbol());
                }
                Gate::Superpose { targets } => {
                    for target in targets {
                        grid[row_of[target]][t] = format_gate(gate.symbol());
                    }
                }
                Gate::MultiControlledFlip { controls, target } => {
                    let target_row = row_of[target];
                    grid[target_row][t] = format_gate(gate.symbol());
                    let mut r_min = target_row;
                    let mut r_max = target_row;
                    for control in controls {
                        let r = row_of[control];
                        grid[r][t] = format_gate("@");
                        r_min = r_min.min(r);
                        r_max = r_max.max(r);
                    }
                    for row in v_connect.iter_mut().take(r_max).skip(r_min) {
                        row[t] = V_WIRE;
                    }
                }
            }
        }

        writeln!(f, "Circuit[{} gates on {} qubits]", num_gates, num_rows)?;
        for r in 0..num_rows {
            let label = format!("{}: ", rows[r]);
            write!(f, "{:<width$}", label, width = label_width + 2)?;
            writeln!(f, "{}", grid[r].join(""))?;

            if r < num_rows - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_gates {
                    let pad = GATE_WIDTH - 1;
                    let pre = pad / 2;
                    write!(f, "{}{}{}", " ".repeat(pre), v_connect[r][t], " ".repeat(pad - pre))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(i: usize) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn test_builder_tracks_qubits_and_order() {
        let circuit = CircuitBuilder::new()
            .add_gate(Gate::bit_flip(q(2)))
            .add_gate(Gate::multi_controlled_flip([q(0), q(2)], q(4)))
            .build();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.min_width(), 5);
        assert_eq!(circuit.qubits().len(), 3);
        assert_eq!(circuit.gates()[0], Gate::bit_flip(q(2)));
    }

    #[test]
    fn test_inverse_reverses_order() {
        let circuit = CircuitBuilder::new()
            .add_gate(Gate::superpose([q(0)]))
            .add_gate(Gate::phase_flip(q(1)))
            .build();
        let inverse = circuit.inverse();
        assert_eq!(inverse.gates(), &[Gate::phase_flip(q(1)), Gate::superpose([q(0)])]);
    }

    #[test]
    fn test_validate_rejects_out_of_range_and_target_as_control() {
        let too_wide = CircuitBuilder::new().add_gate(Gate::bit_flip(q(3))).build();
        assert!(matches!(too_wide.validate(3), Err(GroverError::InvalidOperation { .. })));
        assert!(too_wide.validate(4).is_ok());

        let self_controlled = CircuitBuilder::new()
            .add_gate(Gate::multi_controlled_flip([q(0), q(1)], q(1)))
            .build();
        assert!(matches!(self_controlled.validate(4), Err(GroverError::InvalidOperation { .. })));
    }

    #[test]
    fn test_display_draws_controls() {
        let circuit = CircuitBuilder::new()
            .add_gate(Gate::multi_controlled_flip([q(0)], q(1)))
            .build();
        let drawing = circuit.to_string();
        assert!(drawing.starts_with("Circuit[1 gates on 2 qubits]"));
        assert!(drawing.contains("───@───"));
        assert!(drawing.contains("───X───"));
        assert!(drawing.contains('│'));
    }
}
