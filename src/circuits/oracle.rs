// src/circuits/oracle.rs

//! Compiles a CNF formula into a phase oracle.
//!
//! Each clause `i` gets its own ancilla. Flipping the bits of the clause's
//! positive literals makes "every literal false" read as "every control is 1",
//! so a multi-controlled flip sets the ancilla exactly when the clause is
//! violated; a trailing bit flip leaves the ancilla at 1 iff the clause holds.
//! The output bit is then flipped when every ancilla is 1, phase-flipped,
//! and everything above is uncomputed in reverse so only the phase survives.

use super::{Circuit, CircuitBuilder};
use crate::core::{Clause, Formula, GroverError, Literal, RegisterLayout};
use crate::operations::Gate;
use log::debug;

/// Builds the oracle for `formula` over the register described by
/// [`RegisterLayout::for_formula`].
///
/// Applied to `|a>|0...0>|0>`, the circuit returns `−|a>|0...0>|0>` when the
/// variable bits `a` satisfy every clause and `|a>|0...0>|0>` otherwise.
pub fn compile_oracle(formula: &Formula) -> Result<Circuit, GroverError> {
    let layout = RegisterLayout::for_formula(formula);

    let mut compute = Circuit::new();
    for (index, clause) in formula.clauses().iter().enumerate() {
        compute.add_gates(clause_gates(&layout, index, clause));
    }

    let ancillas = layout.ancilla_qubits();
    let output = layout.output();
    let mark = Gate::multi_controlled_flip(ancillas, output);

    let oracle = CircuitBuilder::new()
        .append(&compute)
        .add_gate(mark.clone())
        .add_gate(Gate::phase_flip(output))
        .add_gate(mark.inverse())
        .append(&compute.inverse())
        .build();

    debug!(
        "compiled oracle: {} clauses, {} qubits, {} gates",
        formula.num_clauses(),
        layout.num_qubits(),
        oracle.len()
    );
    Ok(oracle)
}

/// Gates that leave ancilla `index` at 1 iff `clause` is satisfied, with the
/// variable register restored.
fn clause_gates(layout: &RegisterLayout, index: usize, clause: &Clause) -> Vec<Gate> {
    let ancilla = layout.ancilla(index);

    // x ∨ ¬x ∨ ... always holds
    if clause.is_tautology() {
        return vec![Gate::bit_flip(ancilla)];
    }

    let literals = distinct_literals(clause);
    let polarity_flips: Vec<Gate> = literals
        .iter()
        .filter(|lit| lit.is_positive())
        .map(|lit| Gate::bit_flip(layout.variable(lit.var())))
        .collect();
    let controls = literals.iter().map(|lit| layout.variable(lit.var()));

    let mut gates = polarity_flips.clone();
    gates.push(Gate::multi_controlled_flip(controls, ancilla));
    gates.extend(polarity_flips);
    gates.push(Gate::bit_flip(ancilla));
    gates
}

/// Literals in first-seen order with repeats removed.
fn distinct_literals(clause: &Clause) -> Vec<Literal> {
    let mut seen = Vec::with_capacity(clause.len());
    for lit in clause.literals() {
        if !seen.contains(lit) {
            seen.push(*lit);
        }
    }
    seen
}
