// src/decoder/mod.rs

//! Turns sampled counts into a labelled, checked assignment.

use crate::core::{Assignment, Formula, GroverError};
use crate::simulation::SearchResult;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Human-readable names for 1-based variable indices. May be partial and may
/// name indices the formula never uses.
pub type LabelMap = HashMap<usize, String>;

/// Label used for a variable the label map does not cover.
pub fn default_label(var: usize) -> String {
    format!("Var_{}", var)
}

/// One labelled variable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub var: usize,
    pub label: String,
    pub value: bool,
}

/// The decoded answer of a search run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionReport {
    /// Every clause holds under `assignment`.
    pub valid: bool,
    /// In ascending variable order.
    pub decisions: Vec<Decision>,
    #[serde(skip)]
    pub assignment: Assignment,
    /// Variable index → value, as sampled.
    pub raw_solution: BTreeMap<usize, bool>,
    /// Shots that produced this assignment.
    pub count: usize,
    pub total_shots: usize,
}

impl DecisionReport {
    /// Value recorded under `label`.
    pub fn decision(&self, label: &str) -> Option<bool> {
        self.decisions.iter().find(|d| d.label == label).map(|d| d.value)
    }

    /// Label → value view.
    pub fn as_map(&self) -> BTreeMap<&str, bool> {
        self.decisions.iter().map(|d| (d.label.as_str(), d.value)).collect()
    }
}

impl fmt::Display for DecisionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution Valid: {}", self.valid)?;
        writeln!(f, "Observed {} of {} shots", self.count, self.total_shots)?;
        writeln!(f, "Decisions:")?;
        for decision in &self.decisions {
            writeln!(f, "- {}: {}", decision.label, if decision.value { "✅" } else { "❌" })?;
        }
        Ok(())
    }
}

/// Picks the most frequent outcome of `result` (lowest pattern on ties),
/// checks it against `formula` and labels it.
///
/// Sampled patterns are `u64`, so formulas above 64 variables are rejected
/// with `ResourceExceeded`.
pub fn decode(result: &SearchResult, formula: &Formula, labels: Option<&LabelMap>) -> Result<DecisionReport, GroverError> {
    let max_vars = u64::BITS as usize;
    if formula.num_vars() > max_vars {
        return Err(GroverError::ResourceExceeded { required_qubits: formula.num_vars(), max_qubits: max_vars });
    }
    if result.num_vars() != formula.num_vars() {
        return Err(GroverError::malformed(format!(
            "counts cover {} variable(s) but the formula has {}",
            result.num_vars(),
            formula.num_vars()
        )));
    }
    let (pattern, count) = result
        .most_frequent()
        .ok_or_else(|| GroverError::degenerate("no samples to decode"))?;
    let mut report = decode_pattern(pattern, formula, labels);
    report.count = count;
    report.total_shots = result.total_shots();
    Ok(report)
}

/// Labels and checks a single variable-register pattern.
pub fn decode_pattern(pattern: u64, formula: &Formula, labels: Option<&LabelMap>) -> DecisionReport {
    let assignment = Assignment::from_pattern(pattern, formula.num_vars());
    let valid = formula.evaluate(&assignment);
    let decisions = assignment
        .iter()
        .map(|(var, value)| Decision {
            var,
            label: labels.and_then(|l| l.get(&var).cloned()).unwrap_or_else(|| default_label(var)),
            value,
        })
        .collect();
    let raw_solution = assignment.iter().collect();
    DecisionReport { valid, decisions, assignment, raw_solution, count: 0, total_shots: 0 }
}
