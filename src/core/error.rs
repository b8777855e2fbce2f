//! Error handling logic

use std::fmt;

/// Position of a single bit in the simulated register.
///
/// Qubit `q` corresponds to bit `q` of a basis-state index, so qubit 0 is the
/// least significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl QubitId {
    /// Bit mask selecting this qubit inside a basis-state index.
    pub fn mask(self) -> usize {
        1usize << self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Errors raised while compiling or running a search.
///
/// Everything except `Incoherence` and `Aborted` is detected before the
/// amplitude vector is allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroverError {
    /// The formula breaks a structural rule: empty clause, zero literal,
    /// or a declared count that disagrees with the clauses present.
    MalformedFormula {
        /// MalformedFormula failure message
        message: String,
    },

    /// The register would need more qubits than the configured ceiling.
    ResourceExceeded {
        /// `num_vars + num_clauses + 1`
        required_qubits: usize,
        /// Configured ceiling
        max_qubits: usize,
    },

    /// The input is well formed but too small to build a meaningful circuit.
    DegenerateInput {
        /// DegenerateInput failure message
        message: String,
    },

    /// A gate references a qubit outside the register or reuses its target as a control.
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },

    /// The amplitude vector drifted away from unit norm.
    Incoherence {
        /// Incoherence failure message
        message: String,
    },

    /// The caller cancelled the search.
    Aborted {
        /// Amplification rounds finished before the cancellation was seen
        completed_iterations: usize,
    },
}

impl GroverError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        GroverError::MalformedFormula { message: message.into() }
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        GroverError::DegenerateInput { message: message.into() }
    }
}

impl fmt::Display for GroverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroverError::MalformedFormula { message } => write!(f, "Malformed formula: {}", message),
            GroverError::ResourceExceeded { required_qubits, max_qubits } => write!(
                f,
                "Resource ceiling exceeded: register needs {} qubits, limit is {}",
                required_qubits, max_qubits
            ),
            GroverError::DegenerateInput { message } => write!(f, "Degenerate input: {}", message),
            GroverError::InvalidOperation { message } => write!(f, "Invalid Operation: {}", message),
            GroverError::Incoherence { message } => write!(f, "Incoherence Violation: {}", message),
            GroverError::Aborted { completed_iterations } => {
                write!(f, "Search aborted after {} iteration(s)", completed_iterations)
            }
        }
    }
}

impl std::error::Error for GroverError {}
