// src/core/state.rs

use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt;

/// Dense amplitude vector over every basis state of a `num_qubits`-wide register.
///
/// Index `k` holds the amplitude of the basis state whose bit `q` is the value
/// of qubit `q`. Gates keep `Σ|c_k|^2 = 1`; nothing here renormalizes.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeRegister {
    amplitudes: Vec<Complex<f64>>,
    num_qubits: usize,
}

impl AmplitudeRegister {
    /// Allocates `2^num_qubits` amplitudes in the all-zero basis state.
    ///
    /// Callers size-check the register first (see `RegisterLayout::check_ceiling`).
    pub fn zeroed(num_qubits: usize) -> Self {
        Self::basis(num_qubits, 0)
    }

    /// Allocates the basis state `|index>`.
    pub fn basis(num_qubits: usize, index: usize) -> Self {
        let dim = 1usize << num_qubits;
        assert!(index < dim, "basis index {} outside a {}-qubit register", index, num_qubits);
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[index] = Complex::one();
        Self { amplitudes, num_qubits }
    }

    /// Wraps an existing vector; its length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex<f64>>) -> Self {
        assert!(amplitudes.len().is_power_of_two(), "amplitude vector length must be a power of two");
        let num_qubits = amplitudes.len().trailing_zeros() as usize;
        Self { amplitudes, num_qubits }
    }

    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of basis states, `2^num_qubits`.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// `Σ|c_k|^2`
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Squared magnitude of a single basis state.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map(|c| c.norm_sqr()).unwrap_or(0.0)
    }
}

impl fmt::Display for AmplitudeRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amplitudes[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}
