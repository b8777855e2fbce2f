//! Numeric constants shared by the simulator and the search controller.

/// Tolerances and default limits.
pub mod grover_constants {
    /// Allowed deviation of `Σ|c_i|^2` from 1.0 before the state is considered corrupt.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Amplitudes closer to zero than this carry no sign when counting marked states.
    pub const AMPLITUDE_TOLERANCE: f64 = 1e-12;
    /// Default register ceiling: 2^24 amplitudes of 16 bytes is 256 MiB.
    pub const DEFAULT_MAX_QUBITS: usize = 24;
    /// Register size from which gates are applied on the rayon pool.
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 14;
    /// Used by the Hadamard-style superposition transform.
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
    /// Used by the iteration count `floor(π/4 · √(N/M))`.
    pub const PI: f64 = std::f64::consts::PI;
}
