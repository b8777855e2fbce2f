// src/validation/mod.rs

//! Checks on an `AmplitudeRegister` that catch numerical drift.

use crate::core::{AmplitudeRegister, GroverError, NORM_TOLERANCE};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How often the search controller re-checks the normalization invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Never check.
    Off,
    /// After every oracle + diffuser round.
    #[default]
    PerIteration,
    /// After every compiled circuit (oracle and diffuser separately).
    PerCircuit,
}

/// Checks that the state vector is normalized (`Σ|c_i|^2 ≈ 1`).
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(GroverError::Incoherence)` otherwise. The state is never renormalized.
pub fn check_normalization(state: &AmplitudeRegister, tolerance: Option<f64>) -> Result<(), GroverError> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq: f64 = state.amplitudes().par_iter().map(|c| c.norm_sqr()).sum();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(GroverError::Incoherence {
            message: format!(
                "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Checks that no amplitude is NaN or infinite.
pub fn check_finite(state: &AmplitudeRegister) -> Result<(), GroverError> {
    match state.amplitudes().par_iter().position_any(|c| !c.re.is_finite() || !c.im.is_finite()) {
        Some(index) => Err(GroverError::Incoherence {
            message: format!("amplitude of basis state {} is not finite", index),
        }),
        None => Ok(()),
    }
}

/// Runs every state check: finiteness, then normalization.
pub fn validate_state(state: &AmplitudeRegister, norm_tolerance: Option<f64>) -> Result<(), GroverError> {
    check_finite(state)?;
    check_normalization(state, norm_tolerance)?;
    Ok(())
}
