// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod formula;
pub mod layout;
pub mod state;

// Re-export public types for convenient access via `grover_sat::core::TypeName`
pub use error::{GroverError, QubitId};
pub use formula::{Assignment, Clause, Formula, Literal};
pub use layout::RegisterLayout;
pub use state::AmplitudeRegister;

pub mod constants;
pub use constants::grover_constants::{AMPLITUDE_TOLERANCE, NORM_TOLERANCE};
