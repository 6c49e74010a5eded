// src/error.rs

use std::error::Error;
use std::fmt;

/// Failures surfaced by the integration core, reported synchronously from
/// construction or `step()`; the core never retries on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Malformed or non-physical input. Fatal at construction, no partial
    /// state is created.
    InvalidInitialConditions { reason: String },
    /// Two bodies at zero separation: the force is undefined there, so the
    /// step is refused instead of propagating NaN.
    SingularConfiguration { body_a: usize, body_b: usize },
    /// Non-finite value in the state computed for this step; the last
    /// valid state is preserved.
    NumericalOverflow { step: usize },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidInitialConditions { reason } => {
                write!(f, "invalid initial conditions: {}", reason)
            }
            SimulationError::SingularConfiguration { body_a, body_b } => {
                write!(
                    f,
                    "singular configuration: bodies {} and {} are at zero separation",
                    body_a, body_b
                )
            }
            SimulationError::NumericalOverflow { step } => {
                write!(
                    f,
                    "numerical overflow: non-finite state after step {} (last valid state kept)",
                    step
                )
            }
        }
    }
}

impl Error for SimulationError {}
