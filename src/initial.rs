// src/initial.rs

use crate::error::SimulationError;
use crate::state::{SystemState, BODY_COUNT};
use nalgebra::Vector3;
use std::array;

/// Flat input layout: `[m1, m2, m3]` followed by `[pos(x,y,z), vel(x,y,z)]`
/// for each body in order.
pub const FLAT_LEN: usize = 3 + BODY_COUNT * 6;

/// Validated initial conditions, still in the caller's frame of reference;
/// the barycentric correction happens at driver construction.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditions {
    pub masses: [f64; BODY_COUNT],
    pub positions: [Vector3<f64>; BODY_COUNT],
    pub velocities: [Vector3<f64>; BODY_COUNT],
}

impl InitialConditions {
    pub fn from_flat(values: &[f64]) -> Result<Self, SimulationError> {
        if values.len() != FLAT_LEN {
            return Err(SimulationError::InvalidInitialConditions {
                reason: format!("expected {} values, got {}", FLAT_LEN, values.len()),
            });
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(SimulationError::InvalidInitialConditions {
                reason: format!("value at index {} is not finite", idx),
            });
        }
        let masses: [f64; BODY_COUNT] = [values[0], values[1], values[2]];
        if let Some(idx) = masses.iter().position(|m| *m <= 0.0) {
            return Err(SimulationError::InvalidInitialConditions {
                reason: format!("mass {} must be strictly positive, got {}", idx, masses[idx]),
            });
        }

        let positions = array::from_fn(|i| {
            let base = 3 + i * 6;
            Vector3::new(values[base], values[base + 1], values[base + 2])
        });
        let velocities = array::from_fn(|i| {
            let base = 6 + i * 6;
            Vector3::new(values[base], values[base + 1], values[base + 2])
        });

        Ok(InitialConditions {
            masses,
            positions,
            velocities,
        })
    }

    pub fn to_state(&self) -> SystemState {
        SystemState::new(self.positions, self.velocities)
    }
}
