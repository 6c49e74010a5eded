// src/rk4.rs

use crate::error::SimulationError;
use crate::forces::gravity_derivative;
use crate::state::{SystemState, BODY_COUNT};
use std::array;

/// Classical fixed-step RK4 advance over the whole six-slot state:
///
/// ```text
/// k1 = dt * f(y)
/// k2 = dt * f(y + k1/2)
/// k3 = dt * f(y + k2/2)
/// k4 = dt * f(y + k3)
/// y' = y + k1/6 + k2/3 + k3/3 + k4/6
/// ```
///
/// Pure function: the input state is untouched and identical inputs give
/// bit-identical output. A close encounter in any of the four stage
/// evaluations surfaces as `SingularConfiguration`.
pub fn advance(
    state: &SystemState,
    masses: &[f64; BODY_COUNT],
    dt: f64,
    g: f64,
) -> Result<SystemState, SimulationError> {
    let k1 = gravity_derivative(state, masses, g)?.scaled(dt);
    let k2 = gravity_derivative(&state.nudged(&k1, 0.5), masses, g)?.scaled(dt);
    let k3 = gravity_derivative(&state.nudged(&k2, 0.5), masses, g)?.scaled(dt);
    let k4 = gravity_derivative(&state.nudged(&k3, 1.0), masses, g)?.scaled(dt);

    Ok(SystemState {
        positions: array::from_fn(|i| {
            state.positions[i]
                + k1.dpositions[i] / 6.0
                + k2.dpositions[i] / 3.0
                + k3.dpositions[i] / 3.0
                + k4.dpositions[i] / 6.0
        }),
        velocities: array::from_fn(|i| {
            state.velocities[i]
                + k1.dvelocities[i] / 6.0
                + k2.dvelocities[i] / 3.0
                + k3.dvelocities[i] / 3.0
                + k4.dvelocities[i] / 6.0
        }),
    })
}
