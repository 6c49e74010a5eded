// src/forces.rs

use crate::error::SimulationError;
use crate::state::{Derivative, SystemState, BODY_COUNT};
use nalgebra::Vector3;

/// Gravitational constant in scaled simulation units (G = 1). Pass
/// 6.6743e-11 to work in SI units instead.
pub const DEFAULT_G: f64 = 1.0;

/// `r / |r|^3`, the inverse-cube-weighted separation shared by both bodies
/// of a pair. Errors out when the separation is exactly zero (including
/// squared-norm underflow), since the force is undefined there.
fn inverse_cube(
    r_vec: Vector3<f64>,
    body_a: usize,
    body_b: usize,
) -> Result<Vector3<f64>, SimulationError> {
    let r_sq = r_vec.norm_squared();
    if r_sq == 0.0 {
        return Err(SimulationError::SingularConfiguration { body_a, body_b });
    }
    let r = r_sq.sqrt();
    Ok(r_vec / r.powi(3))
}

/// Time derivative of the state under mutual Newtonian gravity. Each
/// unordered pair contributes one inverse-cube term, reused with opposite
/// sign for the two bodies; position derivatives are the current
/// velocities, copied through.
pub fn gravity_derivative(
    state: &SystemState,
    masses: &[f64; BODY_COUNT],
    g: f64,
) -> Result<Derivative, SimulationError> {
    let [p1, p2, p3] = state.positions;
    let c12 = inverse_cube(p1 - p2, 0, 1)?;
    let c23 = inverse_cube(p2 - p3, 1, 2)?;
    let c31 = inverse_cube(p3 - p1, 2, 0)?;

    let a1 = g * (-masses[1] * c12 + masses[2] * c31);
    let a2 = g * (-masses[2] * c23 + masses[0] * c12);
    let a3 = g * (-masses[0] * c31 + masses[1] * c23);

    Ok(Derivative {
        dpositions: state.velocities,
        dvelocities: [a1, a2, a3],
    })
}

pub fn kinetic_energy(state: &SystemState, masses: &[f64; BODY_COUNT]) -> f64 {
    masses
        .iter()
        .zip(&state.velocities)
        .map(|(m, v)| 0.5 * m * v.norm_squared())
        .sum()
}

pub fn potential_energy(state: &SystemState, masses: &[f64; BODY_COUNT], g: f64) -> f64 {
    let mut potential = 0.0;
    for i in 0..BODY_COUNT {
        for j in (i + 1)..BODY_COUNT {
            let r = (state.positions[i] - state.positions[j]).norm();
            if r > 0.0 {
                potential -= g * masses[i] * masses[j] / r;
            }
        }
    }
    potential
}

pub fn total_energy(state: &SystemState, masses: &[f64; BODY_COUNT], g: f64) -> f64 {
    kinetic_energy(state, masses) + potential_energy(state, masses, g)
}
