// src/state.rs

use itertools::izip;
use nalgebra::Vector3;
use std::array;

pub const BODY_COUNT: usize = 3;

/// Integration variable `y`: three position/velocity pairs, six Vector3
/// slots. Masses never appear in here; they are coefficients of the
/// derivative computation only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemState {
    pub positions: [Vector3<f64>; BODY_COUNT],
    pub velocities: [Vector3<f64>; BODY_COUNT],
}

/// `dy/dt`: same shape, holding each body's velocity and acceleration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derivative {
    pub dpositions: [Vector3<f64>; BODY_COUNT],
    pub dvelocities: [Vector3<f64>; BODY_COUNT],
}

impl SystemState {
    pub fn new(
        positions: [Vector3<f64>; BODY_COUNT],
        velocities: [Vector3<f64>; BODY_COUNT],
    ) -> Self {
        SystemState {
            positions,
            velocities,
        }
    }

    /// `y + factor * k`, elementwise over the six slots.
    pub fn nudged(&self, k: &Derivative, factor: f64) -> SystemState {
        SystemState {
            positions: array::from_fn(|i| self.positions[i] + factor * k.dpositions[i]),
            velocities: array::from_fn(|i| self.velocities[i] + factor * k.dvelocities[i]),
        }
    }

    pub fn total_momentum(&self, masses: &[f64; BODY_COUNT]) -> Vector3<f64> {
        izip!(masses, &self.velocities)
            .map(|(m, v)| *m * *v)
            .sum()
    }

    pub fn is_finite(&self) -> bool {
        izip!(&self.positions, &self.velocities)
            .all(|(p, v)| p.iter().all(|c| c.is_finite()) && v.iter().all(|c| c.is_finite()))
    }
}

impl Derivative {
    pub fn scaled(&self, factor: f64) -> Derivative {
        Derivative {
            dpositions: array::from_fn(|i| factor * self.dpositions[i]),
            dvelocities: array::from_fn(|i| factor * self.dvelocities[i]),
        }
    }
}
