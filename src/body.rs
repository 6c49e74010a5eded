// src/body.rs

use nalgebra::Vector3;
use std::fmt;

/// Read-only per-body snapshot handed to consumers after a step.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub mass: f64,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl Body {
    pub fn new(mass: f64, position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Body {
            mass,
            position,
            velocity,
        }
    }

    /// Radius hint for constant-density rendering: `0.5 * mass^(1/3)`.
    /// Derived from the fixed mass, never part of the integrated state.
    pub fn display_radius(&self) -> f64 {
        0.5 * self.mass.cbrt()
    }

    pub fn momentum(&self) -> Vector3<f64> {
        self.mass * self.velocity
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Body(m={:.2e}, p=[{:.2e}, {:.2e}, {:.2e}], v=[{:.2e}, {:.2e}, {:.2e}])",
            self.mass,
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z
        )
    }
}
