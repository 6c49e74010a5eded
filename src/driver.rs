// src/driver.rs

//! The driver owns the simulation and is the sole producer of state
//! updates; rendering and recording hang off the per-step observer.

use crate::body::Body;
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::initial::InitialConditions;
use crate::rk4;
use crate::state::{SystemState, BODY_COUNT};
use itertools::izip;
use nalgebra::Vector3;
use std::array;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub struct SimulationDriver {
    masses: [f64; BODY_COUNT],
    state: SystemState,
    dt: f64,
    g: f64,
    display_radii: [f64; BODY_COUNT],
    steps_taken: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl SimulationDriver {
    /// Subtracts the mass-weighted mean velocity from every body, exactly
    /// once, so the system is simulated in its barycentric frame.
    pub fn new(initial: &InitialConditions, dt: f64, g: f64) -> Result<Self, SimulationError> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SimulationError::InvalidInitialConditions {
                reason: format!("timestep must be positive and finite, got {}", dt),
            });
        }
        let total_mass: f64 = initial.masses.iter().sum();
        let vcenter: Vector3<f64> = izip!(&initial.masses, &initial.velocities)
            .map(|(m, v)| *m * *v)
            .sum::<Vector3<f64>>()
            / total_mass;

        let velocities = array::from_fn(|i| initial.velocities[i] - vcenter);
        let display_radii = array::from_fn(|i| 0.5 * initial.masses[i].cbrt());

        Ok(SimulationDriver {
            masses: initial.masses,
            state: SystemState::new(initial.positions, velocities),
            dt,
            g,
            display_radii,
            steps_taken: 0,
            cancel: None,
        })
    }

    pub fn from_flat(values: &[f64], dt: f64, g: f64) -> Result<Self, SimulationError> {
        Self::new(&InitialConditions::from_flat(values)?, dt, g)
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        Self::new(
            &InitialConditions::from_flat(&config.initial_conditions)?,
            config.dt,
            config.g,
        )
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn masses(&self) -> &[f64; BODY_COUNT] {
        &self.masses
    }

    /// Rendering radius hints, computed once at construction.
    pub fn display_radii(&self) -> &[f64; BODY_COUNT] {
        &self.display_radii
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn time(&self) -> f64 {
        self.steps_taken as f64 * self.dt
    }

    pub fn bodies(&self) -> [Body; BODY_COUNT] {
        array::from_fn(|i| {
            Body::new(self.masses[i], self.state.positions[i], self.state.velocities[i])
        })
    }

    /// Cooperative stop signal checked between steps of `run`.
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel = Some(flag);
    }

    /// Advances the system by one timestep. On any error the previous
    /// state is kept untouched, including `NumericalOverflow` from the
    /// post-step finiteness check.
    pub fn step(&mut self) -> Result<&SystemState, SimulationError> {
        let next = rk4::advance(&self.state, &self.masses, self.dt, self.g)?;
        if !next.is_finite() {
            return Err(SimulationError::NumericalOverflow {
                step: self.steps_taken,
            });
        }
        self.state = next;
        self.steps_taken += 1;
        Ok(&self.state)
    }

    /// Runs up to `max_steps` steps, invoking `observer` once per completed
    /// step. Returns the number of steps performed, smaller than
    /// `max_steps` only when the cancel flag was raised.
    pub fn run<F>(&mut self, max_steps: usize, mut observer: F) -> Result<usize, SimulationError>
    where
        F: FnMut(usize, &SystemState),
    {
        for n in 0..max_steps {
            if let Some(flag) = &self.cancel {
                if flag.load(Ordering::Relaxed) {
                    return Ok(n);
                }
            }
            self.step()?;
            observer(self.steps_taken, &self.state);
        }
        Ok(max_steps)
    }

    pub fn total_momentum(&self) -> Vector3<f64> {
        self.state.total_momentum(&self.masses)
    }

    pub fn total_energy(&self) -> f64 {
        crate::forces::total_energy(&self.state, &self.masses, self.g)
    }
}
