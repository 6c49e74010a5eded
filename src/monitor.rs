// src/monitor.rs

//! Observer-side recording: trajectories, per-step total energy and drift
//! thresholds. Nothing here feeds back into the integration.

use crate::driver::SimulationDriver;
use crate::forces::total_energy;
use crate::state::{SystemState, BODY_COUNT};
use itertools::izip;
use nalgebra::Vector3;
use ordered_float::OrderedFloat;
use std::array;
use std::collections::HashMap;

pub const DEFAULT_ENERGY_THRESHOLDS: [f64; 14] = [
    0.01, 0.05, 0.1, 0.2, 0.3, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 10.0,
];

/// Accumulates position trails and total energy per step. For each drift
/// threshold it remembers the first step fraction at which the energy left
/// the band `|E - E0| <= threshold * |E0|`.
pub struct TrajectoryRecorder {
    masses: [f64; BODY_COUNT],
    g: f64,
    expected_steps: usize,
    pub positions: [Vec<Vector3<f64>>; BODY_COUNT],
    pub total_energy: Vec<f64>,
    pub energy_thresholds: Vec<f64>,
    pub idx_energy_exceeded: HashMap<OrderedFloat<f64>, Option<f64>>,
    initial_energy: f64,
}

impl TrajectoryRecorder {
    pub fn new(driver: &SimulationDriver, expected_steps: usize) -> Self {
        let energy_thresholds = DEFAULT_ENERGY_THRESHOLDS.to_vec();
        let idx_energy_exceeded = energy_thresholds
            .iter()
            .map(|&t| (OrderedFloat(t), None))
            .collect();
        TrajectoryRecorder {
            masses: *driver.masses(),
            g: driver.g(),
            expected_steps,
            positions: array::from_fn(|_| Vec::with_capacity(expected_steps)),
            total_energy: Vec::with_capacity(expected_steps),
            energy_thresholds,
            idx_energy_exceeded,
            initial_energy: driver.total_energy(),
        }
    }

    /// Records one completed step; meant to be the driver's observer.
    pub fn record(&mut self, step: usize, state: &SystemState) {
        for (trail, pos) in izip!(&mut self.positions, &state.positions) {
            trail.push(*pos);
        }
        let current = total_energy(state, &self.masses, self.g);
        self.total_energy.push(current);

        let drift = (current - self.initial_energy).abs();
        let denom = self.expected_steps.max(1) as f64;
        for &t in &self.energy_thresholds {
            if let Some(val) = self.idx_energy_exceeded.get_mut(&OrderedFloat(t)) {
                if val.is_none() && drift > self.initial_energy.abs() * t {
                    *val = Some(step as f64 / denom);
                }
            }
        }
    }

    pub fn initial_energy(&self) -> f64 {
        self.initial_energy
    }

    pub fn steps_recorded(&self) -> usize {
        self.total_energy.len()
    }

    pub fn energy_std_dev(&self) -> f64 {
        if self.total_energy.is_empty() {
            return 0.0;
        }
        let mean = self.total_energy.iter().sum::<f64>() / self.total_energy.len() as f64;
        let variance = self
            .total_energy
            .iter()
            .map(|val| (*val - mean).powi(2))
            .sum::<f64>()
            / self.total_energy.len() as f64;
        variance.sqrt()
    }

    /// `(E_last - E0) / |E0|`
    pub fn relative_energy_drift(&self) -> f64 {
        match self.total_energy.last() {
            Some(last) => (last - self.initial_energy) / self.initial_energy.abs(),
            None => 0.0,
        }
    }

    pub fn sorted_thresholds(&self) -> Vec<(f64, Option<f64>)> {
        let mut thresholds: Vec<(f64, Option<f64>)> = self
            .idx_energy_exceeded
            .iter()
            .map(|(k, v)| (k.into_inner(), *v))
            .collect();
        thresholds.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        thresholds
    }
}
