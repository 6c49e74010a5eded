// src/config.rs

//! Serde-deserializable run configuration. A scenario JSON looks like:
//!
//! ```json
//! {
//!   "dt": 0.01,
//!   "g": 1.0,
//!   "rate": 100.0,
//!   "max_steps": 10000,
//!   "initial_conditions": [1.0, 1.0, 1.0,
//!                          -1.0, 0.0, 0.0,  0.0, 0.1, 0.0,
//!                           1.0, 0.0, 0.0,  0.0, -0.1, 0.0,
//!                           0.0, 0.0, 0.0,  0.0, 0.0, 0.0]
//! }
//! ```

use crate::forces::DEFAULT_G;
use serde::Deserialize;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn default_dt() -> f64 {
    0.01
}

fn default_g() -> f64 {
    DEFAULT_G
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_g")]
    pub g: f64,
    /// Steps per second for the consuming loop; `None` runs flat out. The
    /// core never sleeps.
    #[serde(default)]
    pub rate: Option<f64>,
    /// `None` leaves termination to the consumer; the bundled binary falls
    /// back to a 10,000-step cap.
    #[serde(default)]
    pub max_steps: Option<usize>,
    /// Flat 21-value layout: `[m1, m2, m3]` then `pos(x,y,z), vel(x,y,z)`
    /// per body.
    pub initial_conditions: Vec<f64>,
}

impl SimulationConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: SimulationConfig = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// The Chenciner-Montgomery figure-eight choreography, three unit
    /// masses chasing each other along one curve.
    pub fn figure_eight() -> Self {
        SimulationConfig {
            dt: default_dt(),
            g: default_g(),
            rate: None,
            max_steps: Some(10_000),
            initial_conditions: vec![
                1.0, 1.0, 1.0, // masses
                0.970_004_36, -0.243_087_53, 0.0, // body 0 position
                0.466_203_685, 0.432_365_73, 0.0, // body 0 velocity
                -0.970_004_36, 0.243_087_53, 0.0, // body 1 position
                0.466_203_685, 0.432_365_73, 0.0, // body 1 velocity
                0.0, 0.0, 0.0, // body 2 position
                -0.932_407_37, -0.864_731_46, 0.0, // body 2 velocity
            ],
        }
    }
}
