// src/lib.rs

//! Fixed-step RK4 integration of the classical gravitational three-body
//! problem. The core produces updated position/velocity vectors once per
//! step; visualization, pacing and recording are consumers attached through
//! the driver's observer callback.

pub mod body;
pub mod config;
pub mod driver;
pub mod error;
pub mod export;
pub mod forces;
pub mod initial;
pub mod monitor;
pub mod rk4;
pub mod state;

pub use body::Body;
pub use config::SimulationConfig;
pub use driver::SimulationDriver;
pub use error::SimulationError;
pub use initial::InitialConditions;
pub use monitor::TrajectoryRecorder;
pub use state::{Derivative, SystemState, BODY_COUNT};
