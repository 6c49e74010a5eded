// src/export.rs

use crate::driver::SimulationDriver;
use crate::initial::InitialConditions;
use crate::monitor::TrajectoryRecorder;
use chrono::Utc;
use serde::Serialize;
use std::error::Error;
use std::path::Path;

#[derive(Serialize)]
struct RunRecord {
    date: String,
    masses: String,
    initial_positions: String,
    initial_velocities: String,
    dt: f64,
    g: f64,
    n_steps: usize,
    std_energy_drift: f64,
    relative_energy_drift: f64,
    energy_thresholds: String,
    notes: String,
}

/// Appends one summary row per run to `<dir>/runs.csv`, writing the header
/// only when the file is created. Initial conditions are logged as supplied
/// by the caller, before the barycentric correction.
pub fn export_run_record(
    driver: &SimulationDriver,
    recorder: &TrajectoryRecorder,
    initial: &InitialConditions,
    notes: &str,
    dir: &Path,
) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let file_path = dir.join("runs.csv");
    let file_exists = file_path.exists();
    let file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&file_path)?;

    let record = RunRecord {
        date: Utc::now().to_rfc3339(),
        masses: format!("{:?}", initial.masses),
        initial_positions: format!("{:?}", initial.positions),
        initial_velocities: format!("{:?}", initial.velocities),
        dt: driver.dt(),
        g: driver.g(),
        n_steps: driver.steps_taken(),
        std_energy_drift: recorder.energy_std_dev(),
        relative_energy_drift: recorder.relative_energy_drift(),
        energy_thresholds: serde_json::to_string(&recorder.sorted_thresholds())?,
        notes: notes.to_string(),
    };

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

pub fn export_positions(
    driver: &SimulationDriver,
    recorder: &TrajectoryRecorder,
    dir: &Path,
) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;

    let mut wtr_meta = csv::Writer::from_path(dir.join("metadata.csv"))?;
    wtr_meta.write_record(["body_id", "mass", "display_radius"])?;
    for (i, (mass, radius)) in driver
        .masses()
        .iter()
        .zip(driver.display_radii())
        .enumerate()
    {
        wtr_meta.write_record(&[i.to_string(), mass.to_string(), radius.to_string()])?;
    }
    wtr_meta.flush()?;

    let mut wtr_pos = csv::Writer::from_path(dir.join("positions.csv"))?;
    wtr_pos.write_record(["body_id", "x", "y", "z"])?;
    for (i, trail) in recorder.positions.iter().enumerate() {
        for pos in trail {
            wtr_pos.write_record(&[
                i.to_string(),
                pos.x.to_string(),
                pos.y.to_string(),
                pos.z.to_string(),
            ])?;
        }
    }
    wtr_pos.flush()?;

    Ok(())
}
