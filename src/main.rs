// src/main.rs

use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::error::Error;
use std::path::Path;
use std::thread;
use std::time::Duration;
use threebody::export::{export_positions, export_run_record};
use threebody::{InitialConditions, SimulationConfig, SimulationDriver, TrajectoryRecorder};

fn main() -> Result<(), Box<dyn Error>> {
    let config = match env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_file(Path::new(&path))?,
        None => SimulationConfig::figure_eight(),
    };

    let initial = InitialConditions::from_flat(&config.initial_conditions)?;
    let mut driver = SimulationDriver::new(&initial, config.dt, config.g)?;
    let max_steps = config.max_steps.unwrap_or(10_000);
    let mut recorder = TrajectoryRecorder::new(&driver, max_steps);

    for (body, radius) in driver.bodies().iter().zip(driver.display_radii()) {
        println!("{} r={:.3}", body, radius);
    }

    let pb = ProgressBar::new(max_steps as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    // rate pacing belongs to this consuming loop, never to the core
    let pace = config.rate.map(|rate| Duration::from_secs_f64(1.0 / rate));
    let completed = driver.run(max_steps, |step, state| {
        recorder.record(step, state);
        pb.inc(1);
        if let Some(delay) = pace {
            thread::sleep(delay);
        }
    })?;
    pb.finish_with_message("simulation complete");

    let out_dir = Path::new("run_data");
    export_positions(&driver, &recorder, out_dir)?;
    export_run_record(&driver, &recorder, &initial, "", out_dir)?;

    println!("steps: {} (t = {:.3})", completed, driver.time());
    println!(
        "energy: E0 = {:.6e}, drift = {:.3e} (relative), sigma = {:.3e}",
        recorder.initial_energy(),
        recorder.relative_energy_drift(),
        recorder.energy_std_dev()
    );
    println!("momentum: |p| = {:.3e}", driver.total_momentum().norm());

    Ok(())
}
