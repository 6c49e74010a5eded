use nalgebra::Vector3;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use threebody::forces::{gravity_derivative, DEFAULT_G};
use threebody::{
    InitialConditions, SimulationConfig, SimulationDriver, SimulationError, TrajectoryRecorder,
};

/// Figure-eight choreography: stable, zero net momentum, good for
/// conservation checks.
fn figure_eight_flat() -> Vec<f64> {
    SimulationConfig::figure_eight().initial_conditions
}

/// Equal masses at (-1,0,0), (1,0,0), (0,0,0) with small velocities
/// summing to zero.
fn collinear_flat() -> Vec<f64> {
    vec![
        1.0, 1.0, 1.0, //
        -1.0, 0.0, 0.0, 0.0, 0.001, 0.0, //
        1.0, 0.0, 0.0, 0.0, -0.001, 0.0, //
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ]
}

fn figure_eight_driver(dt: f64) -> SimulationDriver {
    SimulationDriver::from_flat(&figure_eight_flat(), dt, DEFAULT_G).unwrap()
}

// ==================================================================================
// Input validation
// ==================================================================================

#[test]
fn rejects_wrong_value_count() {
    let mut values = figure_eight_flat();
    values.pop();
    assert_eq!(values.len(), 20);

    let err = InitialConditions::from_flat(&values).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::InvalidInitialConditions { .. }
    ));
}

#[test]
fn rejects_non_finite_value() {
    let mut values = figure_eight_flat();
    values[10] = f64::NAN;

    let err = InitialConditions::from_flat(&values).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::InvalidInitialConditions { .. }
    ));
}

#[test]
fn rejects_non_positive_mass() {
    let mut values = figure_eight_flat();
    values[1] = 0.0;

    let err = InitialConditions::from_flat(&values).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::InvalidInitialConditions { .. }
    ));
}

#[test]
fn rejects_non_positive_timestep_from_config() {
    let config = SimulationConfig {
        dt: -0.01,
        ..SimulationConfig::figure_eight()
    };
    let err = SimulationDriver::from_config(&config).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::InvalidInitialConditions { .. }
    ));

    let err = SimulationDriver::from_flat(&figure_eight_flat(), f64::NAN, DEFAULT_G).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::InvalidInitialConditions { .. }
    ));
}

#[test]
fn accepts_valid_input() {
    let initial = InitialConditions::from_flat(&figure_eight_flat()).unwrap();
    assert_eq!(initial.masses, [1.0, 1.0, 1.0]);
    assert_eq!(initial.positions[2], Vector3::zeros());
}

// ==================================================================================
// Singular configurations
// ==================================================================================

#[test]
fn coincident_bodies_fail_on_first_step() {
    let values = vec![
        1.0, 1.0, 1.0, //
        0.5, 0.5, 0.5, 0.0, 0.0, 0.0, // body 0
        0.5, 0.5, 0.5, 0.0, 0.0, 0.0, // body 1, same position
        1.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ];
    let mut driver = SimulationDriver::from_flat(&values, 0.01, DEFAULT_G).unwrap();

    let err = driver.step().unwrap_err();
    assert_eq!(
        err,
        SimulationError::SingularConfiguration {
            body_a: 0,
            body_b: 1
        }
    );
    assert_eq!(driver.steps_taken(), 0);
    assert!(driver.state().is_finite());
}

#[test]
fn coincident_bodies_fail_in_derivative() {
    let values = vec![
        1.0, 1.0, 1.0, //
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, 0.0, 0.0, 0.0, // bodies 1 and 2 coincide
    ];
    let initial = InitialConditions::from_flat(&values).unwrap();

    let err = gravity_derivative(&initial.to_state(), &initial.masses, DEFAULT_G).unwrap_err();
    assert_eq!(
        err,
        SimulationError::SingularConfiguration {
            body_a: 1,
            body_b: 2
        }
    );
}

// ==================================================================================
// Conservation properties
// ==================================================================================

#[test]
fn momentum_zero_after_construction() {
    // deliberately non-zero net momentum in the input
    let values = vec![
        1.0, 2.0, 3.0, //
        -1.0, 0.0, 0.0, 0.3, 0.1, -0.2, //
        1.0, 0.5, 0.0, -0.1, 0.4, 0.0, //
        0.0, -0.5, 1.0, 0.2, 0.2, 0.1,
    ];
    let driver = SimulationDriver::from_flat(&values, 0.01, DEFAULT_G).unwrap();

    let p = driver.total_momentum();
    assert!(p.norm() < 1e-12, "momentum after construction: {:.2e}", p.norm());
}

#[test]
fn momentum_stays_zero_over_many_steps() {
    let mut driver = figure_eight_driver(0.01);
    driver.run(500, |_, _| {}).unwrap();

    let p = driver.total_momentum();
    assert!(p.norm() < 1e-9, "momentum after 500 steps: {:.2e}", p.norm());
}

#[test]
fn energy_conserved_over_1000_steps() {
    let mut driver = figure_eight_driver(0.01);
    let mut recorder = TrajectoryRecorder::new(&driver, 1000);

    driver
        .run(1000, |step, state| recorder.record(step, state))
        .unwrap();

    let drift = recorder.relative_energy_drift().abs();
    assert!(drift < 1e-4, "relative energy drift: {:.2e}", drift);
    assert_eq!(recorder.steps_recorded(), 1000);
}

#[test]
fn barycentric_correction_shifts_velocities() {
    // every body moving at (1, 0, 0): the whole drift is center-of-mass motion
    let values = vec![
        1.0, 1.0, 2.0, //
        -1.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 1.0, 0.0, 0.0,
    ];
    let driver = SimulationDriver::from_flat(&values, 0.01, DEFAULT_G).unwrap();

    for v in &driver.state().velocities {
        assert!(v.norm() < 1e-15, "residual velocity: {:.2e}", v.norm());
    }
}

// ==================================================================================
// Symmetry and determinism
// ==================================================================================

#[test]
fn mirrored_configuration_stays_mirrored() {
    // state is invariant under point reflection + swap of bodies 0 and 1,
    // so the trajectories must keep that symmetry
    let values = vec![
        1.0, 1.0, 1.0, //
        -1.0, 0.0, 0.0, 0.0, 0.3, 0.0, //
        1.0, 0.0, 0.0, 0.0, -0.3, 0.0, //
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ];
    let mut driver = SimulationDriver::from_flat(&values, 0.01, DEFAULT_G).unwrap();
    driver.run(50, |_, _| {}).unwrap();

    let state = driver.state();
    let mirror_err = (state.positions[0] + state.positions[1]).norm();
    let vel_err = (state.velocities[0] + state.velocities[1]).norm();
    assert!(mirror_err < 1e-9, "position mirror error: {:.2e}", mirror_err);
    assert!(vel_err < 1e-9, "velocity mirror error: {:.2e}", vel_err);
    assert!(
        state.positions[2].norm() < 1e-9,
        "middle body drifted: {:.2e}",
        state.positions[2].norm()
    );
}

#[test]
fn identical_runs_are_bit_identical() {
    let mut a = figure_eight_driver(0.01);
    let mut b = figure_eight_driver(0.01);

    a.run(100, |_, _| {}).unwrap();
    b.run(100, |_, _| {}).unwrap();

    assert_eq!(a.state(), b.state());
}

#[test]
fn derivative_is_idempotent() {
    let initial = InitialConditions::from_flat(&figure_eight_flat()).unwrap();
    let state = initial.to_state();

    let first = gravity_derivative(&state, &initial.masses, DEFAULT_G).unwrap();
    let second = gravity_derivative(&state, &initial.masses, DEFAULT_G).unwrap();
    assert_eq!(first, second);
}

// ==================================================================================
// Step size sanity
// ==================================================================================

#[test]
fn single_step_moves_bodies_less_than_dt() {
    let mut driver = SimulationDriver::from_flat(&collinear_flat(), 0.01, DEFAULT_G).unwrap();
    let before = *driver.state();
    driver.step().unwrap();

    for (p0, p1) in before.positions.iter().zip(&driver.state().positions) {
        let moved = (p1 - p0).norm();
        assert!(moved < 0.01, "body moved {:.2e} in one step", moved);
    }
}

// ==================================================================================
// Overflow handling
// ==================================================================================

#[test]
fn overflow_preserves_last_valid_state() {
    // enormous mass at near-zero separation overflows the acceleration
    let values = vec![
        1e300, 1.0, 1.0, //
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        1e-8, 0.0, 0.0, 0.0, 0.0, 0.0, //
        1.0, 1.0, 1.0, 0.0, 0.0, 0.0,
    ];
    let mut driver = SimulationDriver::from_flat(&values, 0.01, DEFAULT_G).unwrap();
    let before = *driver.state();

    let err = driver.step().unwrap_err();
    assert_eq!(err, SimulationError::NumericalOverflow { step: 0 });
    assert_eq!(driver.state(), &before);
    assert_eq!(driver.steps_taken(), 0);
    assert!(driver.state().is_finite());
}

// ==================================================================================
// Driver loop contract
// ==================================================================================

#[test]
fn run_performs_requested_steps() {
    let mut driver = figure_eight_driver(0.01);
    let mut observed = 0usize;

    let completed = driver.run(50, |_, _| observed += 1).unwrap();

    assert_eq!(completed, 50);
    assert_eq!(observed, 50);
    assert_eq!(driver.steps_taken(), 50);
    assert!((driver.time() - 0.5).abs() < 1e-12);
}

#[test]
fn preset_cancel_flag_stops_immediately() {
    let mut driver = figure_eight_driver(0.01);
    let flag = Arc::new(AtomicBool::new(true));
    driver.set_cancel_flag(flag);

    let completed = driver.run(100, |_, _| {}).unwrap();
    assert_eq!(completed, 0);
    assert_eq!(driver.steps_taken(), 0);
}

#[test]
fn cancel_flag_checked_between_steps() {
    let mut driver = figure_eight_driver(0.01);
    let flag = Arc::new(AtomicBool::new(false));
    driver.set_cancel_flag(Arc::clone(&flag));

    let completed = driver
        .run(100, |step, _| {
            if step == 10 {
                flag.store(true, Ordering::Relaxed);
            }
        })
        .unwrap();

    assert_eq!(completed, 10);
    assert_eq!(driver.steps_taken(), 10);
}

// ==================================================================================
// Derived quantities and configuration
// ==================================================================================

#[test]
fn display_radii_follow_cube_root_of_mass() {
    let values = vec![
        8.0, 1.0, 27.0, //
        -1.0, 0.0, 0.0, 0.0, 0.1, 0.0, //
        1.0, 0.0, 0.0, 0.0, -0.1, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, 0.0,
    ];
    let driver = SimulationDriver::from_flat(&values, 0.01, DEFAULT_G).unwrap();

    let radii = driver.display_radii();
    assert!((radii[0] - 1.0).abs() < 1e-12);
    assert!((radii[1] - 0.5).abs() < 1e-12);
    assert!((radii[2] - 1.5).abs() < 1e-12);

    let bodies = driver.bodies();
    assert!((bodies[0].display_radius() - radii[0]).abs() < 1e-12);

    let total: Vector3<f64> = bodies.iter().map(|b| b.momentum()).sum();
    assert!((total - driver.total_momentum()).norm() < 1e-12);
}

#[test]
fn recorder_tolerates_zero_expected_steps() {
    let driver = figure_eight_driver(0.01);
    let mut recorder = TrajectoryRecorder::new(&driver, 0);

    // absurd kinetic energy trips every drift threshold at once
    let mut state = *driver.state();
    state.velocities[0] = Vector3::new(1e6, 0.0, 0.0);
    recorder.record(1, &state);

    for (threshold, hit) in recorder.sorted_thresholds() {
        let fraction = hit.unwrap_or_else(|| panic!("threshold {} not tripped", threshold));
        assert!(fraction.is_finite(), "fraction for {}: {}", threshold, fraction);
    }
}

#[test]
fn config_defaults_apply() {
    let path = std::env::temp_dir().join("threebody_config_defaults.json");
    let json = format!(
        "{{\"initial_conditions\": {:?}}}",
        SimulationConfig::figure_eight().initial_conditions
    );
    std::fs::write(&path, json).unwrap();

    let config = SimulationConfig::from_json_file(&path).unwrap();
    assert_eq!(config.dt, 0.01);
    assert_eq!(config.g, 1.0);
    assert_eq!(config.rate, None);
    assert_eq!(config.max_steps, None);
    assert_eq!(config.initial_conditions.len(), 21);

    let driver = SimulationDriver::from_config(&config).unwrap();
    assert_eq!(driver.dt(), 0.01);
}

#[test]
fn config_invalid_conditions_surface_at_driver() {
    let config = SimulationConfig {
        initial_conditions: vec![1.0; 20],
        ..SimulationConfig::figure_eight()
    };
    let err = SimulationDriver::from_config(&config).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::InvalidInitialConditions { .. }
    ));
}
