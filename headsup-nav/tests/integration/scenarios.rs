//! End-to-end flight scenarios

use crate::harness::{CEILING, FLOOR, TestHarness};
use approx::assert_abs_diff_eq;
use headsup_nav::config::ControllerConfig;
use headsup_nav::devices::mock::config::SimulationConfig;
use headsup_nav::events::FlightEvent;
use headsup_nav::motion::BoundsDecision;
use headsup_nav::{Command, Direction, Error, Pose, Rotation};

#[test]
fn test_above_ceiling_request_becomes_descent() {
    let mut h = TestHarness::at_height(170);

    h.drone.fly_up(10).unwrap();

    assert_eq!(
        h.vehicle.command_log(),
        vec![
            Command::move_by(Direction::Up, 20),
            Command::move_by(Direction::Down, 30)
        ]
    );
    assert_eq!(h.height(), CEILING);
    assert!(
        h.warnings()
            .iter()
            .any(|e| matches!(e, FlightEvent::BoundsCorrection { .. }))
    );
}

#[test]
fn test_below_floor_request_becomes_climb() {
    let mut h = TestHarness::at_height(30);

    let decision = h.drone.fly_down(40).unwrap();
    assert_eq!(decision, BoundsDecision::Correction(20));
    assert_eq!(h.vehicle.command_log(), vec![Command::move_by(Direction::Up, 20)]);
    assert_eq!(h.height(), FLOOR);
}

#[test]
fn test_vertical_moves_stay_in_band() {
    let mut h = TestHarness::at_height(100);

    for cm in [5, 40, 90, 15, 200] {
        h.drone.fly_up(cm).unwrap();
        assert!(h.height() <= CEILING);
    }
    assert_eq!(h.height(), CEILING);

    for cm in [3, 70, 25, 300] {
        h.drone.fly_down(cm).unwrap();
        assert!(h.height() >= FLOOR);
    }
    assert_eq!(h.height(), FLOOR);

    // Every leg the vehicle saw was legal
    for cmd in h.vehicle.command_log() {
        assert!(cmd.magnitude() >= 20, "short leg {}", cmd);
    }
}

#[test]
fn test_axis_aligned_target() {
    let mut h = TestHarness::at_height(80);

    h.drone.go_to(30, -10).unwrap();

    assert_eq!(
        h.vehicle.command_log(),
        vec![
            Command::move_by(Direction::Forward, 30),
            Command::move_by(Direction::Right, 10)
        ]
    );
    assert_eq!(h.drone.pose(), Pose::new(30, -10, 0));
}

#[test]
fn test_go_home_from_origin_is_silent() {
    let mut h = TestHarness::at_height(80);

    h.drone.go_home(false).unwrap();
    h.drone.go_home(true).unwrap();

    assert!(h.vehicle.command_log().is_empty());
    assert_eq!(h.drone.pose(), Pose::default());
}

#[test]
fn test_round_trip_returns_to_start() {
    let mut h = TestHarness::at_height(80);
    let waypoints = [(40, 25), (-35, 60), (0, -45), (80, 0)];

    for &(x, y) in &waypoints {
        h.drone.go_to(x, y).unwrap();
        h.drone.go_to(0, 0).unwrap();
        assert_eq!(h.drone.pose(), Pose::default());
    }

    // Without rotations the open-loop estimate matches the true position
    let truth = h.vehicle.ground_truth();
    assert_abs_diff_eq!(truth.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(truth.y, 0.0, epsilon = 1e-9);
}

#[test]
fn test_direct_flight_reaches_target() {
    let mut h = TestHarness::at_height(80);

    h.drone.go_to_with_rotation(50, 50).unwrap();

    assert_eq!(
        h.vehicle.command_log(),
        vec![
            Command::rotate_by(Rotation::CounterClockwise, 45),
            Command::move_by(Direction::Forward, 71)
        ]
    );
    let pose = h.drone.pose();
    assert!(pose.same_position(50, 50));

    // Rounding the leg to whole cm leaves the vehicle within a cm of target
    let truth = h.vehicle.ground_truth();
    assert_abs_diff_eq!(truth.x, 50.0, epsilon = 1.0);
    assert_abs_diff_eq!(truth.y, 50.0, epsilon = 1.0);
}

#[test]
fn test_failure_aborts_plan_and_freezes_pose() {
    let mut h = TestHarness::at_height(80);
    h.vehicle.fail_on_command(2);

    let err = h.drone.go_to(30, 40).unwrap_err();

    assert!(matches!(err, Error::CommandFailed { .. }));
    assert_eq!(h.vehicle.command_log(), vec![Command::move_by(Direction::Forward, 30)]);
    assert_eq!(h.drone.pose(), Pose::new(30, 0, 0));
    // Nothing further issued after the failure
    assert_eq!(h.trace.issued().len(), 1);
}

#[test]
fn test_barometer_height_reference() {
    let simulation = SimulationConfig {
        baro_baseline_cm: 12_500,
        ..SimulationConfig::default()
    };
    let config = ControllerConfig {
        use_barometer: true,
        ..ControllerConfig::default()
    };
    let mut h = TestHarness::new(simulation, config, 0);

    h.drone.takeoff().unwrap();
    h.drone.fly_up(40).unwrap();
    assert_eq!(h.height(), 120);

    let home = h.drone.set_home().unwrap();
    assert_eq!(home.height, 120);
}

#[test]
fn test_hardware_minimum_rejects_uncompensated_short_move() {
    let simulation = SimulationConfig {
        min_move_cm: 20,
        ..SimulationConfig::default()
    };
    let config = ControllerConfig {
        use_barometer: false,
        ..ControllerConfig::default()
    };
    let mut h = TestHarness::new(simulation, config, 80);

    // Vertical moves are compensated and go through
    h.drone.fly_up(10).unwrap();
    assert_eq!(h.height(), 90);

    // Horizontal moves are sent as planned
    assert!(h.drone.go_to(0, -10).is_err());
    assert_eq!(h.drone.pose(), Pose::default());
}
