//! Mission files flown against the simulator

use crate::harness::TestHarness;
use headsup_nav::config::AppConfig;
use headsup_nav::devices::mock::SimulatedVehicle;
use headsup_nav::events::{FileSink, RecordingSink};
use headsup_nav::mission::{MissionRunner, MissionStep};
use headsup_nav::navigation::FlightController;
use headsup_nav::{Error, Pose};
use std::io::Write;

#[test]
fn test_sample_mission_file() {
    env_logger::try_init().ok();

    let path = format!("{}/headsup.toml", env!("CARGO_MANIFEST_DIR"));
    let mut config = AppConfig::load(&path).unwrap();
    config.vehicle.device_type = "mock".to_string();
    assert!(!config.steps.is_empty());
    // Waits only slow the test down
    config.steps.retain(|s| !matches!(s, MissionStep::Wait { .. }));

    let vehicle = SimulatedVehicle::new(config.vehicle.simulation.clone());
    let mut drone = FlightController::new(
        vehicle.clone(),
        config.controller_config(),
        Box::new(RecordingSink::new()),
    )
    .unwrap();

    let report = MissionRunner::new(config.motion.abort_on_low_battery)
        .run(&mut drone, &config.steps)
        .unwrap();

    assert_eq!(report.completed_steps, config.steps.len());
    assert!(report.final_pose.same_position(0, 0));
    assert!(!vehicle.is_flying());
}

#[test]
fn test_mission_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[vehicle]
type = "mock"

[mission]
name = "Box"
floor_cm = 60
ceiling_cm = 140

[motion]
use_barometer = false

[[steps]]
action = "takeoff"

[[steps]]
action = "fly_to_ceiling"

[[steps]]
action = "go_to"
x = 100
y = 0

[[steps]]
action = "set_home"

[[steps]]
action = "go_to"
x = 100
y = 100

[[steps]]
action = "go_home"
direct = true

[[steps]]
action = "land"
"#
    )
    .unwrap();

    let config = AppConfig::load(file.path()).unwrap();
    let vehicle = SimulatedVehicle::new(config.vehicle.simulation.clone());
    let mut drone = FlightController::new(
        vehicle.clone(),
        config.controller_config(),
        Box::new(RecordingSink::new()),
    )
    .unwrap();

    let report = MissionRunner::new(true).run(&mut drone, &config.steps).unwrap();
    assert_eq!(report.completed_steps, 7);
    assert!(report.final_pose.same_position(100, 0));
    // Direct return from (100, 100) to (100, 0) faces -y
    assert_eq!(report.final_pose.heading, 180);
}

#[test]
fn test_cancelled_mission_stops_between_steps() {
    let mut h = TestHarness::at_height(80);
    let runner = MissionRunner::new(true);
    let flag = runner.cancel_flag();
    flag.store(true, std::sync::atomic::Ordering::SeqCst);

    let err = runner
        .run(
            &mut h.drone,
            &[MissionStep::GoTo {
                x: 50,
                y: 0,
                direct: false,
            }],
        )
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(h.vehicle.command_log().is_empty());
    assert_eq!(h.drone.pose(), Pose::default());
}

#[test]
fn test_mission_written_to_flight_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("flight_logs").join("mission_05.log");
    let config = AppConfig::from_toml_str(&format!(
        r#"
[vehicle]
type = "mock"

[motion]
use_barometer = false

[logging]
file = "{}"

[[steps]]
action = "takeoff"

[[steps]]
action = "go_to"
x = 40
y = 0

[[steps]]
action = "land"
"#,
        log_path.display()
    ))
    .unwrap();

    let file = config.logging.file.as_deref().unwrap();
    let sink = FileSink::append(file).unwrap();
    let vehicle = SimulatedVehicle::new(config.vehicle.simulation.clone());
    let mut drone =
        FlightController::new(vehicle, config.controller_config(), Box::new(sink)).unwrap();

    MissionRunner::new(true)
        .run(&mut drone, &config.steps)
        .unwrap();
    drop(drone);

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains(" - INFO - Step 1: takeoff"));
    assert!(contents.contains(" - DEBUG - Issued 'forward 40'"));
    assert!(contents.contains(" - INFO - Step 3: land"));
}
