//! Test harness: a controller wired to a simulated vehicle and an event recorder

use headsup_nav::config::ControllerConfig;
use headsup_nav::devices::mock::SimulatedVehicle;
use headsup_nav::devices::mock::config::SimulationConfig;
use headsup_nav::events::{EventLevel, FlightEvent, RecordingSink};
use headsup_nav::navigation::FlightController;

/// Standard band used by the scenarios (cm)
pub const FLOOR: i32 = 50;
pub const CEILING: i32 = 160;

pub struct TestHarness {
    pub drone: FlightController<SimulatedVehicle>,
    /// Second handle on the vehicle for inspection and fault injection
    pub vehicle: SimulatedVehicle,
    pub trace: RecordingSink,
}

impl TestHarness {
    /// Vehicle hovering at `height` with the standard band and range-sensor height
    pub fn at_height(height: i32) -> Self {
        let config = ControllerConfig {
            floor_cm: FLOOR,
            ceiling_cm: CEILING,
            use_barometer: false,
            ..ControllerConfig::default()
        };
        Self::new(SimulationConfig::default(), config, height)
    }

    pub fn new(simulation: SimulationConfig, config: ControllerConfig, height: i32) -> Self {
        env_logger::try_init().ok();

        let vehicle = SimulatedVehicle::new(simulation);
        vehicle.set_height(height);
        let trace = RecordingSink::with_logging();
        let drone = FlightController::new(vehicle.clone(), config, Box::new(trace.clone()))
            .expect("controller construction");

        Self {
            drone,
            vehicle,
            trace,
        }
    }

    pub fn height(&mut self) -> i32 {
        self.drone.current_height().expect("height query")
    }

    pub fn warnings(&self) -> Vec<FlightEvent> {
        self.trace.at_least(EventLevel::Warning)
    }
}
