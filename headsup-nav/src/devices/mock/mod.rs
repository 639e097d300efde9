//! Simulated vehicle for hardware-free flights
//!
//! [`SimulatedVehicle`] implements [`CommandSink`] against an in-memory
//! ground truth, so missions and the controller can be exercised without a
//! drone on the network.
//!
//! # Configuration
//!
//! ```toml
//! [vehicle]
//! type = "mock"
//!
//! [vehicle.simulation]
//! hover_height_cm = 80
//! battery_pct = 87
//! min_move_cm = 20    # reject short moves like the real vehicle
//! ```
//!
//! # Sensors
//!
//! | Query | Value |
//! |-------|-------|
//! | height | True height, exact to the cm |
//! | barometer | Baseline + true height |
//! | battery | Configured, settable |
//! | temperature | Configured |
//!
//! Handles are cheap clones sharing one state, so a test can keep one handle
//! for inspection and fault injection while the controller owns another.

pub mod config;
mod physics;

use crate::core::driver::CommandSink;
use crate::core::types::{Command, Direction, Rotation};
use crate::error::{Error, Result};

use config::SimulationConfig;
use parking_lot::Mutex;
use std::sync::Arc;

pub use physics::GroundTruth;

/// Simulated drone
#[derive(Clone)]
pub struct SimulatedVehicle {
    state: Arc<Mutex<SimState>>,
}

#[derive(Debug)]
struct SimState {
    config: SimulationConfig,
    truth: GroundTruth,
    battery: u8,
    baro_baseline: i32,
    connected: bool,
    flying: bool,
    /// Executed moves and rotations
    log: Vec<Command>,
    /// Commands attempted since fault injection was armed
    attempts: usize,
    /// Attempt number that fails
    fail_at: Option<usize>,
}

impl SimulatedVehicle {
    /// Create a simulated vehicle
    pub fn new(config: SimulationConfig) -> Self {
        let state = SimState {
            truth: GroundTruth::new(config.start_height_cm),
            battery: config.battery_pct,
            baro_baseline: config.baro_baseline_cm,
            connected: false,
            flying: config.start_height_cm > 0,
            log: Vec::new(),
            attempts: 0,
            fail_at: None,
            config,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// True position, height and heading
    pub fn ground_truth(&self) -> GroundTruth {
        self.state.lock().truth
    }

    /// Executed moves and rotations, in order
    pub fn command_log(&self) -> Vec<Command> {
        self.state.lock().log.clone()
    }

    /// Check if the vehicle is airborne
    pub fn is_flying(&self) -> bool {
        self.state.lock().flying
    }

    /// Place the vehicle at `cm` above the takeoff point
    pub fn set_height(&self, cm: i32) {
        let mut state = self.state.lock();
        state.truth.height = cm;
        state.flying = cm > 0;
    }

    /// Change the barometer reading at zero height
    pub fn set_barometer_baseline(&self, cm: i32) {
        self.state.lock().baro_baseline = cm;
    }

    /// Change the battery charge
    pub fn set_battery(&self, percent: u8) {
        self.state.lock().battery = percent.min(100);
    }

    /// Make the `n`-th command from now fail (1 = the next one)
    ///
    /// Counts moves, rotations, takeoff and landing; queries are unaffected.
    pub fn fail_on_command(&self, n: usize) {
        let mut state = self.state.lock();
        state.attempts = 0;
        state.fail_at = Some(n);
    }

    /// Run one command against the shared state
    fn execute(
        &self,
        label: impl FnOnce() -> String,
        op: impl FnOnce(&mut SimState) -> Result<()>,
    ) -> Result<()> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(Error::NotConnected);
        }

        state.attempts += 1;
        if state.fail_at == Some(state.attempts) {
            state.fail_at = None;
            let command = label();
            log::debug!("SimulatedVehicle: Injected failure on '{}'", command);
            return Err(Error::command_failed(command, "error (simulated)"));
        }
        op(&mut state)
    }
}

impl Default for SimulatedVehicle {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl CommandSink for SimulatedVehicle {
    fn connect(&mut self) -> Result<()> {
        self.state.lock().connected = true;
        log::info!("SimulatedVehicle: Connected");
        Ok(())
    }

    fn move_by(&mut self, direction: Direction, cm: u32) -> Result<()> {
        let command = Command::move_by(direction, cm);
        self.execute(
            || command.to_string(),
            |state| {
                let (min, max) = (state.config.min_move_cm, state.config.max_move_cm);
                if !(min..=max).contains(&cm) {
                    return Err(Error::command_failed(
                        command.to_string(),
                        format!("error distance out of range {}-{}", min, max),
                    ));
                }
                state.truth.translate(direction, cm);
                state.log.push(command);
                Ok(())
            },
        )
    }

    fn rotate(&mut self, rotation: Rotation, degrees: u32) -> Result<()> {
        let command = Command::rotate_by(rotation, degrees);
        self.execute(
            || command.to_string(),
            |state| {
                if !(1..=360).contains(&degrees) {
                    return Err(Error::command_failed(
                        command.to_string(),
                        "error angle out of range 1-360",
                    ));
                }
                state.truth.rotate(rotation, degrees);
                state.log.push(command);
                Ok(())
            },
        )
    }

    fn takeoff(&mut self) -> Result<()> {
        self.execute(
            || "takeoff".to_string(),
            |state| {
                state.truth.height = state.truth.height.max(state.config.hover_height_cm);
                state.flying = true;
                Ok(())
            },
        )
    }

    fn land(&mut self) -> Result<()> {
        self.execute(
            || "land".to_string(),
            |state| {
                state.truth.height = 0;
                state.flying = false;
                Ok(())
            },
        )
    }

    fn read_height(&mut self) -> Result<i32> {
        Ok(self.state.lock().truth.height)
    }

    fn read_barometer(&mut self) -> Result<i32> {
        let state = self.state.lock();
        Ok(state.baro_baseline + state.truth.height)
    }

    fn read_battery(&mut self) -> Result<u8> {
        Ok(self.state.lock().battery)
    }

    fn disconnect(&mut self) -> Result<()> {
        self.state.lock().connected = false;
        log::info!("SimulatedVehicle: Disconnected");
        Ok(())
    }

    fn read_temperature(&mut self) -> Result<f32> {
        Ok(self.state.lock().config.temperature_c)
    }

    fn set_top_led(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
        log::debug!("SimulatedVehicle: Top LED ({}, {}, {})", red, green, blue);
        Ok(())
    }

    fn show_matrix(&mut self, pattern: &str, color: char) -> Result<()> {
        log::debug!("SimulatedVehicle: Matrix '{}' in {}", pattern, color);
        Ok(())
    }
}
