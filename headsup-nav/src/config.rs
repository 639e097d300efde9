//! Configuration for HeadsUp flights
//!
//! Loads a TOML file describing the vehicle link, the mission bounds, motion
//! limits, logging and the mission steps:
//!
//! ```toml
//! [vehicle]
//! type = "tello"
//! address = "192.168.10.1:8889"
//!
//! [mission]
//! name = "Mission 05"
//! floor_cm = 50
//! ceiling_cm = 160
//!
//! [motion]
//! min_move_cm = 20
//! use_barometer = true
//! min_battery_pct = 20
//!
//! [logging]
//! level = "info"
//! file = "flight_logs/mission_05.log"
//!
//! [[steps]]
//! action = "takeoff"
//!
//! [[steps]]
//! action = "go_to"
//! x = 50
//! y = 50
//! direct = true
//! ```

use crate::devices::mock::config::SimulationConfig;
use crate::devices::tello;
use crate::error::{Error, Result};
use crate::mission::MissionStep;
use crate::motion::{MIN_MOVE_CM, MissionBounds};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub mission: MissionConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub steps: Vec<MissionStep>,
}

/// Vehicle link configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehicleConfig {
    /// Device type ("tello" or "mock")
    #[serde(rename = "type", default = "default_device_type")]
    pub device_type: String,

    /// Vehicle command endpoint
    #[serde(default = "default_address")]
    pub address: String,

    /// Local UDP bind address (responses arrive here)
    #[serde(default = "default_local_bind")]
    pub local_bind: String,

    /// How long to wait for each command acknowledgment (ms)
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,

    /// Simulated vehicle parameters (type = "mock")
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Mission identity and vertical bounds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MissionConfig {
    #[serde(default = "default_mission_name")]
    pub name: String,

    /// Lowest allowed height (cm)
    #[serde(default = "default_floor")]
    pub floor_cm: i32,

    /// Highest allowed height (cm)
    #[serde(default = "default_ceiling")]
    pub ceiling_cm: i32,
}

/// Motion limits and pre-flight checks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MotionConfig {
    /// Shortest move the vehicle executes reliably (cm)
    #[serde(default = "default_min_move")]
    pub min_move_cm: u32,

    /// Measure height from the barometer (true) or the range sensor (false)
    #[serde(default = "default_true")]
    pub use_barometer: bool,

    /// Battery level below which the pre-flight check fails (%)
    #[serde(default = "default_min_battery")]
    pub min_battery_pct: u8,

    /// Refuse to start a mission when the battery check fails
    #[serde(default = "default_true")]
    pub abort_on_low_battery: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Flight log file; the decision trace is appended to it when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// Parameters the flight controller needs at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub floor_cm: i32,
    pub ceiling_cm: i32,
    pub min_move_cm: u32,
    pub use_barometer: bool,
    pub min_battery_pct: u8,
}

fn default_device_type() -> String {
    "tello".to_string()
}
fn default_address() -> String {
    "192.168.10.1:8889".to_string()
}
fn default_local_bind() -> String {
    "0.0.0.0:8889".to_string()
}
fn default_response_timeout_ms() -> u64 {
    7000
}
fn default_mission_name() -> String {
    "Mission 01".to_string()
}
fn default_floor() -> i32 {
    50
}
fn default_ceiling() -> i32 {
    160
}
fn default_min_move() -> u32 {
    MIN_MOVE_CM
}
fn default_true() -> bool {
    true
}
fn default_min_battery() -> u8 {
    20
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            device_type: default_device_type(),
            address: default_address(),
            local_bind: default_local_bind(),
            response_timeout_ms: default_response_timeout_ms(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            name: default_mission_name(),
            floor_cm: default_floor(),
            ceiling_cm: default_ceiling(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            min_move_cm: default_min_move(),
            use_barometer: true,
            min_battery_pct: default_min_battery(),
            abort_on_low_battery: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use headsup_nav::config::AppConfig;
    ///
    /// let config = AppConfig::load("headsup.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the whole configuration before anything is sent to a vehicle
    ///
    /// Besides the controller invariants, a Tello link needs `min_move_cm`
    /// of at least the distance the Tello accepts, otherwise compensated
    /// moves would be rejected mid-flight.
    pub fn validate(&self) -> Result<()> {
        self.controller_config().validate()?;
        if self.vehicle.device_type == "tello" && self.motion.min_move_cm < tello::MIN_MOVE {
            return Err(Error::Config(format!(
                "min_move_cm {} is below the Tello minimum of {}cm",
                self.motion.min_move_cm,
                tello::MIN_MOVE
            )));
        }
        for step in &self.steps {
            step.validate()?;
        }
        Ok(())
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Extract the flight controller parameters
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            floor_cm: self.mission.floor_cm,
            ceiling_cm: self.mission.ceiling_cm,
            min_move_cm: self.motion.min_move_cm,
            use_barometer: self.motion.use_barometer,
            min_battery_pct: self.motion.min_battery_pct,
        }
    }
}

impl ControllerConfig {
    /// Check construction-time invariants
    ///
    /// # Errors
    /// `Error::Config` for inverted or negative bounds, a zero minimum move,
    /// or a battery threshold above 100%.
    pub fn validate(&self) -> Result<()> {
        self.bounds()?;
        if self.min_move_cm == 0 {
            return Err(Error::Config("min_move_cm must be positive".to_string()));
        }
        if self.min_battery_pct > 100 {
            return Err(Error::Config(format!(
                "min_battery_pct must be 0-100, got {}",
                self.min_battery_pct
            )));
        }
        Ok(())
    }

    /// Validated mission bounds
    pub fn bounds(&self) -> Result<MissionBounds> {
        MissionBounds::new(self.floor_cm, self.ceiling_cm)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        AppConfig::default().controller_config()
    }
}
