//! Simulated vehicle configuration
//!
//! | Parameter | Default | Note |
//! |-----------|---------|------|
//! | start_height_cm | 0 | On the ground |
//! | hover_height_cm | 80 | Height after takeoff |
//! | baro_baseline_cm | 4000 | Barometer reading on the ground |
//! | battery_pct | 87 | |
//! | temperature_c | 62.0 | |
//! | min_move_cm | 1 | Set to 20 to reject short moves like the real vehicle |
//! | max_move_cm | 500 | |

use serde::{Deserialize, Serialize};

/// Parameters of the simulated vehicle (`[vehicle.simulation]`)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Height at connect time (cm)
    #[serde(default)]
    pub start_height_cm: i32,

    /// Height reached by takeoff (cm)
    #[serde(default = "default_hover_height")]
    pub hover_height_cm: i32,

    /// Barometer reading at zero height (cm)
    #[serde(default = "default_baro_baseline")]
    pub baro_baseline_cm: i32,

    /// Battery charge (%)
    #[serde(default = "default_battery")]
    pub battery_pct: u8,

    /// Internal temperature (°C)
    #[serde(default = "default_temperature")]
    pub temperature_c: f32,

    /// Shortest accepted move (cm)
    #[serde(default = "default_min_move")]
    pub min_move_cm: u32,

    /// Longest accepted move (cm)
    #[serde(default = "default_max_move")]
    pub max_move_cm: u32,
}

fn default_hover_height() -> i32 {
    80
}
fn default_baro_baseline() -> i32 {
    4000
}
fn default_battery() -> u8 {
    87
}
fn default_temperature() -> f32 {
    62.0
}
fn default_min_move() -> u32 {
    1
}
fn default_max_move() -> u32 {
    500
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_height_cm: 0,
            hover_height_cm: default_hover_height(),
            baro_baseline_cm: default_baro_baseline(),
            battery_pct: default_battery(),
            temperature_c: default_temperature(),
            min_move_cm: default_min_move(),
            max_move_cm: default_max_move(),
        }
    }
}
