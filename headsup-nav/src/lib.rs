//! HeadsUp - Dead-reckoning navigation for relative-command drones
//!
//! The vehicle only understands relative primitives ("move 30 cm forward",
//! "rotate 90° clockwise") and reports height but not position. This library
//! keeps an open-loop pose estimate from the commands it issues, plans
//! absolute targets into primitives, keeps every vertical move inside a
//! floor/ceiling band and splits moves shorter than the vehicle minimum.
//!
//! ## Modules
//!
//! - [`navigation`]: flight controller and target planning
//! - [`motion`]: bounds policy and minimum-move compensation
//! - [`odometry`]: pose tracking and height reference
//! - [`mission`]: scripted missions
//! - [`devices`]: Tello driver and simulated vehicle
//! - [`events`]: flight decision trace

pub mod config;
pub mod core;
pub mod devices;
pub mod error;
pub mod events;
pub mod mission;
pub mod motion;
pub mod navigation;
pub mod odometry;
pub mod transport;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::core::driver::CommandSink;
pub use crate::core::types::{Command, Direction, Rotation};
pub use crate::error::{Error, Result};
pub use crate::navigation::FlightController;
pub use crate::odometry::Pose;
