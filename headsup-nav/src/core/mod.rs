//! Core abstractions between the planner and the vehicle.
//!
//! - [`driver::CommandSink`]: Trait to implement for new vehicles
//! - [`types`]: Directions, rotations and primitive commands

pub mod driver;
pub mod types;
