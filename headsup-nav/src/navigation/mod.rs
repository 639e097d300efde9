//! Dead-reckoning navigation: target planning and the flight controller

pub mod controller;
pub mod planner;

pub use controller::{BatteryCheck, FlightController};
pub use planner::{DirectPlan, plan_axis_aligned, plan_direct};
