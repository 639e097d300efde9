//! Command planning for absolute targets.
//!
//! Two ways of reaching `(x, y)` from the current pose:
//! - **Axis-aligned**: independent forward/back then left/right legs
//! - **Direct-bearing**: turn toward the target, then one straight forward leg
//!
//! Everything here is pure; the controller issues the plans and updates
//! the pose tracker.

use crate::core::types::{Command, Direction, Rotation};
use crate::odometry::Pose;

/// Rotate-then-move plan for direct-bearing navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectPlan {
    /// Counter-clockwise bearing to the target (degrees)
    pub bearing_ccw: u32,
    /// Rotation that faces the target
    pub rotation: Rotation,
    /// Rotation amount (degrees)
    pub degrees: u32,
    /// Straight-line leg (cm)
    pub distance: u32,
}

impl DirectPlan {
    /// Commands in issue order, skipping zero-magnitude legs
    pub fn commands(&self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(2);
        if self.degrees > 0 {
            commands.push(Command::rotate_by(self.rotation, self.degrees));
        }
        if self.distance > 0 {
            commands.push(Command::move_by(Direction::Forward, self.distance));
        }
        commands
    }
}

/// Axis-aligned legs from `from` to `(x, y)`: X axis first, then Y
pub fn plan_axis_aligned(from: Pose, x: i32, y: i32) -> Vec<Command> {
    [
        axis_leg(from.x, x, Direction::Forward, Direction::Back),
        axis_leg(from.y, y, Direction::Left, Direction::Right),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Leg from `from` to `to` along one axis, `None` when already there
fn axis_leg(from: i32, to: i32, positive: Direction, negative: Direction) -> Option<Command> {
    // The span between two i32 values always fits in u32
    let delta = i64::from(to) - i64::from(from);
    let cm = delta.unsigned_abs() as u32;
    match delta.signum() {
        1 => Some(Command::move_by(positive, cm)),
        -1 => Some(Command::move_by(negative, cm)),
        _ => None,
    }
}

/// Rotate-then-move plan from `from` to `(x, y)`
pub fn plan_direct(from: Pose, x: i32, y: i32) -> DirectPlan {
    let bearing_ccw = bearing_ccw(from, x, y);
    let (rotation, degrees) = rotate_to_bearing(bearing_ccw);
    DirectPlan {
        bearing_ccw,
        rotation,
        degrees,
        distance: straight_line_distance(from, x, y),
    }
}

/// Counter-clockwise rotation toward `(x, y)`
///
/// `atan2(dx, dy)` in degrees, absolute value, truncated to whole degrees.
pub fn bearing_ccw(from: Pose, x: i32, y: i32) -> u32 {
    let dx = f64::from(x) - f64::from(from.x);
    let dy = f64::from(y) - f64::from(from.y);
    dx.atan2(dy).to_degrees().abs() as u32
}

/// Shorter of `ccw` counter-clockwise or `360 - ccw` clockwise
///
/// Equal costs (180°) turn counter-clockwise.
pub fn rotate_to_bearing(ccw: u32) -> (Rotation, u32) {
    let ccw = ccw % 360;
    let cw = 360 - ccw;
    if ccw > cw {
        (Rotation::Clockwise, cw)
    } else {
        (Rotation::CounterClockwise, ccw)
    }
}

/// Euclidean distance to `(x, y)`, rounded to the nearest cm
pub fn straight_line_distance(from: Pose, x: i32, y: i32) -> u32 {
    let dx = f64::from(x) - f64::from(from.x);
    let dy = f64::from(y) - f64::from(from.y);
    dx.hypot(dy).round() as u32
}
