//! Ground-truth kinematics for the simulated vehicle
//!
//! Moves are executed in the body frame, so after a rotation the true
//! displacement differs from what an axis-aligned open-loop model assumes.

use crate::core::types::{Axis, Direction, Rotation};

/// True state of the simulated vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundTruth {
    /// World X (cm, forward at start)
    pub x: f64,
    /// World Y (cm, left at start)
    pub y: f64,
    /// Height above the takeoff point (cm)
    pub height: i32,
    /// Yaw (degrees CCW from start, `[0, 360)`)
    pub heading: u32,
}

impl GroundTruth {
    /// Create at the origin with the given height
    pub fn new(height: i32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            height,
            heading: 0,
        }
    }

    /// Translate `cm` in the body frame
    pub fn translate(&mut self, direction: Direction, cm: u32) {
        let (axis, sign) = direction.axis_sign();
        let distance = f64::from(sign) * f64::from(cm);
        let yaw = f64::from(self.heading).to_radians();
        let (sin, cos) = yaw.sin_cos();

        match axis {
            Axis::X => {
                self.x += distance * cos;
                self.y += distance * sin;
            }
            Axis::Y => {
                self.x -= distance * sin;
                self.y += distance * cos;
            }
            Axis::Z => self.height += sign * cm as i32,
        }
    }

    /// Yaw by `degrees`
    pub fn rotate(&mut self, rotation: Rotation, degrees: u32) {
        let heading = self.heading as i32 + rotation.sign() * (degrees % 360) as i32;
        self.heading = heading.rem_euclid(360) as u32;
    }
}
