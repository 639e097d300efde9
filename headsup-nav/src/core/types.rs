//! Primitive command types shared by the planner and vehicle drivers.
//!
//! - [`Direction`]: the six translation primitives the vehicle accepts
//! - [`Rotation`]: yaw sense (clockwise / counter-clockwise)
//! - [`Command`]: one primitive instruction, built, sent, then dropped

use serde::{Deserialize, Serialize};
use std::fmt;

/// Translation direction in the vehicle body frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
}

/// Axis a direction moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Forward/back, tracked as `x`
    X,
    /// Left/right, tracked as `y`
    Y,
    /// Up/down, measured by the height sensor
    Z,
}

impl Direction {
    /// Direction pointing the other way along the same axis
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Back,
            Self::Back => Self::Forward,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Axis and sign for this direction (forward:+x, back:-x, left:+y, right:-y, up:+z, down:-z)
    pub fn axis_sign(self) -> (Axis, i32) {
        match self {
            Self::Forward => (Axis::X, 1),
            Self::Back => (Axis::X, -1),
            Self::Left => (Axis::Y, 1),
            Self::Right => (Axis::Y, -1),
            Self::Up => (Axis::Z, 1),
            Self::Down => (Axis::Z, -1),
        }
    }

    /// Keyword used on the vehicle wire protocol
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Yaw rotation sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[serde(alias = "cw")]
    Clockwise,
    #[serde(alias = "ccw")]
    CounterClockwise,
}

impl Rotation {
    /// Heading change sign (headings grow counter-clockwise)
    pub fn sign(self) -> i32 {
        match self {
            Self::Clockwise => -1,
            Self::CounterClockwise => 1,
        }
    }

    /// Keyword used on the vehicle wire protocol
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clockwise => "cw",
            Self::CounterClockwise => "ccw",
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One primitive instruction for the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// Translate `cm` centimeters
    Move { direction: Direction, cm: u32 },
    /// Yaw in place by `degrees`
    Rotate { rotation: Rotation, degrees: u32 },
}

impl Command {
    /// Create a move command
    pub fn move_by(direction: Direction, cm: u32) -> Self {
        Self::Move { direction, cm }
    }

    /// Create a rotate command
    pub fn rotate_by(rotation: Rotation, degrees: u32) -> Self {
        Self::Rotate { rotation, degrees }
    }

    /// Magnitude in cm or degrees
    pub fn magnitude(&self) -> u32 {
        match self {
            Self::Move { cm, .. } => *cm,
            Self::Rotate { degrees, .. } => *degrees,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { direction, cm } => write!(f, "{} {}", direction, cm),
            Self::Rotate { rotation, degrees } => write!(f, "{} {}", rotation, degrees),
        }
    }
}
