//! Open-loop position tracking from issued commands
//!
//! The vehicle reports no position, so the pose is integrated from the
//! commands the controller has successfully sent. Each acknowledged primitive
//! updates the tracker exactly once, immediately after it is issued; nothing
//! is predicted ahead and nothing is rolled back.
//!
//! Frame conventions (local, origin at construction):
//! - `x`: forward (+) / back (-)
//! - `y`: left (+) / right (-)
//! - `heading`: degrees in `[0, 360)`, growing counter-clockwise

use crate::core::driver::CommandSink;
use crate::core::types::{Axis, Command, Direction, Rotation};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Estimated planar pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Forward/back offset from origin (cm)
    pub x: i32,

    /// Left/right offset from origin (cm)
    pub y: i32,

    /// Yaw (degrees, `[0, 360)`)
    pub heading: u32,
}

impl Pose {
    /// Create a pose, normalizing the heading
    pub fn new(x: i32, y: i32, heading: i32) -> Self {
        Self {
            x,
            y,
            heading: normalize_heading(heading),
        }
    }

    /// Check if the planar position matches
    pub fn same_position(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }
}

/// Snapshot taken by "mark home here"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HomePose {
    pub x: i32,
    pub y: i32,
    /// Height when home was marked (cm)
    pub height: i32,
}

/// Origin used to turn sensor readings into relative height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightReference {
    /// Height = live barometer reading minus the reading captured at connect time
    Barometer {
        /// Barometer reading at connect time (cm)
        baseline: i32,
    },

    /// Height straight from the vehicle's distance sensor
    RangeSensor,
}

impl HeightReference {
    /// Select the height source once, capturing the barometer baseline if needed
    pub fn capture<S: CommandSink + ?Sized>(sink: &mut S, use_barometer: bool) -> Result<Self> {
        if use_barometer {
            let baseline = sink.read_barometer()?;
            log::debug!("HeightReference: Barometer baseline captured at {}cm", baseline);
            Ok(Self::Barometer { baseline })
        } else {
            log::debug!("HeightReference: Using range sensor height");
            Ok(Self::RangeSensor)
        }
    }

    /// Current height (cm), recomputed from a fresh sensor reading
    pub fn height<S: CommandSink + ?Sized>(&self, sink: &mut S) -> Result<i32> {
        match *self {
            Self::Barometer { baseline } => Ok(sink.read_barometer()? - baseline),
            Self::RangeSensor => sink.read_height(),
        }
    }
}

/// Pose and home tracker for one controller
#[derive(Debug, Clone)]
pub struct PoseTracker {
    pose: Pose,
    home: HomePose,
    reference: HeightReference,
}

impl PoseTracker {
    /// Create a tracker at the origin with home at the origin
    pub fn new(reference: HeightReference) -> Self {
        Self {
            pose: Pose::default(),
            home: HomePose::default(),
            reference,
        }
    }

    /// Record an issued move
    ///
    /// Vertical moves leave the planar pose untouched; height is always
    /// measured, never integrated.
    pub fn apply_move(&mut self, direction: Direction, cm: u32) {
        let Some(pose) = self.after_move(direction, cm) else {
            log::error!(
                "PoseTracker: {} {}cm leaves the coordinate range, pose kept at ({}, {})",
                direction,
                cm,
                self.pose.x,
                self.pose.y
            );
            return;
        };
        self.pose = pose;
        log::debug!(
            "PoseTracker: {} {}cm -> ({}, {})",
            direction,
            cm,
            self.pose.x,
            self.pose.y
        );
    }

    /// Pose after a move, or `None` if it would leave the `i32` range
    pub fn after_move(&self, direction: Direction, cm: u32) -> Option<Pose> {
        let (axis, sign) = direction.axis_sign();
        let delta = i64::from(sign) * i64::from(cm);
        let mut pose = self.pose;
        match axis {
            Axis::X => pose.x = i32::try_from(i64::from(pose.x) + delta).ok()?,
            Axis::Y => pose.y = i32::try_from(i64::from(pose.y) + delta).ok()?,
            Axis::Z => {}
        }
        Some(pose)
    }

    /// Record an issued rotation
    pub fn apply_rotate(&mut self, rotation: Rotation, degrees: u32) {
        let heading = self.pose.heading as i32 + rotation.sign() * (degrees % 360) as i32;
        self.pose.heading = normalize_heading(heading);
        log::debug!(
            "PoseTracker: {} {}° -> heading {}°",
            rotation,
            degrees,
            self.pose.heading
        );
    }

    /// Record any issued primitive
    pub fn apply(&mut self, command: &Command) {
        match *command {
            Command::Move { direction, cm } => self.apply_move(direction, cm),
            Command::Rotate { rotation, degrees } => self.apply_rotate(rotation, degrees),
        }
    }

    /// Jump to a position reached by a straight-line move
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.pose.x = x;
        self.pose.y = y;
        log::debug!("PoseTracker: Position set to ({}, {})", x, y);
    }

    /// Copy the current position and `height` into home
    pub fn set_home(&mut self, height: i32) -> HomePose {
        self.home = HomePose {
            x: self.pose.x,
            y: self.pose.y,
            height,
        };
        self.home
    }

    /// Current pose estimate
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Current home
    pub fn home(&self) -> HomePose {
        self.home
    }

    /// Current height from the live sensor (no filtering)
    pub fn current_height<S: CommandSink + ?Sized>(&self, sink: &mut S) -> Result<i32> {
        self.reference.height(sink)
    }
}

/// Wrap degrees into `[0, 360)`
pub fn normalize_heading(degrees: i32) -> u32 {
    degrees.rem_euclid(360) as u32
}
