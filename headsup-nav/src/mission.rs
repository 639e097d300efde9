//! Scripted missions
//!
//! A mission is an ordered list of [`MissionStep`]s, normally loaded from the
//! `[[steps]]` tables of the configuration file, run by [`MissionRunner`]
//! against one [`FlightController`].

use crate::core::driver::CommandSink;
use crate::core::types::Rotation;
use crate::devices::tello::{TelloCommand, capped_color};
use crate::error::{Error, Result};
use crate::events::FlightEvent;
use crate::navigation::FlightController;
use crate::odometry::Pose;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// One mission action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MissionStep {
    Takeoff,
    Land,
    FlyUp {
        cm: u32,
    },
    FlyDown {
        cm: u32,
    },
    FlyToFloor,
    FlyToCeiling,
    GoTo {
        x: i32,
        y: i32,
        /// Turn and fly straight instead of axis-aligned legs
        #[serde(default)]
        direct: bool,
    },
    GoHome {
        #[serde(default)]
        direct: bool,
    },
    SetHome,
    Rotate {
        direction: Rotation,
        degrees: u32,
    },
    /// Hover in place
    Wait {
        secs: f64,
    },
    /// Top LED color; components are capped to 0-255
    Led {
        r: i32,
        g: i32,
        b: i32,
    },
    /// 64-cell LED matrix pattern (`*` lit, `0` off)
    Matrix {
        pattern: String,
        #[serde(default = "default_matrix_color")]
        color: char,
    },
}

fn default_matrix_color() -> char {
    'b'
}

/// Hover time of a wait step; negative, NaN or unrepresentable values are rejected
fn wait_duration(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| Error::Config(format!("Invalid wait of {}s: {}", secs, e)))
}

impl MissionStep {
    /// Check step parameters that can be rejected before the vehicle moves
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Wait { secs } => wait_duration(*secs).map(|_| ()),
            Self::Matrix { pattern, color } => TelloCommand::matrix(pattern, *color).map(|_| ()),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for MissionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Takeoff => write!(f, "takeoff"),
            Self::Land => write!(f, "land"),
            Self::FlyUp { cm } => write!(f, "fly up {}cm", cm),
            Self::FlyDown { cm } => write!(f, "fly down {}cm", cm),
            Self::FlyToFloor => write!(f, "fly to floor"),
            Self::FlyToCeiling => write!(f, "fly to ceiling"),
            Self::GoTo { x, y, direct } => {
                let mode = if *direct { "direct" } else { "axis-aligned" };
                write!(f, "go to ({}, {}) {}", x, y, mode)
            }
            Self::GoHome { direct } => {
                let mode = if *direct { "direct" } else { "axis-aligned" };
                write!(f, "go home {}", mode)
            }
            Self::SetHome => write!(f, "set home"),
            Self::Rotate { direction, degrees } => write!(f, "rotate {} {}°", direction, degrees),
            Self::Wait { secs } => write!(f, "wait {}s", secs),
            Self::Led { r, g, b } => write!(f, "led ({}, {}, {})", r, g, b),
            Self::Matrix { color, .. } => write!(f, "matrix pattern in {}", color),
        }
    }
}

/// Outcome of a completed mission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionReport {
    /// Steps that finished successfully
    pub completed_steps: usize,
    /// Pose estimate after the last step
    pub final_pose: Pose,
}

/// Runs mission steps in order against one controller
#[derive(Debug, Clone)]
pub struct MissionRunner {
    cancel: Arc<AtomicBool>,
    abort_on_low_battery: bool,
}

impl MissionRunner {
    /// Create a runner with its own cancel flag
    pub fn new(abort_on_low_battery: bool) -> Self {
        Self::with_cancel_flag(Arc::new(AtomicBool::new(false)), abort_on_low_battery)
    }

    /// Create a runner observing an existing cancel flag (e.g. set by Ctrl-C)
    pub fn with_cancel_flag(cancel: Arc<AtomicBool>, abort_on_low_battery: bool) -> Self {
        Self {
            cancel,
            abort_on_low_battery,
        }
    }

    /// Shared cancel flag; setting it stops the mission before the next step
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Run `steps` in order, stopping at the first failure
    ///
    /// A command already sent is never interrupted; cancellation takes effect
    /// between steps and returns `Error::Cancelled`.
    pub fn run<S: CommandSink>(
        &self,
        drone: &mut FlightController<S>,
        steps: &[MissionStep],
    ) -> Result<MissionReport> {
        for step in steps {
            step.validate()?;
        }

        let battery = drone.check_battery()?;
        if !battery.is_ok() && self.abort_on_low_battery {
            return Err(Error::LowBattery {
                percent: battery.percent,
                minimum: battery.minimum,
            });
        }

        for (index, step) in steps.iter().enumerate() {
            if self.is_cancelled() {
                drone.record(FlightEvent::MissionCancelled {
                    completed_steps: index,
                });
                return Err(Error::Cancelled);
            }

            drone.record(FlightEvent::StepStarted {
                index,
                description: step.to_string(),
            });
            Self::execute(drone, step)?;
        }

        let report = MissionReport {
            completed_steps: steps.len(),
            final_pose: drone.pose(),
        };
        log::info!(
            "MissionRunner: Completed {} steps, final pose ({}, {}) heading {}°",
            report.completed_steps,
            report.final_pose.x,
            report.final_pose.y,
            report.final_pose.heading
        );
        Ok(report)
    }

    fn execute<S: CommandSink>(drone: &mut FlightController<S>, step: &MissionStep) -> Result<()> {
        match step {
            MissionStep::Takeoff => drone.takeoff(),
            MissionStep::Land => drone.land(),
            MissionStep::FlyUp { cm } => drone.fly_up(*cm).map(|_| ()),
            MissionStep::FlyDown { cm } => drone.fly_down(*cm).map(|_| ()),
            MissionStep::FlyToFloor => drone.fly_to_floor().map(|_| ()),
            MissionStep::FlyToCeiling => drone.fly_to_ceiling().map(|_| ()),
            MissionStep::GoTo { x, y, direct } => drone.fly_to(*x, *y, *direct),
            MissionStep::GoHome { direct } => drone.go_home(*direct),
            MissionStep::SetHome => drone.set_home().map(|_| ()),
            MissionStep::Rotate { direction, degrees } => drone.rotate(*direction, *degrees),
            MissionStep::Wait { secs } => {
                thread::sleep(wait_duration(*secs)?);
                Ok(())
            }
            MissionStep::Led { r, g, b } => {
                drone.set_top_led(capped_color(*r), capped_color(*g), capped_color(*b))
            }
            MissionStep::Matrix { pattern, color } => drone.show_matrix(pattern, *color),
        }
    }
}
