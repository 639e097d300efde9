//! Flight controller: bounded vertical moves and open-loop navigation

use super::planner::{plan_axis_aligned, plan_direct, rotate_to_bearing};
use crate::config::ControllerConfig;
use crate::core::driver::CommandSink;
use crate::core::types::{Command, Direction, Rotation};
use crate::error::{Error, Result};
use crate::events::{EventSink, FlightEvent};
use crate::motion::{BoundsDecision, Compensation, MissionBounds, compensate};
use crate::odometry::{HeightReference, HomePose, Pose, PoseTracker};

/// Result of the pre-flight battery advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryCheck {
    /// Reported charge (%)
    pub percent: u8,
    /// Configured minimum (%)
    pub minimum: u8,
}

impl BatteryCheck {
    /// Check if the charge meets the minimum
    pub fn is_ok(&self) -> bool {
        self.percent >= self.minimum
    }
}

/// Dead-reckoning flight controller
///
/// Owns the vehicle capability, the pose tracker and the event sink. Commands
/// are strictly serialized: each primitive is sent, acknowledged, and recorded
/// in the pose tracker before the next one is considered. A failed primitive
/// aborts the rest of the current operation and is returned to the caller;
/// nothing is retried.
///
/// Sharing a controller between threads requires wrapping the whole
/// controller in a mutex so that operations never interleave.
///
/// # Example
///
/// ```
/// use headsup_nav::config::ControllerConfig;
/// use headsup_nav::devices::mock::SimulatedVehicle;
/// use headsup_nav::events::LogSink;
/// use headsup_nav::navigation::FlightController;
///
/// # fn main() -> headsup_nav::Result<()> {
/// let vehicle = SimulatedVehicle::default();
/// let mut drone = FlightController::new(vehicle, ControllerConfig::default(), Box::new(LogSink))?;
///
/// drone.takeoff()?;
/// drone.go_to(30, -10)?;
/// drone.go_home(true)?;
/// drone.land()?;
/// # Ok(())
/// # }
/// ```
pub struct FlightController<S: CommandSink> {
    sink: S,
    tracker: PoseTracker,
    bounds: MissionBounds,
    config: ControllerConfig,
    events: Box<dyn EventSink>,
    flying: bool,
}

impl<S: CommandSink> FlightController<S> {
    /// Connect to the vehicle and set up the pose tracker at the origin
    ///
    /// The height reference is fixed here: with `use_barometer` the current
    /// barometer reading becomes the zero height for the whole flight.
    ///
    /// # Errors
    /// `Error::Config` for invalid parameters, or the sink's error if the
    /// vehicle cannot be reached.
    pub fn new(mut sink: S, config: ControllerConfig, events: Box<dyn EventSink>) -> Result<Self> {
        config.validate()?;
        let bounds = config.bounds()?;

        sink.connect()?;
        let reference = HeightReference::capture(&mut sink, config.use_barometer)?;

        log::debug!(
            "FlightController: Initialized with floor={}cm, ceiling={}cm, min_move={}cm, reference={:?}",
            bounds.floor,
            bounds.ceiling,
            config.min_move_cm,
            reference
        );

        Ok(Self {
            sink,
            tracker: PoseTracker::new(reference),
            bounds,
            config,
            events,
            flying: false,
        })
    }

    // === Primitive issuing ===

    /// Run one vehicle operation, recording failures in the trace
    fn perform<T>(
        &mut self,
        label: impl FnOnce() -> String,
        op: impl FnOnce(&mut S) -> Result<T>,
    ) -> Result<T> {
        match op(&mut self.sink) {
            Ok(value) => Ok(value),
            Err(e) => {
                let command = label();
                let reason = match &e {
                    Error::CommandFailed { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                self.events.record(&FlightEvent::CommandFailed {
                    command: command.clone(),
                    reason,
                });
                Err(match e {
                    Error::CommandFailed { .. } => e,
                    Error::Timeout => Error::command_failed(command, "no response from vehicle"),
                    other => other,
                })
            }
        }
    }

    /// Send a primitive without touching the pose tracker
    fn send(&mut self, command: Command) -> Result<()> {
        self.perform(
            || command.to_string(),
            |sink| match command {
                Command::Move { direction, cm } => sink.move_by(direction, cm),
                Command::Rotate { rotation, degrees } => sink.rotate(rotation, degrees),
            },
        )?;
        self.events.record(&FlightEvent::CommandIssued(command));
        Ok(())
    }

    /// Send a primitive and record it in the pose tracker
    fn issue(&mut self, command: Command) -> Result<()> {
        if let Command::Move { direction, cm } = command
            && self.tracker.after_move(direction, cm).is_none()
        {
            return Err(Error::Config(format!(
                "'{}' would move the pose estimate out of range",
                command
            )));
        }
        self.send(command)?;
        self.tracker.apply(&command);
        Ok(())
    }

    /// Issue a move, splitting it when shorter than the vehicle minimum
    fn issue_compensated(&mut self, direction: Direction, cm: u32) -> Result<()> {
        let compensation = compensate(direction, cm, self.config.min_move_cm);
        if let Compensation::Split { overshoot, ret } = compensation {
            self.events.record(&FlightEvent::Compensated {
                direction,
                amount: cm,
                overshoot,
                ret,
            });
        }

        for leg in compensation.legs() {
            self.issue(leg)?;
        }
        Ok(())
    }

    // === Lifecycle ===

    /// Take off
    pub fn takeoff(&mut self) -> Result<()> {
        log::info!("FlightController: Taking off");
        self.perform(|| "takeoff".to_string(), |sink| sink.takeoff())?;
        self.flying = true;
        if let Ok(height) = self.current_height() {
            log::info!("FlightController: Airborne at {}cm", height);
        }
        Ok(())
    }

    /// Land
    pub fn land(&mut self) -> Result<()> {
        log::info!("FlightController: Landing");
        self.perform(|| "land".to_string(), |sink| sink.land())?;
        self.flying = false;
        Ok(())
    }

    /// Close the vehicle link
    pub fn disconnect(&mut self) -> Result<()> {
        self.sink.disconnect()?;
        log::info!("FlightController: Vehicle connection closed");
        Ok(())
    }

    /// Pre-flight battery advisory
    ///
    /// Never blocks flight by itself; callers decide whether a low battery
    /// aborts the mission.
    pub fn check_battery(&mut self) -> Result<BatteryCheck> {
        let percent = self.sink.read_battery()?;
        let check = BatteryCheck {
            percent,
            minimum: self.config.min_battery_pct,
        };
        self.events.record(&FlightEvent::BatteryChecked {
            percent,
            minimum: check.minimum,
        });
        Ok(check)
    }

    // === Vertical motion ===

    /// Climb by `cm`, never ending above the ceiling
    ///
    /// If the vehicle is already above the ceiling the request is discarded
    /// and the vehicle descends back to the ceiling instead.
    pub fn fly_up(&mut self, cm: u32) -> Result<BoundsDecision> {
        self.fly_vertical(Direction::Up, cm)
    }

    /// Descend by `cm`, never ending below the floor
    ///
    /// If the vehicle is already below the floor the request is discarded
    /// and the vehicle climbs back to the floor instead.
    pub fn fly_down(&mut self, cm: u32) -> Result<BoundsDecision> {
        self.fly_vertical(Direction::Down, cm)
    }

    /// Move to the mission floor
    pub fn fly_to_floor(&mut self) -> Result<BoundsDecision> {
        let height = self.current_height()?;
        let floor = self.bounds.floor;
        if height >= floor {
            self.fly_down((height - floor) as u32)
        } else {
            self.fly_up((floor - height) as u32)
        }
    }

    /// Move to the mission ceiling
    pub fn fly_to_ceiling(&mut self) -> Result<BoundsDecision> {
        let height = self.current_height()?;
        let ceiling = self.bounds.ceiling;
        if height <= ceiling {
            self.fly_up((ceiling - height) as u32)
        } else {
            self.fly_down((height - ceiling) as u32)
        }
    }

    fn fly_vertical(&mut self, direction: Direction, cm: u32) -> Result<BoundsDecision> {
        let height = self.current_height()?;
        let ascending = direction == Direction::Up;
        let (decision, boundary) = if ascending {
            (self.bounds.ascend(cm, height), self.bounds.ceiling)
        } else {
            (self.bounds.descend(cm, height), self.bounds.floor)
        };

        log::debug!(
            "FlightController: {} {}cm requested at {}cm (floor={}cm, ceiling={}cm)",
            direction,
            cm,
            height,
            self.bounds.floor,
            self.bounds.ceiling
        );

        match decision {
            BoundsDecision::AtBoundary => {
                self.events
                    .record(&FlightEvent::AtBoundary { direction, boundary });
                return Ok(decision);
            }
            BoundsDecision::Clamped { requested, allowed } => {
                self.events.record(&FlightEvent::BoundsClamped {
                    direction,
                    requested,
                    allowed,
                    boundary,
                });
            }
            BoundsDecision::Correction(amount) => {
                self.events.record(&FlightEvent::BoundsCorrection {
                    requested: direction,
                    corrective: decision.direction(direction),
                    amount,
                    height,
                    boundary,
                });
            }
            BoundsDecision::Proceed(_) => {}
        }

        self.issue_compensated(decision.direction(direction), decision.amount())?;

        if log::log_enabled!(log::Level::Debug)
            && let Ok(height) = self.current_height()
        {
            log::debug!("FlightController: Height now {}cm", height);
        }
        Ok(decision)
    }

    // === Horizontal motion ===

    /// Issue a tracked move without bounds or compensation
    pub fn move_by(&mut self, direction: Direction, cm: u32) -> Result<()> {
        if cm == 0 {
            return Ok(());
        }
        self.issue(Command::move_by(direction, cm))
    }

    /// Issue a tracked rotation
    pub fn rotate(&mut self, rotation: Rotation, degrees: u32) -> Result<()> {
        if degrees == 0 {
            return Ok(());
        }
        self.issue(Command::rotate_by(rotation, degrees))
    }

    /// Turn through the shorter way to a counter-clockwise bearing
    pub fn rotate_to_bearing(&mut self, ccw: u32) -> Result<()> {
        let (rotation, degrees) = rotate_to_bearing(ccw);
        self.events.record(&FlightEvent::BearingChosen {
            ccw,
            rotation,
            degrees,
        });
        self.rotate(rotation, degrees)
    }

    /// Fly to `(x, y)` along the X axis, then the Y axis
    pub fn go_to(&mut self, x: i32, y: i32) -> Result<()> {
        let from = self.tracker.pose();
        log::info!(
            "FlightController: Going to ({}, {}) from ({}, {})",
            x,
            y,
            from.x,
            from.y
        );

        for leg in plan_axis_aligned(from, x, y) {
            self.issue(leg)?;
        }
        Ok(())
    }

    /// Turn toward `(x, y)` and fly there in a straight line
    ///
    /// The straight leg is assumed exact, so the pose jumps to the target
    /// once it is acknowledged.
    pub fn go_to_with_rotation(&mut self, x: i32, y: i32) -> Result<()> {
        let from = self.tracker.pose();
        let plan = plan_direct(from, x, y);
        log::info!(
            "FlightController: Going direct to ({}, {}) from ({}, {}), {}cm",
            x,
            y,
            from.x,
            from.y,
            plan.distance
        );

        self.rotate_to_bearing(plan.bearing_ccw)?;
        if plan.distance > 0 {
            self.send(Command::move_by(Direction::Forward, plan.distance))?;
        }
        self.tracker.set_position(x, y);
        Ok(())
    }

    /// Fly to `(x, y)` in either mode
    pub fn fly_to(&mut self, x: i32, y: i32, direct: bool) -> Result<()> {
        if direct {
            self.go_to_with_rotation(x, y)
        } else {
            self.go_to(x, y)
        }
    }

    /// Return to the marked home position
    pub fn go_home(&mut self, direct: bool) -> Result<()> {
        let home = self.tracker.home();
        log::info!("FlightController: Returning home to ({}, {})", home.x, home.y);
        self.fly_to(home.x, home.y, direct)
    }

    /// Mark the current position and height as home
    pub fn set_home(&mut self) -> Result<HomePose> {
        let height = self.current_height()?;
        let home = self.tracker.set_home(height);
        self.events.record(&FlightEvent::HomeSet {
            x: home.x,
            y: home.y,
            height: home.height,
        });
        Ok(home)
    }

    // === Accessories ===

    /// Set top LED color
    pub fn set_top_led(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
        self.perform(
            || format!("led {} {} {}", red, green, blue),
            |sink| sink.set_top_led(red, green, blue),
        )
    }

    /// Show a pattern on the LED matrix
    pub fn show_matrix(&mut self, pattern: &str, color: char) -> Result<()> {
        self.perform(
            || format!("matrix {}", color),
            |sink| sink.show_matrix(pattern, color),
        )
    }

    // === State ===

    /// Current height from the live sensor (cm)
    pub fn current_height(&mut self) -> Result<i32> {
        self.tracker.current_height(&mut self.sink)
    }

    /// Current pose estimate
    pub fn pose(&self) -> Pose {
        self.tracker.pose()
    }

    /// Current home
    pub fn home(&self) -> HomePose {
        self.tracker.home()
    }

    /// Mission bounds
    pub fn bounds(&self) -> MissionBounds {
        self.bounds
    }

    /// Construction parameters
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Check if a takeoff was acknowledged without a later landing
    pub fn is_flying(&self) -> bool {
        self.flying
    }

    /// Write an event to the flight trace
    pub fn record(&mut self, event: FlightEvent) {
        self.events.record(&event);
    }

    /// Borrow the vehicle
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Borrow the vehicle mutably (untracked access)
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Release the vehicle
    pub fn into_sink(self) -> S {
        self.sink
    }
}
