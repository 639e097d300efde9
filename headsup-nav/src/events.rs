//! Flight decision trace
//!
//! The position estimate is open-loop, so the only way to audit a flight
//! afterwards is a record of every decision the controller made. Events are
//! written to an [`EventSink`] handed to the controller at construction.
//!
//! | Sink | Use |
//! |------|-----|
//! | [`LogSink`] | Forward to the `log` facade (binary default) |
//! | [`FileSink`] | Append to a flight log file (`[logging] file`) |
//! | [`RecordingSink`] | Keep events in memory for inspection (tests, reports) |

use crate::core::types::{Command, Direction, Rotation};
use crate::error::Result;
use parking_lot::Mutex;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Severity of a flight event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// One decision or outcome in the flight trace
#[derive(Debug, Clone, PartialEq)]
pub enum FlightEvent {
    /// Mission header written before the first command
    MissionStarted {
        name: String,
        vehicle: String,
        floor: i32,
        ceiling: i32,
    },

    /// Mission step about to run
    StepStarted { index: usize, description: String },

    /// Mission stopped before the next step
    MissionCancelled { completed_steps: usize },

    /// Primitive acknowledged by the vehicle
    CommandIssued(Command),

    /// Primitive reported as failed; the rest of the plan is dropped
    CommandFailed { command: String, reason: String },

    /// Vertical request shortened to land on a boundary
    BoundsClamped {
        direction: Direction,
        requested: u32,
        allowed: u32,
        boundary: i32,
    },

    /// Vehicle already outside the bounds; request replaced by a move back
    BoundsCorrection {
        requested: Direction,
        corrective: Direction,
        amount: u32,
        height: i32,
        boundary: i32,
    },

    /// Vertical request dropped because the vehicle sits on the boundary
    AtBoundary { direction: Direction, boundary: i32 },

    /// Short move split into overshoot and return legs
    Compensated {
        direction: Direction,
        amount: u32,
        overshoot: Command,
        ret: Command,
    },

    /// Rotation picked for a bearing
    BearingChosen {
        ccw: u32,
        rotation: Rotation,
        degrees: u32,
    },

    /// Home marked at the current position
    HomeSet { x: i32, y: i32, height: i32 },

    /// Pre-flight battery advisory
    BatteryChecked { percent: u8, minimum: u8 },
}

impl FlightEvent {
    /// Fixed severity for this event kind
    pub fn level(&self) -> EventLevel {
        match self {
            Self::CommandIssued(_) | Self::BearingChosen { .. } => EventLevel::Debug,
            Self::MissionStarted { .. }
            | Self::StepStarted { .. }
            | Self::AtBoundary { .. }
            | Self::HomeSet { .. } => EventLevel::Info,
            Self::BoundsClamped { .. }
            | Self::BoundsCorrection { .. }
            | Self::Compensated { .. }
            | Self::MissionCancelled { .. } => EventLevel::Warning,
            Self::CommandFailed { .. } => EventLevel::Error,
            Self::BatteryChecked { percent, minimum } => {
                if percent < minimum {
                    EventLevel::Critical
                } else {
                    EventLevel::Info
                }
            }
        }
    }
}

impl fmt::Display for FlightEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissionStarted {
                name,
                vehicle,
                floor,
                ceiling,
            } => write!(
                f,
                "Mission '{}' on {} (floor {}cm, ceiling {}cm)",
                name, vehicle, floor, ceiling
            ),
            Self::StepStarted { index, description } => {
                write!(f, "Step {}: {}", index + 1, description)
            }
            Self::MissionCancelled { completed_steps } => {
                write!(f, "Mission cancelled after {} steps", completed_steps)
            }
            Self::CommandIssued(cmd) => write!(f, "Issued '{}'", cmd),
            Self::CommandFailed { command, reason } => {
                write!(f, "Command '{}' failed: {} - aborting plan", command, reason)
            }
            Self::BoundsClamped {
                direction,
                requested,
                allowed,
                boundary,
            } => write!(
                f,
                "Moving {} {}cm would cross {}cm, moving {}cm instead",
                direction, requested, boundary, allowed
            ),
            Self::BoundsCorrection {
                requested,
                corrective,
                amount,
                height,
                boundary,
            } => write!(
                f,
                "Height {}cm is outside boundary {}cm, ignoring {} request and moving {} {}cm",
                height, boundary, requested, corrective, amount
            ),
            Self::AtBoundary {
                direction,
                boundary,
            } => write!(f, "Already at {}cm, ignoring {} request", boundary, direction),
            Self::Compensated {
                direction,
                amount,
                overshoot,
                ret,
            } => write!(
                f,
                "Move {} {}cm below minimum, issuing '{}' then '{}'",
                direction, amount, overshoot, ret
            ),
            Self::BearingChosen {
                ccw,
                rotation,
                degrees,
            } => write!(
                f,
                "Bearing {}° ccw, rotating {} {}°",
                ccw, rotation, degrees
            ),
            Self::HomeSet { x, y, height } => {
                write!(f, "Home set to ({}, {}) at {}cm", x, y, height)
            }
            Self::BatteryChecked { percent, minimum } => {
                if percent < minimum {
                    write!(f, "Battery {}% below minimum {}%", percent, minimum)
                } else {
                    write!(f, "Battery {}% (minimum {}%)", percent, minimum)
                }
            }
        }
    }
}

/// Destination for flight events
pub trait EventSink: Send {
    /// Record one event
    fn record(&mut self, event: &FlightEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&mut self, event: &FlightEvent) {
        match event.level() {
            EventLevel::Debug => log::debug!("Flight: {}", event),
            EventLevel::Info => log::info!("Flight: {}", event),
            EventLevel::Warning => log::warn!("Flight: {}", event),
            EventLevel::Error => log::error!("Flight: {}", event),
            EventLevel::Critical => log::error!("Flight: CRITICAL {}", event),
        }
    }
}

/// Keeps events in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<FlightEvent>>>,
    forward: bool,
}

impl RecordingSink {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that also forwards to [`LogSink`]
    pub fn with_logging() -> Self {
        Self {
            events: Arc::default(),
            forward: true,
        }
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<FlightEvent> {
        self.events.lock().clone()
    }

    /// Recorded events at or above `level`
    pub fn at_least(&self, level: EventLevel) -> Vec<FlightEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.level() >= level)
            .cloned()
            .collect()
    }

    /// Commands acknowledged so far, in order
    pub fn issued(&self) -> Vec<Command> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                FlightEvent::CommandIssued(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingSink {
    fn record(&mut self, event: &FlightEvent) {
        if self.forward {
            LogSink.record(event);
        }
        self.events.lock().push(event.clone());
    }
}

/// Appends events to a flight log file, one line each
///
/// Lines read `<unix seconds> - <LEVEL> - <event>`. Every line is flushed
/// as it is written, so the trace survives a crash mid-flight. Earlier
/// flights in the same file are kept.
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    forward: bool,
}

impl FileSink {
    /// Open `path` for appending, creating it and its parent directories
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        log::info!("FileSink: Appending flight log to {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            forward: false,
        })
    }

    /// Also forward every event to [`LogSink`]
    pub fn with_logging(mut self) -> Self {
        self.forward = true;
        self
    }

    /// Log file being written
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for FileSink {
    fn record(&mut self, event: &FlightEvent) {
        if self.forward {
            LogSink.record(event);
        }
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        let written = writeln!(self.writer, "{:.3} - {} - {}", timestamp, event.level(), event)
            .and_then(|_| self.writer.flush());
        if let Err(e) = written {
            log::warn!("FileSink: Failed to write to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let clamp = FlightEvent::BoundsClamped {
            direction: Direction::Up,
            requested: 50,
            allowed: 20,
            boundary: 160,
        };
        assert_eq!(clamp.level(), EventLevel::Warning);

        let low = FlightEvent::BatteryChecked {
            percent: 10,
            minimum: 20,
        };
        assert_eq!(low.level(), EventLevel::Critical);

        let ok = FlightEvent::BatteryChecked {
            percent: 80,
            minimum: 20,
        };
        assert_eq!(ok.level(), EventLevel::Info);
    }

    #[test]
    fn test_recording_sink_shares_buffer() {
        let recorder = RecordingSink::new();
        let mut handle: Box<dyn EventSink> = Box::new(recorder.clone());

        handle.record(&FlightEvent::CommandIssued(Command::move_by(
            Direction::Forward,
            30,
        )));
        handle.record(&FlightEvent::HomeSet {
            x: 0,
            y: 0,
            height: 80,
        });

        assert_eq!(recorder.events().len(), 2);
        assert_eq!(
            recorder.issued(),
            vec![Command::move_by(Direction::Forward, 30)]
        );
        assert_eq!(recorder.at_least(EventLevel::Info).len(), 1);

        recorder.clear();
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight_logs").join("mission.log");

        let mut sink = FileSink::append(&path).unwrap();
        sink.record(&FlightEvent::HomeSet {
            x: 0,
            y: 0,
            height: 80,
        });
        sink.record(&FlightEvent::AtBoundary {
            direction: Direction::Up,
            boundary: 160,
        });
        drop(sink);

        // A second flight keeps the first one's lines
        let mut sink = FileSink::append(&path).unwrap();
        sink.record(&FlightEvent::CommandFailed {
            command: "forward 30".to_string(),
            reason: "error".to_string(),
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" - INFO - Home set to (0, 0) at 80cm"));
        assert!(lines[1].ends_with(" - INFO - Already at 160cm, ignoring up request"));
        assert!(
            lines[2].ends_with(" - ERROR - Command 'forward 30' failed: error - aborting plan")
        );

        let timestamp: f64 = lines[0].split(" - ").next().unwrap().parse().unwrap();
        assert!(timestamp > 0.0);
    }

    #[test]
    fn test_display() {
        let event = FlightEvent::Compensated {
            direction: Direction::Up,
            amount: 10,
            overshoot: Command::move_by(Direction::Down, 20),
            ret: Command::move_by(Direction::Up, 30),
        };
        assert_eq!(
            event.to_string(),
            "Move up 10cm below minimum, issuing 'down 20' then 'up 30'"
        );
    }
}
