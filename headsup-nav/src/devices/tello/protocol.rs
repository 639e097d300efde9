//! Tello SDK text protocol
//!
//! Request/response over UDP, one ASCII datagram each way:
//!
//! ```text
//! -> "forward 30"      <- "ok"
//! -> "cw 90"           <- "error Not joystick"
//! -> "baro?"           <- "41.26"       (metres)
//! -> "height?"         <- "8dm"
//! -> "temp?"           <- "63~65C"
//! -> "EXT led 0 200 50" <- "led ok"
//! ```

use crate::core::types::{Direction, Rotation};
use crate::error::{Error, Result};

/// Shortest move the vehicle accepts (cm)
pub const MIN_MOVE: u32 = 20;
/// Longest move the vehicle accepts (cm)
pub const MAX_MOVE: u32 = 500;
/// Largest single rotation (degrees)
pub const MAX_ROTATION: u32 = 360;
/// LED matrix cell count (8x8)
pub const MATRIX_CELLS: usize = 64;

/// Tello SDK command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelloCommand {
    /// Enter SDK mode
    Command,
    Takeoff,
    Land,
    Move(Direction, u32),
    Rotate(Rotation, u32),
    Battery,
    Barometer,
    Height,
    Temperature,
    /// Top LED color (Tello Talent expansion)
    Led(u8, u8, u8),
    /// Matrix pattern, already colored
    Matrix(String),
}

impl TelloCommand {
    /// Build a move, rejecting distances the vehicle refuses
    pub fn movement(direction: Direction, cm: u32) -> Result<Self> {
        if !(MIN_MOVE..=MAX_MOVE).contains(&cm) {
            return Err(Error::command_failed(
                format!("{} {}", direction, cm),
                format!("distance must be {}-{}cm", MIN_MOVE, MAX_MOVE),
            ));
        }
        Ok(Self::Move(direction, cm))
    }

    /// Build a rotation, rejecting angles the vehicle refuses
    pub fn rotation(rotation: Rotation, degrees: u32) -> Result<Self> {
        if !(1..=MAX_ROTATION).contains(&degrees) {
            return Err(Error::command_failed(
                format!("{} {}", rotation, degrees),
                format!("rotation must be 1-{} degrees", MAX_ROTATION),
            ));
        }
        Ok(Self::Rotate(rotation, degrees))
    }

    /// Build a matrix display from a `*`/`0` pattern
    ///
    /// Colors other than `r`, `b` and `p` fall back to `b`.
    pub fn matrix(pattern: &str, color: char) -> Result<Self> {
        let color = match color.to_ascii_lowercase() {
            c @ ('r' | 'b' | 'p') => c,
            _ => 'b',
        };
        if pattern.chars().count() != MATRIX_CELLS {
            return Err(Error::Config(format!(
                "matrix pattern must have {} cells, got {}",
                MATRIX_CELLS,
                pattern.chars().count()
            )));
        }
        if let Some(bad) = pattern.chars().find(|c| !matches!(c, '*' | '0' | 'r' | 'b' | 'p')) {
            return Err(Error::Config(format!("invalid matrix cell '{}'", bad)));
        }
        Ok(Self::Matrix(pattern.replace('*', &color.to_string())))
    }

    /// Wire text
    pub fn encode(&self) -> String {
        match self {
            Self::Command => "command".to_string(),
            Self::Takeoff => "takeoff".to_string(),
            Self::Land => "land".to_string(),
            Self::Move(direction, cm) => format!("{} {}", direction, cm),
            Self::Rotate(rotation, degrees) => format!("{} {}", rotation, degrees),
            Self::Battery => "battery?".to_string(),
            Self::Barometer => "baro?".to_string(),
            Self::Height => "height?".to_string(),
            Self::Temperature => "temp?".to_string(),
            Self::Led(r, g, b) => format!("EXT led {} {} {}", r, g, b),
            Self::Matrix(cells) => format!("EXT mled g {}", cells),
        }
    }
}

/// Clamp any integer color component into `0..=255`
pub fn capped_color(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Interpret the reply to an action command
///
/// Expansion-board commands answer with a prefixed `ok` (e.g. `led ok`).
pub fn parse_ack(command: &TelloCommand, response: &str) -> Result<()> {
    let response = response.trim();
    let accepted = response.eq_ignore_ascii_case("ok")
        || (matches!(command, TelloCommand::Led(..) | TelloCommand::Matrix(_))
            && response.to_ascii_lowercase().ends_with(" ok"));
    if accepted {
        Ok(())
    } else {
        Err(Error::command_failed(command.encode(), response))
    }
}

/// `battery?` reply: percent
pub fn parse_battery(response: &str) -> Result<u8> {
    let value: u32 = parse_number(response.trim())?;
    if value > 100 {
        return Err(Error::InvalidResponse(format!("battery {}%", value)));
    }
    Ok(value as u8)
}

/// `baro?` reply: metres as a float, returned in cm
pub fn parse_barometer(response: &str) -> Result<i32> {
    let metres: f64 = parse_number(response.trim())?;
    Ok((metres * 100.0).round() as i32)
}

/// `height?` reply: decimetres with a `dm` suffix, returned in cm
pub fn parse_height(response: &str) -> Result<i32> {
    let response = response.trim();
    let digits = response.strip_suffix("dm").unwrap_or(response);
    let decimetres: i32 = parse_number(digits)?;
    Ok(decimetres * 10)
}

/// `temp?` reply: `lo~hiC` range, returned as the midpoint in °C
pub fn parse_temperature(response: &str) -> Result<f32> {
    let response = response.trim();
    let range = response.strip_suffix('C').unwrap_or(response);
    match range.split_once('~') {
        Some((lo, hi)) => {
            let lo: f32 = parse_number(lo)?;
            let hi: f32 = parse_number(hi)?;
            Ok((lo + hi) / 2.0)
        }
        None => parse_number(range),
    }
}

fn parse_number<N: std::str::FromStr>(text: &str) -> Result<N> {
    text.trim()
        .parse()
        .map_err(|_| Error::InvalidResponse(format!("expected a number, got '{}'", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_encode() {
        assert_eq!(TelloCommand::Command.encode(), "command");
        assert_eq!(
            TelloCommand::movement(Direction::Forward, 30).unwrap().encode(),
            "forward 30"
        );
        assert_eq!(
            TelloCommand::rotation(Rotation::CounterClockwise, 90)
                .unwrap()
                .encode(),
            "ccw 90"
        );
        assert_eq!(TelloCommand::Led(0, 200, 50).encode(), "EXT led 0 200 50");
    }

    #[test]
    fn test_range_limits() {
        assert!(TelloCommand::movement(Direction::Up, 19).is_err());
        assert!(TelloCommand::movement(Direction::Up, 20).is_ok());
        assert!(TelloCommand::movement(Direction::Up, 500).is_ok());
        assert!(TelloCommand::movement(Direction::Up, 501).is_err());
        assert!(TelloCommand::rotation(Rotation::Clockwise, 0).is_err());
        assert!(TelloCommand::rotation(Rotation::Clockwise, 360).is_ok());
        assert!(TelloCommand::rotation(Rotation::Clockwise, 361).is_err());
    }

    #[test]
    fn test_matrix_coloring() {
        let pattern = "*000000*".repeat(8);
        let cmd = TelloCommand::matrix(&pattern, 'r').unwrap();
        assert_eq!(cmd.encode(), format!("EXT mled g {}", "r000000r".repeat(8)));

        // Unknown color falls back to blue
        let cmd = TelloCommand::matrix(&pattern, 'g').unwrap();
        assert_eq!(cmd.encode(), format!("EXT mled g {}", "b000000b".repeat(8)));

        assert!(matches!(
            TelloCommand::matrix("*0*", 'b'),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            TelloCommand::matrix(&"x".repeat(64), 'b'),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_capped_color() {
        assert_eq!(capped_color(-20), 0);
        assert_eq!(capped_color(120), 120);
        assert_eq!(capped_color(400), 255);
    }

    #[test]
    fn test_parse_ack() {
        assert!(parse_ack(&TelloCommand::Takeoff, "ok").is_ok());
        assert!(parse_ack(&TelloCommand::Takeoff, "ok\r\n").is_ok());
        assert!(parse_ack(&TelloCommand::Led(1, 2, 3), "led ok").is_ok());

        let err = parse_ack(&TelloCommand::Move(Direction::Up, 30), "error Motor stop").unwrap_err();
        match err {
            Error::CommandFailed { command, reason } => {
                assert_eq!(command, "up 30");
                assert_eq!(reason, "error Motor stop");
            }
            other => panic!("unexpected error {:?}", other),
        }
        // A prefixed ok only counts for expansion commands
        assert!(parse_ack(&TelloCommand::Land, "led ok").is_err());
    }

    #[test]
    fn test_parse_queries() {
        assert_eq!(parse_battery("87\r\n").unwrap(), 87);
        assert!(parse_battery("187").is_err());
        assert_eq!(parse_barometer("41.26").unwrap(), 4126);
        assert_eq!(parse_height("8dm").unwrap(), 80);
        assert_eq!(parse_height("0dm").unwrap(), 0);
        assert_relative_eq!(parse_temperature("63~65C").unwrap(), 64.0);
        assert_relative_eq!(parse_temperature("70C").unwrap(), 70.0);
        assert!(matches!(parse_height("ok"), Err(Error::InvalidResponse(_))));
    }
}
