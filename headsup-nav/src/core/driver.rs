//! CommandSink trait definition

use crate::core::types::{Direction, Rotation};
use crate::error::{Error, Result};

/// Vehicle capability consumed by the flight controller
///
/// Every call blocks until the vehicle acknowledges (or the driver gives up)
/// and is issued exactly once. Implementations must never retry a motion
/// command on their own: a silently repeated move would displace the vehicle
/// twice while the open-loop position model counts it once.
pub trait CommandSink: Send {
    /// Enter command mode (called once before flight)
    fn connect(&mut self) -> Result<()>;

    /// Translate `cm` centimeters in `direction`
    fn move_by(&mut self, direction: Direction, cm: u32) -> Result<()>;

    /// Yaw `degrees` in `rotation` sense
    fn rotate(&mut self, rotation: Rotation, degrees: u32) -> Result<()>;

    /// Automatic takeoff
    fn takeoff(&mut self) -> Result<()>;

    /// Automatic landing
    fn land(&mut self) -> Result<()>;

    /// Height above takeoff point from the distance sensor (cm)
    fn read_height(&mut self) -> Result<i32>;

    /// Absolute barometric altitude (cm)
    fn read_barometer(&mut self) -> Result<i32>;

    /// Battery charge (percent)
    fn read_battery(&mut self) -> Result<u8>;

    /// Close the link to the vehicle
    fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }

    /// Internal temperature (°C)
    fn read_temperature(&mut self) -> Result<f32> {
        Err(Error::NotSupported(
            "Temperature readout not supported".to_string(),
        ))
    }

    /// Set top LED color
    fn set_top_led(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
        let _ = (red, green, blue);
        Err(Error::NotSupported("Top LED not supported".to_string()))
    }

    /// Show a 64-cell pattern on the LED matrix
    ///
    /// `*` cells are lit in `color` (`r`, `b` or `p`), `0` cells are off.
    fn show_matrix(&mut self, pattern: &str, color: char) -> Result<()> {
        let _ = (pattern, color);
        Err(Error::NotSupported("LED matrix not supported".to_string()))
    }
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn connect(&mut self) -> Result<()> {
        (**self).connect()
    }

    fn move_by(&mut self, direction: Direction, cm: u32) -> Result<()> {
        (**self).move_by(direction, cm)
    }

    fn rotate(&mut self, rotation: Rotation, degrees: u32) -> Result<()> {
        (**self).rotate(rotation, degrees)
    }

    fn takeoff(&mut self) -> Result<()> {
        (**self).takeoff()
    }

    fn land(&mut self) -> Result<()> {
        (**self).land()
    }

    fn read_height(&mut self) -> Result<i32> {
        (**self).read_height()
    }

    fn read_barometer(&mut self) -> Result<i32> {
        (**self).read_barometer()
    }

    fn read_battery(&mut self) -> Result<u8> {
        (**self).read_battery()
    }

    fn disconnect(&mut self) -> Result<()> {
        (**self).disconnect()
    }

    fn read_temperature(&mut self) -> Result<f32> {
        (**self).read_temperature()
    }

    fn set_top_led(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
        (**self).set_top_led(red, green, blue)
    }

    fn show_matrix(&mut self, pattern: &str, color: char) -> Result<()> {
        (**self).show_matrix(pattern, color)
    }
}
