//! Tello / RoboMaster TT driver
//!
//! Blocking request/response over the SDK text protocol. Each call sends one
//! datagram and waits for exactly one reply; motion commands are never
//! resent, even after a timeout.

mod protocol;

use crate::config::VehicleConfig;
use crate::core::driver::CommandSink;
use crate::core::types::{Direction, Rotation};
use crate::error::{Error, Result};
use crate::transport::{Transport, UdpTransport};

use std::time::{Duration, Instant};

pub use protocol::{MAX_MOVE, MIN_MOVE, TelloCommand, capped_color};

/// Largest reply we expect from the vehicle
const RESPONSE_BUFFER_SIZE: usize = 1024;

/// Tello SDK driver
pub struct TelloDriver<T: Transport> {
    transport: T,
    timeout: Duration,
    connected: bool,
    buffer: Vec<u8>,
}

impl TelloDriver<UdpTransport> {
    /// Open the UDP link described by `config`
    pub fn open(config: &VehicleConfig) -> Result<Self> {
        let transport = UdpTransport::open(&config.local_bind, &config.address)?;
        Ok(Self::new(
            transport,
            Duration::from_millis(config.response_timeout_ms),
        ))
    }
}

impl<T: Transport> TelloDriver<T> {
    /// Wrap a transport; `timeout` bounds the wait for each reply
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            connected: false,
            buffer: vec![0u8; RESPONSE_BUFFER_SIZE],
        }
    }

    /// Check if SDK mode was entered
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and wait for its reply
    fn exchange(&mut self, command: &TelloCommand) -> Result<String> {
        let dropped = self.transport.discard_pending()?;
        if dropped > 0 {
            log::warn!("Tello: Dropped {} late responses", dropped);
        }

        let request = command.encode();
        log::debug!("Tello: -> {}", request);
        self.transport.write(request.as_bytes())?;

        let deadline = Instant::now() + self.timeout;
        loop {
            let n = self.transport.read(&mut self.buffer)?;
            if n > 0 {
                let response = String::from_utf8_lossy(&self.buffer[..n]).trim().to_string();
                log::debug!("Tello: <- {}", response);
                return Ok(response);
            }
            if Instant::now() >= deadline {
                log::warn!("Tello: No response to '{}' after {:?}", request, self.timeout);
                return Err(Error::Timeout);
            }
        }
    }

    /// Send an action and require `ok`
    fn action(&mut self, command: TelloCommand) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        let response = self.exchange(&command)?;
        protocol::parse_ack(&command, &response)
    }

    /// Send a query and return the raw reply
    fn query(&mut self, command: TelloCommand) -> Result<String> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        let response = self.exchange(&command)?;
        if response.starts_with("error") {
            return Err(Error::command_failed(command.encode(), response));
        }
        Ok(response)
    }
}

impl<T: Transport> CommandSink for TelloDriver<T> {
    fn connect(&mut self) -> Result<()> {
        let response = self.exchange(&TelloCommand::Command).inspect_err(|_| {
            log::error!("Tello: Failed to enter SDK mode");
            log::error!("Tello: Check that this machine is on the vehicle's WiFi network");
        })?;
        protocol::parse_ack(&TelloCommand::Command, &response)?;
        self.connected = true;
        log::info!("Tello: SDK mode entered");
        Ok(())
    }

    fn move_by(&mut self, direction: Direction, cm: u32) -> Result<()> {
        self.action(TelloCommand::movement(direction, cm)?)
    }

    fn rotate(&mut self, rotation: Rotation, degrees: u32) -> Result<()> {
        self.action(TelloCommand::rotation(rotation, degrees)?)
    }

    fn takeoff(&mut self) -> Result<()> {
        self.action(TelloCommand::Takeoff)
    }

    fn land(&mut self) -> Result<()> {
        self.action(TelloCommand::Land)
    }

    fn read_height(&mut self) -> Result<i32> {
        let response = self.query(TelloCommand::Height)?;
        protocol::parse_height(&response)
    }

    fn read_barometer(&mut self) -> Result<i32> {
        let response = self.query(TelloCommand::Barometer)?;
        protocol::parse_barometer(&response)
    }

    fn read_battery(&mut self) -> Result<u8> {
        let response = self.query(TelloCommand::Battery)?;
        protocol::parse_battery(&response)
    }

    fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        log::info!("Tello: Connection closed");
        Ok(())
    }

    fn read_temperature(&mut self) -> Result<f32> {
        let response = self.query(TelloCommand::Temperature)?;
        protocol::parse_temperature(&response)
    }

    fn set_top_led(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
        self.action(TelloCommand::Led(red, green, blue))
    }

    fn show_matrix(&mut self, pattern: &str, color: char) -> Result<()> {
        self.action(TelloCommand::matrix(pattern, color)?)
    }
}
