//! Device implementations

pub mod mock;
pub mod tello;

use crate::config::VehicleConfig;
use crate::core::driver::CommandSink;
use crate::error::{Error, Result};
use mock::SimulatedVehicle;
use tello::TelloDriver;

/// Create a vehicle driver based on configuration
///
/// The driver is returned unconnected; the flight controller connects it.
pub fn create_device(config: &VehicleConfig) -> Result<Box<dyn CommandSink>> {
    match config.device_type.as_str() {
        "tello" => {
            let driver = TelloDriver::open(config)?;
            Ok(Box::new(driver))
        }
        "mock" => Ok(Box::new(SimulatedVehicle::new(config.simulation.clone()))),
        _ => Err(Error::UnknownDevice(config.device_type.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_device() {
        let config = VehicleConfig {
            device_type: "crazyflie".to_string(),
            ..VehicleConfig::default()
        };
        assert!(matches!(create_device(&config), Err(Error::UnknownDevice(_))));
    }

    #[test]
    fn test_mock_device() {
        let config = VehicleConfig {
            device_type: "mock".to_string(),
            ..VehicleConfig::default()
        };
        let mut device = create_device(&config).unwrap();
        device.connect().unwrap();
        assert_eq!(device.read_battery().unwrap(), 87);
    }
}
