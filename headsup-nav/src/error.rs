//! Error types for HeadsUp navigation

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// HeadsUp navigation error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration or mission parameter, rejected before sending
    #[error("Configuration error: {0}")]
    Config(String),

    /// The vehicle rejected or failed a primitive command
    #[error("Command '{command}' failed: {reason}")]
    CommandFailed {
        /// Wire form of the command that failed
        command: String,
        /// Vehicle response or transport failure
        reason: String,
    },

    /// No response from the vehicle in time
    #[error("Communication timeout")]
    Timeout,

    /// Response could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Operation not supported by this vehicle
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Unknown vehicle type in configuration
    #[error("Unknown device type: {0}")]
    UnknownDevice(String),

    /// Vehicle has not entered SDK mode
    #[error("Vehicle not connected")]
    NotConnected,

    /// Battery below the mission minimum
    #[error("Battery too low: {percent}% (minimum {minimum}%)")]
    LowBattery {
        /// Reported charge
        percent: u8,
        /// Configured minimum
        minimum: u8,
    },

    /// Mission stopped by operator before the next command
    #[error("Mission cancelled")]
    Cancelled,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a command failure from any displayable reason
    pub fn command_failed(command: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::CommandFailed {
            command: command.into(),
            reason: reason.to_string(),
        }
    }
}
