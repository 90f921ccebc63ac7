#![warn(clippy::pedantic)]

pub mod config;
pub mod console;
pub mod frame;
pub mod hardware;
pub mod sequencer;
pub mod server;

#[non_exhaustive]
#[derive(Debug)]
/// The full enumeration of all errors which can occur during a stimulus run.
pub enum DriverError {
    /// There was an I/O error when reading the configuration or writing to a log file.
    Io(std::io::Error),
    /// There was an error with serialization or deserialization.
    Serde(serde_json::Error),
    /// There was an error while attempting to perform some GPIO action.
    Gpio(gpio_cdev::Error),
    /// The configuration was incorrectly formed.
    Configuration(config::Error),
    /// The user gave the wrong input arguments to the main executable.
    Args(String),
}

impl From<serde_json::Error> for DriverError {
    fn from(err: serde_json::Error) -> Self {
        DriverError::Serde(err)
    }
}

impl From<gpio_cdev::Error> for DriverError {
    fn from(err: gpio_cdev::Error) -> Self {
        DriverError::Gpio(err)
    }
}

impl From<config::Error> for DriverError {
    fn from(err: config::Error) -> Self {
        DriverError::Configuration(err)
    }
}

impl From<std::io::Error> for DriverError {
    fn from(err: std::io::Error) -> Self {
        DriverError::Io(err)
    }
}
