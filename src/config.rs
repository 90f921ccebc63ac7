use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
/// A configuration for an entire stimulus run.
/// Contains everything needed to drive one pass over a frame table.
pub struct Configuration {
    #[serde(default = "default_pause_cycles")]
    /// The number of idle clock advances between frames, during which chip
    /// select is released.
    /// May be omitted, in which case it defaults to 16.
    /// A value of 0 still produces one released advance between frames.
    pub pause_cycles: u32,
    /// The frames to transmit, in transmission order.
    /// May be empty, in which case the run finishes without driving anything.
    pub frames: Vec<Frame>,
    /// The pin ID of the clock input observed by the driver.
    pub pin_clk: u8,
    /// The pin ID of the chip select output.
    pub pin_cs: u8,
    /// The pin ID of the serial data output.
    pub pin_mosi: u8,
    /// The pin ID of the data/command marker output.
    pub pin_dc: u8,
}

/// The pause length used when a configuration does not specify one.
fn default_pause_cycles() -> u32 {
    16
}

#[derive(Debug, PartialEq, Eq)]
/// The set of errors that can occur when validating a configuration.
pub enum Error {
    /// The configuration was malformed and could not be parsed into a
    /// `Configuration` object.
    Malformed,
    /// Two signals were assigned to the same pin.
    PinConflict,
}

impl Configuration {
    /// Construct a new `Configuration` by parsing some readable source.
    /// Will also check the configuration to determine that there are no logical
    /// inconsistencies in its definition.
    ///
    /// # Errors
    ///
    /// This function will return errors in line with the definition of `Error`
    /// in this module.
    pub fn parse(source: &mut impl Read) -> Result<Configuration, Error> {
        // deserialize the configuration
        let config: Configuration =
            serde_json::from_reader(source).map_err(|_| Error::Malformed)?;

        // now validate it

        let pins = [config.pin_clk, config.pin_cs, config.pin_mosi, config.pin_dc];
        for (idx, pin) in pins.iter().enumerate() {
            if pins[idx + 1..].contains(pin) {
                return Err(Error::PinConflict);
            }
        }

        // all validation steps passed
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    /// Test the parsing of a full configuration string.
    fn full_config() {
        let config_str = r#"{
            "pause_cycles": 16,
            "frames": [
                { "data": 167, "control": 0 },
                { "data": 32, "control": 0 },
                { "data": 0, "control": 0 },
                { "data": 85, "control": 255 },
                { "data": 255, "control": 255 },
                { "data": 0, "control": 255 },
                { "data": 80, "control": 255 }
            ],
            "pin_clk": 11,
            "pin_cs": 8,
            "pin_mosi": 10,
            "pin_dc": 25
        }"#;

        let data = [0xA7, 0x20, 0x00, 0x55, 0xFF, 0x00, 0x50];
        let control = [0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];
        let config = Configuration {
            pause_cycles: 16,
            frames: data
                .into_iter()
                .zip(control)
                .map(|(data, control)| Frame { data, control })
                .collect(),
            pin_clk: 11,
            pin_cs: 8,
            pin_mosi: 10,
            pin_dc: 25,
        };

        let mut cursor = Cursor::new(config_str);
        assert_eq!(Configuration::parse(&mut cursor), Ok(config));
    }

    #[test]
    /// Test that an omitted pause length falls back to the stock value.
    fn default_pause() {
        let config_str = r#"{
            "frames": [],
            "pin_clk": 11,
            "pin_cs": 8,
            "pin_mosi": 10,
            "pin_dc": 25
        }"#;

        let mut cursor = Cursor::new(config_str);
        let config = Configuration::parse(&mut cursor).unwrap();

        assert_eq!(config.pause_cycles, 16);
        assert!(config.frames.is_empty());
    }

    #[test]
    /// Test that a configuration assigning two signals to one pin is rejected.
    fn pin_conflict() {
        let config_str = r#"{
            "pause_cycles": 4,
            "frames": [],
            "pin_clk": 11,
            "pin_cs": 8,
            "pin_mosi": 11,
            "pin_dc": 25
        }"#;

        let mut cursor = Cursor::new(config_str);
        assert_eq!(Configuration::parse(&mut cursor), Err(Error::PinConflict));
    }

    #[test]
    /// Test that garbage input is rejected as malformed.
    fn malformed() {
        let config_str = r#"{"pause_cycles": "#;

        let mut cursor = Cursor::new(config_str);
        assert_eq!(Configuration::parse(&mut cursor), Err(Error::Malformed));
    }
}
