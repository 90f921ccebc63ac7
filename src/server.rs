/*
  twiddle, an SPI stimulus driver.
  Copyright (C) 2026 Rice Eclipse.

  twiddle is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  twiddle is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The outer harness: hardware construction and the clock observation loop.

use std::{
    fs::{create_dir_all, File},
    io::{BufReader, Write},
    path::PathBuf,
};

use gpio_cdev::{Chip, LineHandle, LineRequestFlags};

use crate::{
    config::Configuration,
    console::UserLog,
    frame::FrameTable,
    hardware::{
        port::{Port, Stimulus},
        GpioPin, ListenerPin, SquareWave,
    },
    sequencer::{Sequencer, Step},
    DriverError,
};

/// A trait for functions which can create the necessary hardware for a stimulus run.
///
/// This exists to allow us to "spoof" hardware for the main process so we don't have to test
/// everything on real hardware.
pub trait MakeHardware {
    /// The type of the chip, which can be used for getting a GPIO pin.
    type Chip;
    /// The type of GPIO pin that this trait can make for the output port.
    type Pin: GpioPin;
    /// The type of the pin from which the external clock is observed.
    type Clock: GpioPin;

    /// Construct a GPIO chip which can be used to get pins.
    ///
    /// # Errors
    ///
    /// This function will return an error if constructing the chip fails.
    fn chip() -> Result<Self::Chip, DriverError>;

    /// Construct the output port facing the device under test, with every pin
    /// at its idle level.
    ///
    /// # Errors
    ///
    /// This function may return an error if it is unable to acquire the GPIO needed.
    fn port(config: &Configuration, chip: &mut Self::Chip) -> Result<Port<Self::Pin>, DriverError>;

    /// Construct the pin on which the external clock is observed.
    ///
    /// # Errors
    ///
    /// This function may return an error if it is unable to acquire the GPIO needed.
    fn clock(config: &Configuration, chip: &mut Self::Chip) -> Result<Self::Clock, DriverError>;
}

/// A hardware maker for actually interfacing with the Raspberry Pi.
pub struct RaspberryPi;

/// A hardware maker which spoofs all of its pins so that a stimulus run can be
/// exercised on non-production hardware.
pub struct Dummy;

impl MakeHardware for RaspberryPi {
    type Chip = Chip;
    type Pin = LineHandle;
    type Clock = LineHandle;

    fn chip() -> Result<Self::Chip, DriverError> {
        Ok(Chip::new("/dev/gpiochip0")?)
    }

    fn port(config: &Configuration, chip: &mut Self::Chip) -> Result<Port<Self::Pin>, DriverError> {
        // request every output at its idle level: chip select released, data lines low
        Ok(Port {
            pin_cs: chip.get_line(u32::from(config.pin_cs))?.request(
                LineRequestFlags::OUTPUT,
                1,
                "twiddle",
            )?,
            pin_mosi: chip.get_line(u32::from(config.pin_mosi))?.request(
                LineRequestFlags::OUTPUT,
                0,
                "twiddle",
            )?,
            pin_dc: chip.get_line(u32::from(config.pin_dc))?.request(
                LineRequestFlags::OUTPUT,
                0,
                "twiddle",
            )?,
        })
    }

    fn clock(config: &Configuration, chip: &mut Self::Chip) -> Result<Self::Clock, DriverError> {
        Ok(chip
            .get_line(u32::from(config.pin_clk))?
            .request(LineRequestFlags::INPUT, 0, "twiddle")?)
    }
}

impl MakeHardware for Dummy {
    type Chip = ();
    type Pin = ListenerPin;
    type Clock = SquareWave;

    fn chip() -> Result<Self::Chip, DriverError> {
        Ok(())
    }

    fn port(_: &Configuration, _: &mut Self::Chip) -> Result<Port<Self::Pin>, DriverError> {
        Ok(Port {
            pin_cs: ListenerPin::new(true),
            pin_mosi: ListenerPin::new(false),
            pin_dc: ListenerPin::new(false),
        })
    }

    fn clock(_: &Configuration, _: &mut Self::Chip) -> Result<Self::Clock, DriverError> {
        Ok(SquareWave::new(false))
    }
}

/// Run the stimulus driver until every frame has been driven out.
///
/// # Arguments
///
/// The first argument to this executable (via `std::env::args`) is the path to a configuration JSON
/// file.
///
/// The second argument to this executable is a path to a directory where log files should be
/// created.
/// If the directory does not exist, it will be created.
///
/// # Errors
///
/// This function will return an error if the arguments are missing, if the configuration cannot be
/// read or parsed, or if we are unable to set up logs or control GPIO.
pub fn run<M: MakeHardware>() -> Result<(), DriverError> {
    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .ok_or_else(|| DriverError::Args("missing configuration path".into()))?;
    let logs_path = args
        .next()
        .ok_or_else(|| DriverError::Args("missing log directory path".into()))?;

    let config_file = File::open(&config_path)?;
    let config = Configuration::parse(&mut BufReader::new(config_file))?;

    let logs_dir = PathBuf::from(&logs_path);
    create_dir_all(&logs_dir)?;
    let user_log = UserLog::new(File::create(logs_dir.join("console.txt"))?);

    #[allow(unused_must_use)]
    {
        user_log.info(&format!("Parsed configuration from {config_path}"));
        user_log.info(&format!(
            "Driving {} frames with {} idle cycles after each frame",
            config.frames.len(),
            config.pause_cycles
        ));
    }

    let mut chip = M::chip()?;
    let port = M::port(&config, &mut chip)?;
    let clock = M::clock(&config, &mut chip)?;

    let sequencer = Sequencer::new(FrameTable::new(config.frames.clone()), config.pause_cycles);
    let mut stimulus = Stimulus::new(port, sequencer)?;

    drive(&mut stimulus, clock, &user_log)
}

/// Poll the observed clock and feed each sampled level to the stimulus until
/// the whole frame table has been driven out.
///
/// Chip select transitions and frame completions are logged at info level, and
/// individual bits at debug level.
fn drive<P: GpioPin>(
    stimulus: &mut Stimulus<P>,
    mut clock: impl GpioPin,
    user_log: &UserLog<impl Write>,
) -> Result<(), DriverError> {
    let mut chip_select = true;
    let mut frames_sent = 0;

    while !stimulus.is_done() {
        let level = clock.read()?;
        let Some(step) = stimulus.observe_clock(level)? else {
            continue;
        };

        #[allow(unused_must_use)]
        {
            match step {
                Step::Bit { data, control } => {
                    if chip_select {
                        chip_select = false;
                        user_log.info("chip select asserted");
                    }
                    user_log.debug(&format!(
                        "drive mosi={} dc={}",
                        u8::from(data),
                        u8::from(control)
                    ));
                }
                Step::Pause | Step::Done => {
                    if !chip_select {
                        chip_select = true;
                        user_log.info("chip select released");
                    }
                }
            }

            if stimulus.frames_sent() > frames_sent {
                frames_sent = stimulus.frames_sent();
                user_log.info(&format!("frame {frames_sent} sent"));
            }
        }
    }

    #[allow(unused_must_use)]
    {
        user_log.info(&format!(
            "stimulus complete: {} frames sent",
            stimulus.frames_sent()
        ));
    }

    Ok(())
}
