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

//! Definitions for hardware devices.
//!
//! The goal of this module is to abstract away some of the details of exactly how our hardware
//! works so that we can focus on the signal logic elsewhere.

pub mod port;

use gpio_cdev::LineHandle;

/// A trait for GPIO pins.
pub trait GpioPin {
    /// Perform a GPIO read on this pin.
    /// Returns `true` if the pin is pulled high, and `false` otherwise.
    ///
    /// # Errors
    ///
    /// This can return an error if the read failed.
    fn read(&mut self) -> Result<bool, gpio_cdev::Error>;

    /// Perform a GPIO write on this pin, setting the pin's logic level to `value`.
    ///
    /// # Errors
    ///
    /// This can return an error if the write failed.
    fn write(&mut self, value: bool) -> Result<(), gpio_cdev::Error>;
}

/// A structure for testing GPIO writes.
///
/// A `ListenerPin` stores the history of all writes to it.
/// When read from, a `ListenerPin` will return the last written value of the pin.
pub struct ListenerPin(Vec<bool>);

/// A structure for spoofing a free-running clock input.
///
/// Each read returns the opposite level from the one before, as if the pin were
/// sampled exactly once per half period of a square wave.
/// Writes to a `SquareWave` are accepted and ignored.
pub struct SquareWave {
    /// The level returned by the most recent read.
    level: bool,
}

impl ListenerPin {
    #[must_use]
    /// Construct a new `ListenerPin` with only one reading in its history.
    pub fn new(last_value: bool) -> ListenerPin {
        ListenerPin(vec![last_value])
    }

    #[must_use]
    /// Get access to the history inside this pin.
    pub fn history(&self) -> &Vec<bool> {
        &self.0
    }
}

impl SquareWave {
    #[must_use]
    /// Construct a new `SquareWave` whose first read will return the opposite
    /// of `level`.
    pub fn new(level: bool) -> SquareWave {
        SquareWave { level }
    }
}

impl GpioPin for ListenerPin {
    fn read(&mut self) -> Result<bool, gpio_cdev::Error> {
        Ok(*self.0.last().unwrap())
    }

    fn write(&mut self, value: bool) -> Result<(), gpio_cdev::Error> {
        self.0.push(value);

        Ok(())
    }
}

impl GpioPin for SquareWave {
    fn read(&mut self) -> Result<bool, gpio_cdev::Error> {
        self.level = !self.level;
        Ok(self.level)
    }

    fn write(&mut self, _: bool) -> Result<(), gpio_cdev::Error> {
        Ok(())
    }
}

impl GpioPin for LineHandle {
    fn read(&mut self) -> Result<bool, gpio_cdev::Error> {
        Ok(1 == self.get_value()?)
    }

    fn write(&mut self, value: bool) -> Result<(), gpio_cdev::Error> {
        let int_value = u8::from(value);
        self.set_value(int_value)?;

        Ok(())
    }
}
