//! The signal port facing the device under test, and the clock-edge plumbing
//! that drives it.

use super::GpioPin;
use crate::sequencer::{Sequencer, Step};

/// The set of output pins driven toward the device under test.
pub struct Port<P: GpioPin> {
    /// The chip select pin.
    /// Held low for the full duration of one frame and high otherwise.
    pub pin_cs: P,
    /// The serial data pin.
    pub pin_mosi: P,
    /// The data/command marker pin, driven in lockstep with `pin_mosi`.
    pub pin_dc: P,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A transition observed on the clock line.
pub enum Edge {
    /// The clock went from low to high.
    Rising,
    /// The clock went from high to low.
    Falling,
}

/// A structure which turns a stream of sampled clock levels into edge events.
pub struct EdgeDetector {
    /// The level seen by the previous sample, or `None` before the first
    /// sample.
    last: Option<bool>,
}

/// A complete stimulus driver: a sequencer bound to the output port it drives
/// and the clock line it reacts to.
pub struct Stimulus<P: GpioPin> {
    /// The output pins facing the device under test.
    pub port: Port<P>,
    /// The sequencer holding all transfer state.
    sequencer: Sequencer,
    /// Edge detection for the observed clock.
    edges: EdgeDetector,
}

impl<P: GpioPin> Port<P> {
    /// Release chip select, leaving the bus idle.
    ///
    /// # Errors
    ///
    /// This function will return an error if we are unable to write to the
    /// chip select pin.
    pub fn park(&mut self) -> Result<(), gpio_cdev::Error> {
        self.pin_cs.write(true)
    }

    /// Drive the output levels for one step of the sequence.
    ///
    /// The data and marker lines only change while a frame is active; during
    /// idle periods they hold their previous levels.
    ///
    /// # Errors
    ///
    /// This function will return an error if we are unable to write to the
    /// output pins.
    pub fn apply(&mut self, step: Step) -> Result<(), gpio_cdev::Error> {
        match step {
            Step::Bit { data, control } => {
                self.pin_cs.write(false)?;
                self.pin_mosi.write(data)?;
                self.pin_dc.write(control)?;
            }
            Step::Pause | Step::Done => self.pin_cs.write(true)?,
        }

        Ok(())
    }
}

impl EdgeDetector {
    #[must_use]
    /// Construct a new `EdgeDetector` which has not yet seen a sample.
    pub fn new() -> EdgeDetector {
        EdgeDetector { last: None }
    }

    /// Feed one sampled clock level.
    /// Returns the edge this sample completes, if any.
    /// The first sample only latches the level and never completes an edge.
    pub fn sample(&mut self, level: bool) -> Option<Edge> {
        let edge = match self.last {
            Some(last) if !last && level => Some(Edge::Rising),
            Some(last) if last && !level => Some(Edge::Falling),
            _ => None,
        };
        self.last = Some(level);

        edge
    }
}

impl Default for EdgeDetector {
    fn default() -> EdgeDetector {
        EdgeDetector::new()
    }
}

impl<P: GpioPin> Stimulus<P> {
    /// Construct a new `Stimulus` over `port`, parking the bus so that the
    /// device under test sees a released chip select before the first frame.
    ///
    /// # Errors
    ///
    /// This function will return an error if we are unable to write to the
    /// chip select pin.
    pub fn new(mut port: Port<P>, sequencer: Sequencer) -> Result<Stimulus<P>, gpio_cdev::Error> {
        port.park()?;

        Ok(Stimulus {
            port,
            sequencer,
            edges: EdgeDetector::new(),
        })
    }

    /// Feed one sampled level of the observed clock.
    ///
    /// Output levels change on the falling edge only, so that the device under
    /// test samples a stable line on the rising edge.
    /// Returns the step that was driven out, if this sample completed a falling
    /// edge.
    ///
    /// # Errors
    ///
    /// This function will return an error if we are unable to write to the
    /// output pins.
    pub fn observe_clock(&mut self, level: bool) -> Result<Option<Step>, gpio_cdev::Error> {
        if self.edges.sample(level) != Some(Edge::Falling) {
            return Ok(None);
        }

        let step = self.sequencer.advance();
        self.port.apply(step)?;

        Ok(Some(step))
    }

    #[must_use]
    /// The number of frames which have been fully transmitted so far.
    pub fn frames_sent(&self) -> usize {
        self.sequencer.frames_sent()
    }

    #[must_use]
    /// Determine whether every frame and its trailing idle period has been
    /// driven out.
    pub fn is_done(&self) -> bool {
        self.sequencer.is_done()
    }
}
