//! Frame tables, which describe the data to be clocked out to the device under
//! test.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
/// One transfer unit: a byte for the serial data line, paired with a byte of
/// per-bit levels for the data/command marker line.
pub struct Frame {
    /// The byte shifted out on the data line, most significant bit first.
    pub data: u8,
    /// The marker level accompanying each bit of `data`, shifted out in
    /// lockstep with it.
    pub control: u8,
}

impl Frame {
    #[must_use]
    /// Get bit `bit` of the data byte.
    /// Bit 0 is the least significant bit and bit 7 the most significant.
    pub fn data_bit(self, bit: u8) -> bool {
        (self.data >> bit) & 1 != 0
    }

    #[must_use]
    /// Get bit `bit` of the marker byte.
    /// Bit 0 is the least significant bit and bit 7 the most significant.
    pub fn control_bit(self, bit: u8) -> bool {
        (self.control >> bit) & 1 != 0
    }
}

/// An ordered table of frames.
/// The order of the table is the order of transmission, and the table cannot
/// change once it has been constructed.
pub struct FrameTable(Box<[Frame]>);

impl FrameTable {
    #[must_use]
    /// Construct a new `FrameTable` which will transmit `frames` in order.
    pub fn new(frames: Vec<Frame>) -> FrameTable {
        FrameTable(frames.into_boxed_slice())
    }

    #[must_use]
    /// The total number of frames to be transmitted.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    /// Determine whether this table contains no frames at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    /// Get the frame at position `index` in transmission order.
    ///
    /// # Panics
    ///
    /// This function will panic if `index` is out of bounds.
    /// The sequencer only ever asks for indices below `len()`.
    pub fn get(&self, index: usize) -> Frame {
        self.0[index]
    }
}
