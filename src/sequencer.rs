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

//! The frame sequencer, which turns a frame table into per-clock-edge signal
//! levels.
//!
//! The sequencer owns no clock of its own.
//! It is advanced exactly once per qualifying clock edge by whoever is
//! observing the clock, and each advance computes the output levels for the
//! next clock period.

use crate::frame::FrameTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The output computed by one advance of the sequencer.
pub enum Step {
    /// Chip select is released while an idle period between frames drains.
    /// The data and marker lines hold their previous levels.
    Pause,
    /// Chip select is asserted and one bit pair is driven onto the lines.
    Bit {
        /// The level of the serial data line for this clock period.
        data: bool,
        /// The level of the data/command marker line for this clock period.
        control: bool,
    },
    /// Every frame has been sent.
    /// The sequencer returns `Done` forever once it has been reached.
    Done,
}

impl Step {
    #[must_use]
    /// The chip select level for this step.
    /// Chip select is active-low: `false` means a frame is underway, and `true`
    /// means the bus is idle.
    pub fn chip_select(self) -> bool {
        !matches!(self, Step::Bit { .. })
    }
}

/// The stimulus sequencer.
///
/// All mutable transfer state lives here, and `advance` is its only mutation
/// path.
/// A `Sequencer` makes exactly one pass over its frame table: each frame is
/// shifted out most significant bit first under an asserted chip select, every
/// frame is followed by an idle period with chip select released, and after the
/// final idle period the sequencer rests permanently.
pub struct Sequencer {
    /// The frames to transmit.
    frames: FrameTable,
    /// The configured number of idle advances inserted after each frame.
    pause_cycles: u32,
    /// The index of the frame currently (or next) being transmitted.
    /// Equal to `frames.len()` once every frame has been sent.
    frame_index: usize,
    /// The bit position within the active frame, counting down from 7 to 0.
    bit_index: u8,
    /// Whether a frame is currently being transmitted (chip select asserted).
    frame_active: bool,
    /// Idle advances left before the next frame may start.
    /// Nonzero only while no frame is active.
    pause_remaining: u32,
}

impl Sequencer {
    #[must_use]
    /// Construct a new `Sequencer` which will transmit `frames` with
    /// `pause_cycles` idle advances after each frame.
    ///
    /// A `pause_cycles` of 0 still yields one idle advance after each frame, so
    /// that chip select visibly deasserts between consecutive frames.
    pub fn new(frames: FrameTable, pause_cycles: u32) -> Sequencer {
        Sequencer {
            frames,
            pause_cycles,
            frame_index: 0,
            bit_index: 0,
            frame_active: false,
            pause_remaining: 0,
        }
    }

    /// Advance the sequencer by one qualifying clock edge, computing the output
    /// levels for the next clock period.
    ///
    /// Exactly one of the following happens per call: an idle advance drains,
    /// the next bit of the active frame is emitted (starting the frame first if
    /// needed), or the sequencer reports that it is finished.
    pub fn advance(&mut self) -> Step {
        // drain the idle period between frames
        if !self.frame_active && self.pause_remaining > 0 {
            self.pause_remaining -= 1;
            return Step::Pause;
        }

        // every frame has been sent; rest forever
        if self.frame_index == self.frames.len() {
            return Step::Done;
        }

        // begin the next frame at its most significant bit
        if !self.frame_active {
            self.frame_active = true;
            self.bit_index = 7;
        }

        let frame = self.frames.get(self.frame_index);
        let step = Step::Bit {
            data: frame.data_bit(self.bit_index),
            control: frame.control_bit(self.bit_index),
        };

        // the frame closes on the same advance that emits its final bit
        if self.bit_index == 0 {
            self.frame_active = false;
            // a zero-length pause still releases chip select for one advance
            self.pause_remaining = self.pause_cycles.max(1);
            self.frame_index += 1;
        } else {
            self.bit_index -= 1;
        }

        step
    }

    #[must_use]
    /// The number of frames which have been fully transmitted so far.
    pub fn frames_sent(&self) -> usize {
        self.frame_index
    }

    #[must_use]
    /// Determine whether every frame and its trailing idle period has been
    /// driven out.
    /// Once this returns `true`, further calls to `advance` are no-ops.
    pub fn is_done(&self) -> bool {
        self.frame_index == self.frames.len() && !self.frame_active && self.pause_remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use crate::frame::Frame;

    use super::*;

    /// The frame table used by the stock demonstration configuration.
    fn example_table() -> Vec<Frame> {
        let data = [0xA7, 0x20, 0x00, 0x55, 0xFF, 0x00, 0x50];
        let control = [0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];

        data.into_iter()
            .zip(control)
            .map(|(data, control)| Frame { data, control })
            .collect()
    }

    /// Helper function to run a sequencer to completion.
    /// Returns every step up to and including the first `Done`.
    fn run_to_done(frames: Vec<Frame>, pause_cycles: u32) -> Vec<Step> {
        let mut sequencer = Sequencer::new(FrameTable::new(frames), pause_cycles);
        let mut steps = Vec::new();

        loop {
            let step = sequencer.advance();
            steps.push(step);
            if step == Step::Done {
                return steps;
            }
        }
    }

    #[test]
    /// Test the exact step sequence for a single frame with no configured
    /// pause: eight bits under an asserted chip select, one released advance,
    /// then done.
    fn single_frame_no_pause() {
        let steps = run_to_done(
            vec![Frame {
                data: 0xA7,
                control: 0x00,
            }],
            0,
        );

        let bit = |data| Step::Bit {
            data,
            control: false,
        };
        assert_eq!(
            steps,
            vec![
                bit(true),
                bit(false),
                bit(true),
                bit(false),
                bit(false),
                bit(true),
                bit(true),
                bit(true),
                Step::Pause,
                Step::Done,
            ]
        );
    }

    #[test]
    /// Test that a sequencer over an empty table is finished before its first
    /// advance and emits no bits at all.
    fn empty_table_is_immediately_done() {
        let mut sequencer = Sequencer::new(FrameTable::new(Vec::new()), 16);

        assert!(sequencer.is_done());
        assert_eq!(sequencer.advance(), Step::Done);
        assert_eq!(sequencer.frames_sent(), 0);
    }

    #[test]
    /// Test that the second frame starts only after exactly the configured
    /// number of released-chip-select advances.
    fn pause_separates_frames() {
        let steps = run_to_done(
            vec![
                Frame {
                    data: 0x80,
                    control: 0xFF,
                },
                Frame {
                    data: 0x01,
                    control: 0x00,
                },
            ],
            2,
        );

        // first frame: 0x80 with every marker bit high
        assert_eq!(
            steps[0],
            Step::Bit {
                data: true,
                control: true
            }
        );
        for step in &steps[1..8] {
            assert_eq!(
                *step,
                Step::Bit {
                    data: false,
                    control: true
                }
            );
        }

        // exactly two idle advances separate the frames
        assert_eq!(steps[8], Step::Pause);
        assert_eq!(steps[9], Step::Pause);

        // second frame: 0x01, so only its final bit is high
        for step in &steps[10..17] {
            assert_eq!(
                *step,
                Step::Bit {
                    data: false,
                    control: false
                }
            );
        }
        assert_eq!(
            steps[17],
            Step::Bit {
                data: true,
                control: false
            }
        );

        // trailing idle period, then done
        assert_eq!(steps[18], Step::Pause);
        assert_eq!(steps[19], Step::Pause);
        assert_eq!(steps[20], Step::Done);
    }

    #[test]
    /// Test that a full run emits every bit of every frame, most significant
    /// bit first, across a spread of pause lengths and tables.
    ///
    /// This is the guard against closing a frame before its final bit has gone
    /// out: any off-by-one in the end-of-frame handling changes the emitted bit
    /// stream or the step count.
    fn emits_whole_table_bit_for_bit() {
        let tables = [
            Vec::new(),
            vec![Frame {
                data: 0x00,
                control: 0xFF,
            }],
            vec![
                Frame {
                    data: 0xA7,
                    control: 0x00,
                },
                Frame {
                    data: 0xFF,
                    control: 0x55,
                },
                Frame {
                    data: 0x01,
                    control: 0x80,
                },
            ],
            example_table(),
        ];

        for pause_cycles in [0, 1, 2, 7, 16] {
            for table in &tables {
                let steps = run_to_done(table.clone(), pause_cycles);

                let mut data_bits = Vec::new();
                let mut control_bits = Vec::new();
                for step in &steps {
                    if let Step::Bit { data, control } = *step {
                        data_bits.push(data);
                        control_bits.push(control);
                    }
                }

                let mut expected_data = Vec::new();
                let mut expected_control = Vec::new();
                for frame in table {
                    for bit in (0..8).rev() {
                        expected_data.push(frame.data_bit(bit));
                        expected_control.push(frame.control_bit(bit));
                    }
                }

                assert_eq!(data_bits, expected_data);
                assert_eq!(control_bits, expected_control);

                // eight bits and one idle period per frame, then the final done
                let idle = pause_cycles.max(1) as usize;
                assert_eq!(steps.len(), table.len() * (8 + idle) + 1);
            }
        }
    }

    #[test]
    /// Test that chip select is asserted for exactly eight consecutive advances
    /// per frame and released for exactly the idle period after it.
    fn chip_select_framing() {
        for pause_cycles in [0, 3, 16] {
            let steps = run_to_done(example_table(), pause_cycles);
            let idle = pause_cycles.max(1) as usize;

            let mut cursor = 0;
            for _ in 0..7 {
                for _ in 0..8 {
                    assert!(!steps[cursor].chip_select());
                    cursor += 1;
                }
                for _ in 0..idle {
                    assert!(steps[cursor].chip_select());
                    cursor += 1;
                }
            }
            assert_eq!(steps[cursor], Step::Done);
        }
    }

    #[test]
    /// Test that the sequencer stays finished forever once it has finished.
    fn done_is_permanent() {
        let mut sequencer = Sequencer::new(
            FrameTable::new(vec![Frame {
                data: 0x55,
                control: 0x0F,
            }]),
            1,
        );

        while sequencer.advance() != Step::Done {}
        assert!(sequencer.is_done());

        for _ in 0..100 {
            assert_eq!(sequencer.advance(), Step::Done);
            assert_eq!(sequencer.frames_sent(), 1);
            assert!(sequencer.is_done());
        }
    }

    #[test]
    /// Test that two runs over the same table produce identical step sequences.
    fn runs_are_identical() {
        let first = run_to_done(example_table(), 16);
        let second = run_to_done(example_table(), 16);

        assert_eq!(first, second);
    }
}
