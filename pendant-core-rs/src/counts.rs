//! Encoder-delta jogger and override knob processing.
//!
//! Each completed counts read is diffed against the previous one. Axis
//! movement becomes an incremental jog whose feed rate finishes the move
//! within one sample interval; knob positions that drifted from the
//! controller's override values are walked toward the knob one step at a
//! time; pressed buttons are synthesized into key codes for the
//! translator.

use pendant_protocol::keys::{cmd, keycodes_for_buttons};
use pendant_protocol::CountsPacket;

use crate::host::Controller;
use crate::jog::{Axis, JogLine};
use crate::pendant::Pendant;

/// Interval between counts reads while the pendant is producing work, in
/// milliseconds. The jog feed rate is derived from it so each increment
/// completes just as the next sample arrives.
pub const READ_COUNT_INTERVAL_MS: u32 = 20;

/// What a counts exchange asked of the caller.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CountsOutcome {
    /// Something happened; the scheduler shortens the next poll.
    pub work_done: bool,
    /// The buttons word must be zeroed so the press is not counted twice.
    pub clear_buttons: bool,
}

impl Pendant<'_> {
    /// Diff `current` against the stored baseline and emit the resulting
    /// jog, override, and button work. Updates the baseline.
    pub fn process_counts(&mut self, c: &impl Controller, current: &CountsPacket) -> CountsOutcome {
        let n_axis = (c.n_axis() as usize).min(4);
        let mut deltas = [0.0f32; 4];
        for idx in 0..n_axis {
            deltas[idx] =
                (current.counts[idx].wrapping_sub(self.prev_counts.counts[idx])) as f32 / 1000.0;
        }

        let mut work_done = false;

        if deltas.iter().any(|&d| d != 0.0) {
            let norm = libm::sqrtf(
                deltas[0] * deltas[0] + deltas[1] * deltas[1] + deltas[2] * deltas[2],
            );
            // An A-only move still needs a non-zero feed word.
            let norm = if norm == 0.0 { libm::fabsf(deltas[3]) } else { norm };
            let feed = norm / READ_COUNT_INTERVAL_MS as f32 * 1000.0 * 60.0;

            let mut line = JogLine::new();
            line.axis(Axis::X, deltas[0], 3)
                .axis(Axis::Y, deltas[1], 3)
                .axis(Axis::Z, deltas[2], 3);
            if n_axis > 3 {
                line.axis(Axis::A, deltas[3], 3);
            }
            line.feed(feed, 2);

            if c.enqueue_gcode(&line.render()) {
                self.input.set_jogging(true);
            }
            work_done = true;
        } else if self.input.take_jogging() {
            c.enqueue_realtime(cmd::JOG_CANCEL);
            work_done = true;
        }

        let overrides = c.overrides();

        let diff = current.feed_over - overrides.feed;
        if diff != 0 {
            c.enqueue_feed_override(linear_step(
                diff,
                cmd::OVERRIDE_FEED_COARSE_PLUS,
                cmd::OVERRIDE_FEED_COARSE_MINUS,
                cmd::OVERRIDE_FEED_FINE_PLUS,
                cmd::OVERRIDE_FEED_FINE_MINUS,
            ));
            work_done = true;
        }

        let diff = current.spindle_over - overrides.spindle;
        if diff != 0 {
            c.enqueue_accessory_override(linear_step(
                diff,
                cmd::OVERRIDE_SPINDLE_COARSE_PLUS,
                cmd::OVERRIDE_SPINDLE_COARSE_MINUS,
                cmd::OVERRIDE_SPINDLE_FINE_PLUS,
                cmd::OVERRIDE_SPINDLE_FINE_MINUS,
            ));
            work_done = true;
        }

        // Rapid has no fine steps; the knob selects one of the three
        // levels directly.
        if current.rapid_over != overrides.rapid {
            let step = if current.rapid_over >= 100 {
                cmd::OVERRIDE_RAPID_RESET
            } else if current.rapid_over >= 50 {
                cmd::OVERRIDE_RAPID_MEDIUM
            } else {
                cmd::OVERRIDE_RAPID_LOW
            };
            c.enqueue_feed_override(step);
            work_done = true;
        }

        let clear_buttons = current.buttons != 0;
        if clear_buttons {
            for code in keycodes_for_buttons(current.buttons) {
                self.input.enqueue_raw(code);
            }
            work_done = true;
        }

        self.prev_counts = *current;

        CountsOutcome {
            work_done,
            clear_buttons,
        }
    }
}

/// One override step toward the knob: coarse (±10) when at least a coarse
/// step away, fine (±1) otherwise.
fn linear_step(diff: i32, coarse_up: u8, coarse_down: u8, fine_up: u8, fine_down: u8) -> u8 {
    if diff >= 10 {
        coarse_up
    } else if diff <= -10 {
        coarse_down
    } else if diff > 0 {
        fine_up
    } else {
        fine_down
    }
}
