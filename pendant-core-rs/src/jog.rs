//! Typed jog-line builder.
//!
//! Every jog command the adapter emits has the shape
//! `$J=G91G21<axis words>F<feed>` — incremental, millimeter units. The
//! builder collects typed axis moves and serializes once; no in-place
//! string splicing.

use core::fmt::Write;

use heapless::{String, Vec};

/// Serialized jog lines never exceed this length: 9 bytes of preamble,
/// up to four axis words, one feed word.
pub const JOG_LINE_MAX: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
    A,
}

impl Axis {
    fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::A => 'A',
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisWord {
    axis: Axis,
    distance: f32,
    decimals: u32,
}

/// Composable `$J=` jog command.
#[derive(Debug, Default)]
pub struct JogLine {
    words: Vec<AxisWord, 4>,
    feed: f32,
    feed_decimals: u32,
}

impl JogLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an axis word. At most four axes; further words are ignored.
    pub fn axis(&mut self, axis: Axis, distance: f32, decimals: u32) -> &mut Self {
        let _ = self.words.push(AxisWord {
            axis,
            distance,
            decimals,
        });
        self
    }

    pub fn feed(&mut self, feed: f32, decimals: u32) -> &mut Self {
        self.feed = feed;
        self.feed_decimals = decimals;
        self
    }

    /// Serialize to the wire form, e.g. `$J=G91G21X0.025F100`.
    pub fn render(&self) -> String<JOG_LINE_MAX> {
        let mut line: String<JOG_LINE_MAX> = String::new();
        let _ = line.push_str("$J=G91G21");
        for word in &self.words {
            let _ = line.push(word.axis.letter());
            write_float(&mut line, word.distance, word.decimals);
        }
        let _ = line.push('F');
        write_float(&mut line, self.feed, self.feed_decimals);
        line
    }
}

/// Append `value` with at most `decimals` fractional digits, trailing
/// zeros trimmed: 3000.0 → "3000", 0.0250001 → "0.025", -0.5 → "-0.5".
pub(crate) fn write_float<const N: usize>(out: &mut String<N>, value: f32, decimals: u32) {
    let mut scale: i64 = 1;
    for _ in 0..decimals {
        scale *= 10;
    }
    let scaled = libm::roundf(value * scale as f32) as i64;
    let (sign, magnitude) = if scaled < 0 { ("-", -scaled) } else { ("", scaled) };
    let integer = magnitude / scale;
    let mut fraction = magnitude % scale;

    let mut width = decimals as usize;
    while width > 0 && fraction % 10 == 0 {
        fraction /= 10;
        width -= 1;
    }

    if width == 0 {
        let _ = write!(out, "{}{}", sign, integer);
    } else {
        let _ = write!(out, "{}{}.{:0width$}", sign, integer, fraction, width = width);
    }
}
