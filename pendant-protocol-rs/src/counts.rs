//! Pendant → controller counts packet.
//!
//! Read from offset [`COUNTS_MEM_OFFSET`](crate::COUNTS_MEM_OFFSET) of the
//! pendant's register file: encoder totals in micrometers, override knob
//! positions, the button bitmap, uptime for liveness tracking, and the
//! protocol version byte checked at attach.

/// Wire size of the counts packet.
pub const COUNTS_LEN: usize = 46;

/// Offset of the buttons word within the packet. The host writes four zero
/// bytes here after consuming a press.
pub const BUTTONS_OFFSET: usize = 17;

/// Byte offsets of each field within the packet.
pub mod offsets {
    pub const UPTIME: usize = 0;
    pub const JOG_MODE: usize = 4;
    pub const FEED_OVER: usize = 5;
    pub const SPINDLE_OVER: usize = 9;
    pub const RAPID_OVER: usize = 13;
    pub const BUTTONS: usize = 17;
    pub const FEEDRATE: usize = 21;
    pub const SPINDLE_RPM: usize = 25;
    pub const AXIS_COUNTS: usize = 29;
    pub const VERSION: usize = 45;
}

/// One sample of the pendant's input state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CountsPacket {
    /// Pendant-side uptime in milliseconds. Strictly increasing while the
    /// pendant is alive; the liveness watchdog keys off it.
    pub uptime: i32,
    /// Jog mode byte as echoed by the pendant, same packing as the status
    /// packet.
    pub jog_mode: u8,
    /// Feed override percentage requested by the knob.
    pub feed_over: i32,
    /// Spindle override percentage requested by the knob.
    pub spindle_over: i32,
    /// Rapid override percentage requested by the knob.
    pub rapid_over: i32,
    /// One bit per pressed control, see [`BUTTON_MAP`](crate::keys::BUTTON_MAP).
    pub buttons: u32,
    pub feedrate: f32,
    pub spindle_rpm: f32,
    /// Accumulated encoder counts per axis (x, y, z, a), in micrometers.
    pub counts: [i32; 4],
    /// Protocol revision of the pendant firmware.
    pub version: u8,
}

impl CountsPacket {
    /// Decode from wire bytes.
    pub fn from_bytes(raw: &[u8; COUNTS_LEN]) -> Self {
        use offsets::*;

        let i32_at =
            |off: usize| i32::from_le_bytes([raw[off], raw[off + 1], raw[off + 2], raw[off + 3]]);
        let f32_at = |off: usize| f32::from_bits(i32_at(off) as u32);

        let mut counts = [0i32; 4];
        for (idx, count) in counts.iter_mut().enumerate() {
            *count = i32_at(AXIS_COUNTS + idx * 4);
        }

        Self {
            uptime: i32_at(UPTIME),
            jog_mode: raw[JOG_MODE],
            feed_over: i32_at(FEED_OVER),
            spindle_over: i32_at(SPINDLE_OVER),
            rapid_over: i32_at(RAPID_OVER),
            buttons: i32_at(BUTTONS) as u32,
            feedrate: f32_at(FEEDRATE),
            spindle_rpm: f32_at(SPINDLE_RPM),
            counts,
            version: raw[VERSION],
        }
    }

    /// Serialize into the wire representation. The controller side never
    /// sends this packet; the encoder exists for loopback tests and host
    /// simulators.
    pub fn to_bytes(&self) -> [u8; COUNTS_LEN] {
        use offsets::*;

        let mut buf = [0u8; COUNTS_LEN];
        buf[UPTIME..UPTIME + 4].copy_from_slice(&self.uptime.to_le_bytes());
        buf[JOG_MODE] = self.jog_mode;
        buf[FEED_OVER..FEED_OVER + 4].copy_from_slice(&self.feed_over.to_le_bytes());
        buf[SPINDLE_OVER..SPINDLE_OVER + 4].copy_from_slice(&self.spindle_over.to_le_bytes());
        buf[RAPID_OVER..RAPID_OVER + 4].copy_from_slice(&self.rapid_over.to_le_bytes());
        buf[BUTTONS..BUTTONS + 4].copy_from_slice(&self.buttons.to_le_bytes());
        buf[FEEDRATE..FEEDRATE + 4].copy_from_slice(&self.feedrate.to_bits().to_le_bytes());
        buf[SPINDLE_RPM..SPINDLE_RPM + 4]
            .copy_from_slice(&self.spindle_rpm.to_bits().to_le_bytes());
        for (idx, count) in self.counts.iter().enumerate() {
            let off = AXIS_COUNTS + idx * 4;
            buf[off..off + 4].copy_from_slice(&count.to_le_bytes());
        }
        buf[VERSION] = self.version;
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_packed_and_stable() {
        use offsets::*;
        assert_eq!(UPTIME, 0);
        assert_eq!(JOG_MODE, 4);
        assert_eq!(FEED_OVER, 5);
        assert_eq!(RAPID_OVER, 13);
        assert_eq!(BUTTONS, BUTTONS_OFFSET);
        assert_eq!(FEEDRATE, 21);
        assert_eq!(AXIS_COUNTS, 29);
        assert_eq!(VERSION, 45);
        assert_eq!(VERSION + 1, COUNTS_LEN);
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let packet = CountsPacket {
            uptime: 123_456,
            jog_mode: 0x12,
            feed_over: 110,
            spindle_over: 95,
            rapid_over: 50,
            buttons: 0x0000_0204,
            feedrate: 871.25,
            spindle_rpm: 8000.0,
            counts: [1234, -500, 0, -1],
            version: crate::PROTOCOL_VERSION,
        };

        let decoded = CountsPacket::from_bytes(&packet.to_bytes());
        assert_eq!(decoded, packet);
    }

    #[test]
    fn negative_axis_counts_decode_sign_extended() {
        let packet = CountsPacket {
            counts: [i32::MIN, -1, i32::MAX, 7],
            ..Default::default()
        };
        let decoded = CountsPacket::from_bytes(&packet.to_bytes());
        assert_eq!(decoded.counts, [i32::MIN, -1, i32::MAX, 7]);
    }
}
