//! Controller → pendant status packet.
//!
//! Written to offset 0 of the pendant's register file. The layout is fixed
//! little-endian with no padding; `offsets` pins every field position and
//! the tests below guard against drift.

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Wire size of the status packet.
pub const STATUS_LEN: usize = 174;

/// Tag byte written at offset 0 of every status packet.
pub const STATUS_ADDRESS: u8 = 0x01;

/// Bit pattern of the A coordinate when the machine has three axes or
/// fewer. Deliberately a NaN so the pendant cannot mistake it for a
/// position.
pub const A_AXIS_ABSENT_BITS: u32 = 0xFFFF_FFFF;

/// Byte offsets of each field within the packet.
pub mod offsets {
    pub const ADDRESS: usize = 0;
    pub const MACHINE_STATE: usize = 1;
    pub const MACHINE_SUBSTATE: usize = 2;
    pub const HOME_STATE: usize = 3;
    pub const FEED_OVERRIDE: usize = 4;
    pub const SPINDLE_OVERRIDE: usize = 6;
    pub const SPINDLE_STOP: usize = 8;
    pub const SPINDLE_STATE: usize = 9;
    pub const SPINDLE_RPM: usize = 10;
    pub const FEED_RATE: usize = 14;
    pub const COOLANT_STATE: usize = 18;
    pub const JOG_MODE: usize = 19;
    pub const SIGNALS: usize = 20;
    pub const JOG_STEPSIZE: usize = 21;
    pub const CURRENT_WCS: usize = 25;
    pub const LIMITS: usize = 26;
    pub const STATUS_CODE: usize = 27;
    pub const MACHINE_MODES: usize = 28;
    pub const COORDINATES: usize = 29;
    pub const MSG_TYPE: usize = 45;
    pub const MSG: usize = 46;
}

/// Machine-state codes carried in the low nibble of the packed state byte.
///
/// Alarm and EStop intentionally share a code; everything the pendant has
/// no rendering for collapses to [`UNKNOWN`](machine_state::UNKNOWN),
/// which is the largest value the 4-bit field can hold.
pub mod machine_state {
    pub const ALARM: u8 = 1;
    pub const CYCLE: u8 = 2;
    pub const HOLD: u8 = 3;
    pub const TOOL_CHANGE: u8 = 4;
    pub const IDLE: u8 = 5;
    pub const HOMING: u8 = 6;
    pub const JOG: u8 = 7;
    pub const UNKNOWN: u8 = 0x0F;
}

/// Message-type discriminants for the inline message buffer. Values
/// 1..=127 mean "plain text of that length".
pub mod msg_type {
    pub const NONE: u8 = 0;
    pub const COMMENT: u8 = 252;
    pub const OVERRIDES: u8 = 253;
    pub const WORK_OFFSET: u8 = 254;
    pub const CLEAR_MESSAGE: u8 = 255;
}

// ---------------------------------------------------------------------------
// Packet
// ---------------------------------------------------------------------------

/// Snapshot of controller state pushed to the pendant.
///
/// `machine_state`, `machine_mode` and `disconnected` share one wire byte
/// (state in bits 0..4, mode in bits 4..7, disconnected in bit 7).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusPacket {
    pub machine_state: u8,
    pub machine_mode: u8,
    pub disconnected: bool,
    pub machine_substate: u8,
    pub home_state: u8,
    pub feed_override: u16,
    pub spindle_override: u16,
    pub spindle_stop: u8,
    pub spindle_state: u8,
    pub spindle_rpm: i32,
    pub feed_rate: f32,
    pub coolant_state: u8,
    pub jog_mode: u8,
    pub signals: u8,
    pub jog_stepsize: f32,
    pub current_wcs: u8,
    pub limits: u8,
    pub status_code: u8,
    pub machine_modes: u8,
    /// Work coordinates x, y, z, a. The a slot holds
    /// [`A_AXIS_ABSENT_BITS`] on three-axis machines.
    pub coordinate: [f32; 4],
    pub msg_type: u8,
    pub msg: [u8; 128],
}

impl Default for StatusPacket {
    fn default() -> Self {
        Self {
            machine_state: machine_state::UNKNOWN,
            machine_mode: 0,
            disconnected: false,
            machine_substate: 0,
            home_state: 0,
            feed_override: 100,
            spindle_override: 100,
            spindle_stop: 0,
            spindle_state: 0,
            spindle_rpm: 0,
            feed_rate: 0.0,
            coolant_state: 0,
            jog_mode: 0,
            signals: 0,
            jog_stepsize: 0.0,
            current_wcs: 0,
            limits: 0,
            status_code: 0,
            machine_modes: 0,
            coordinate: [0.0, 0.0, 0.0, f32::from_bits(A_AXIS_ABSENT_BITS)],
            msg_type: msg_type::NONE,
            msg: [0; 128],
        }
    }
}

impl StatusPacket {
    /// Serialize into the wire representation.
    pub fn to_bytes(&self) -> [u8; STATUS_LEN] {
        use offsets::*;

        let mut buf = [0u8; STATUS_LEN];
        buf[ADDRESS] = STATUS_ADDRESS;
        buf[MACHINE_STATE] = (self.machine_state & 0x0F)
            | (self.machine_mode & 0x07) << 4
            | (self.disconnected as u8) << 7;
        buf[MACHINE_SUBSTATE] = self.machine_substate;
        buf[HOME_STATE] = self.home_state;
        buf[FEED_OVERRIDE..FEED_OVERRIDE + 2].copy_from_slice(&self.feed_override.to_le_bytes());
        buf[SPINDLE_OVERRIDE..SPINDLE_OVERRIDE + 2]
            .copy_from_slice(&self.spindle_override.to_le_bytes());
        buf[SPINDLE_STOP] = self.spindle_stop;
        buf[SPINDLE_STATE] = self.spindle_state;
        buf[SPINDLE_RPM..SPINDLE_RPM + 4].copy_from_slice(&self.spindle_rpm.to_le_bytes());
        buf[FEED_RATE..FEED_RATE + 4].copy_from_slice(&self.feed_rate.to_le_bytes());
        buf[COOLANT_STATE] = self.coolant_state;
        buf[JOG_MODE] = self.jog_mode;
        buf[SIGNALS] = self.signals;
        buf[JOG_STEPSIZE..JOG_STEPSIZE + 4].copy_from_slice(&self.jog_stepsize.to_le_bytes());
        buf[CURRENT_WCS] = self.current_wcs;
        buf[LIMITS] = self.limits;
        buf[STATUS_CODE] = self.status_code;
        buf[MACHINE_MODES] = self.machine_modes;
        for (idx, coord) in self.coordinate.iter().enumerate() {
            let off = COORDINATES + idx * 4;
            // to_bits preserves the A-axis NaN sentinel exactly.
            buf[off..off + 4].copy_from_slice(&coord.to_bits().to_le_bytes());
        }
        buf[MSG_TYPE] = self.msg_type;
        buf[MSG..MSG + 128].copy_from_slice(&self.msg);
        buf
    }

    /// Reconstruct a packet from wire bytes. The address tag at offset 0
    /// is not interpreted.
    pub fn from_bytes(raw: &[u8; STATUS_LEN]) -> Self {
        use offsets::*;

        let u16_at = |off: usize| u16::from_le_bytes([raw[off], raw[off + 1]]);
        let u32_at =
            |off: usize| u32::from_le_bytes([raw[off], raw[off + 1], raw[off + 2], raw[off + 3]]);

        let mut coordinate = [0.0f32; 4];
        for (idx, coord) in coordinate.iter_mut().enumerate() {
            *coord = f32::from_bits(u32_at(COORDINATES + idx * 4));
        }
        let mut msg = [0u8; 128];
        msg.copy_from_slice(&raw[MSG..MSG + 128]);

        Self {
            machine_state: raw[MACHINE_STATE] & 0x0F,
            machine_mode: raw[MACHINE_STATE] >> 4 & 0x07,
            disconnected: raw[MACHINE_STATE] & 0x80 != 0,
            machine_substate: raw[MACHINE_SUBSTATE],
            home_state: raw[HOME_STATE],
            feed_override: u16_at(FEED_OVERRIDE),
            spindle_override: u16_at(SPINDLE_OVERRIDE),
            spindle_stop: raw[SPINDLE_STOP],
            spindle_state: raw[SPINDLE_STATE],
            spindle_rpm: u32_at(SPINDLE_RPM) as i32,
            feed_rate: f32::from_bits(u32_at(FEED_RATE)),
            coolant_state: raw[COOLANT_STATE],
            jog_mode: raw[JOG_MODE],
            signals: raw[SIGNALS],
            jog_stepsize: f32::from_bits(u32_at(JOG_STEPSIZE)),
            current_wcs: raw[CURRENT_WCS],
            limits: raw[LIMITS],
            status_code: raw[STATUS_CODE],
            machine_modes: raw[MACHINE_MODES],
            coordinate,
            msg_type: raw[MSG_TYPE],
            msg,
        }
    }

    /// Store a plain-text message in the inline buffer, truncating to 127
    /// bytes. Sets `msg_type` to the text length per the protocol.
    pub fn set_message(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let len = bytes.len().min(127);
        self.msg = [0; 128];
        self.msg[..len].copy_from_slice(&bytes[..len]);
        self.msg_type = len as u8;
    }
}
