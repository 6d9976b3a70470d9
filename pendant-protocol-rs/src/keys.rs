//! Key codes, realtime command bytes, and the button bitmap.
//!
//! The pendant delivers input two ways: single key codes (strobe + key
//! register on keypad-style hardware) and a 32-bit button bitmap inside the
//! counts packet. [`keycodes_for_buttons`] maps the bitmap back onto the
//! same key-code vocabulary so both paths feed one translator.

// ---------------------------------------------------------------------------
// Key codes
// ---------------------------------------------------------------------------

/// Key codes dequeued by the translator.
///
/// Directional jog keys are printable so a terminal can drive the
/// translator during bring-up; the macro and control keys sit outside the
/// printable range.
pub mod keycode {
    pub const JOG_XR: u8 = b'R';
    pub const JOG_XL: u8 = b'L';
    pub const JOG_YF: u8 = b'F';
    pub const JOG_YB: u8 = b'B';
    pub const JOG_ZU: u8 = b'U';
    pub const JOG_ZD: u8 = b'D';
    pub const JOG_XRYF: u8 = b'r';
    pub const JOG_XRYB: u8 = b'q';
    pub const JOG_XLYF: u8 = b's';
    pub const JOG_XLYB: u8 = b't';
    pub const JOG_XRZU: u8 = b'w';
    pub const JOG_XRZD: u8 = b'v';
    pub const JOG_XLZU: u8 = b'u';
    pub const JOG_XLZD: u8 = b'x';

    /// Macro keys. On machines with more than three axes MACRORAISE and
    /// MACROLOWER become ±A jog keys instead.
    pub const MACROUP: u8 = 0x18;
    pub const MACRODOWN: u8 = 0x19;
    pub const MACRORIGHT: u8 = 0x1A;
    pub const MACROLEFT: u8 = 0x1B;
    pub const MACRORAISE: u8 = 0x7C;
    pub const MACROLOWER: u8 = 0x7D;

    /// Advances the modal work coordinate system (G54..G59.3).
    pub const MACROHOME: u8 = 0x8E;

    pub const RESET: u8 = 0x7F;
    pub const UNLOCK: u8 = 0x80;
    /// 0x81 on pre-v2 pendant firmware.
    pub const SPINON: u8 = 0x83;

    pub const FEED_HOLD: u8 = b'!';
    pub const CYCLE_START: u8 = b'~';
    pub const ATTACH_PROBE: u8 = b'?';
    pub const MIST_TOGGLE: u8 = b'M';
    pub const FLOOD_TOGGLE: u8 = b'C';
    pub const HOME: u8 = b'H';
    pub const JOG_MODE_CYCLE: u8 = b'h';
    pub const JOG_MODIFY_CYCLE: u8 = b'm';
}

// ---------------------------------------------------------------------------
// Realtime command bytes
// ---------------------------------------------------------------------------

/// Realtime command bytes consumed by the controller's realtime sink and
/// override enqueuers (grblHAL vocabulary).
pub mod cmd {
    pub const RESET: u8 = 0x18;
    pub const FEED_HOLD: u8 = b'!';
    pub const CYCLE_START: u8 = b'~';
    pub const SAFETY_DOOR: u8 = 0x84;
    pub const JOG_CANCEL: u8 = 0x85;
    pub const OPTIONAL_STOP_TOGGLE: u8 = 0x88;
    pub const SINGLE_BLOCK_TOGGLE: u8 = 0x89;
    pub const OVERRIDE_FAN0_TOGGLE: u8 = 0x8A;
    pub const MPG_MODE_TOGGLE: u8 = 0x8B;

    pub const OVERRIDE_FEED_RESET: u8 = 0x90;
    pub const OVERRIDE_FEED_COARSE_PLUS: u8 = 0x91;
    pub const OVERRIDE_FEED_COARSE_MINUS: u8 = 0x92;
    pub const OVERRIDE_FEED_FINE_PLUS: u8 = 0x93;
    pub const OVERRIDE_FEED_FINE_MINUS: u8 = 0x94;

    pub const OVERRIDE_RAPID_RESET: u8 = 0x95;
    pub const OVERRIDE_RAPID_MEDIUM: u8 = 0x96;
    pub const OVERRIDE_RAPID_LOW: u8 = 0x97;

    pub const OVERRIDE_SPINDLE_RESET: u8 = 0x99;
    pub const OVERRIDE_SPINDLE_COARSE_PLUS: u8 = 0x9A;
    pub const OVERRIDE_SPINDLE_COARSE_MINUS: u8 = 0x9B;
    pub const OVERRIDE_SPINDLE_FINE_PLUS: u8 = 0x9C;
    pub const OVERRIDE_SPINDLE_FINE_MINUS: u8 = 0x9D;
    pub const OVERRIDE_SPINDLE_STOP: u8 = 0x9E;

    pub const OVERRIDE_COOLANT_FLOOD_TOGGLE: u8 = 0xA0;
    pub const OVERRIDE_COOLANT_MIST_TOGGLE: u8 = 0xA1;
    pub const PROBE_CONNECTED_TOGGLE: u8 = 0xA4;
}

// ---------------------------------------------------------------------------
// Button bitmap
// ---------------------------------------------------------------------------

/// Key code synthesized for each button bit in [`CountsPacket::buttons`].
///
/// Bits 15..=29 are the ALT variants of bits 0..=14 (second physical bank
/// on the larger pendant); they produce the same key codes.
///
/// [`CountsPacket::buttons`]: crate::CountsPacket
pub const BUTTON_MAP: [(u32, u8); 30] = [
    (1 << 0, keycode::RESET),                     // HALT
    (1 << 1, keycode::FEED_HOLD),                 // HOLD
    (1 << 2, keycode::CYCLE_START),               // CYCLE_START
    (1 << 3, keycode::SPINON),                    // SPINDLE
    (1 << 4, keycode::MIST_TOGGLE),               // MIST
    (1 << 5, keycode::FLOOD_TOGGLE),              // FLOOD
    (1 << 6, keycode::HOME),                      // HOME
    (1 << 7, cmd::OVERRIDE_SPINDLE_RESET),        // SPIN_OVER_RESET
    (1 << 8, cmd::OVERRIDE_FEED_RESET),           // FEED_OVER_RESET
    (1 << 9, keycode::MACROUP),                   // UP
    (1 << 10, keycode::MACRODOWN),                // DOWN
    (1 << 11, keycode::MACROLEFT),                // LEFT
    (1 << 12, keycode::MACRORIGHT),               // RIGHT
    (1 << 13, keycode::MACRORAISE),               // RAISE
    (1 << 14, keycode::MACROLOWER),               // LOWER
    (1 << 15, keycode::RESET),                    // ALT_HALT
    (1 << 16, keycode::FEED_HOLD),                // ALT_HOLD
    (1 << 17, keycode::CYCLE_START),              // ALT_CYCLE_START
    (1 << 18, keycode::SPINON),                   // ALT_SPINDLE
    (1 << 19, keycode::MIST_TOGGLE),              // ALT_MIST
    (1 << 20, keycode::FLOOD_TOGGLE),             // ALT_FLOOD
    (1 << 21, keycode::HOME),                     // ALT_HOME
    (1 << 22, cmd::OVERRIDE_SPINDLE_RESET),       // ALT_SPIN_OVER_RESET
    (1 << 23, cmd::OVERRIDE_FEED_RESET),          // ALT_FEED_OVER_RESET
    (1 << 24, keycode::MACROUP),                  // ALT_UP
    (1 << 25, keycode::MACRODOWN),                // ALT_DOWN
    (1 << 26, keycode::MACROLEFT),                // ALT_LEFT
    (1 << 27, keycode::MACRORIGHT),               // ALT_RIGHT
    (1 << 28, keycode::MACRORAISE),               // ALT_RAISE
    (1 << 29, keycode::MACROLOWER),               // ALT_LOWER
];

/// Iterate the key codes for every set bit in a button bitmap, in bit
/// order. Bits without a table entry (30, 31) are ignored.
pub fn keycodes_for_buttons(buttons: u32) -> impl Iterator<Item = u8> {
    BUTTON_MAP
        .iter()
        .filter(move |(mask, _)| buttons & mask != 0)
        .map(|&(_, code)| code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bitmap_yields_nothing() {
        assert_eq!(keycodes_for_buttons(0).count(), 0);
    }

    #[test]
    fn cycle_start_bit_maps_to_tilde() {
        let mut codes = keycodes_for_buttons(0x04);
        assert_eq!(codes.next(), Some(keycode::CYCLE_START));
        assert_eq!(codes.next(), None);
    }

    #[test]
    fn alt_buttons_map_to_primary_codes() {
        for bit in 0..15 {
            let primary = keycodes_for_buttons(1 << bit).next();
            let alt = keycodes_for_buttons(1 << (bit + 15)).next();
            assert_eq!(primary, alt, "bit {} / {}", bit, bit + 15);
        }
    }

    #[test]
    fn multiple_bits_decode_in_bit_order() {
        let mut codes = keycodes_for_buttons((1 << 1) | (1 << 9) | (1 << 6));
        assert_eq!(codes.next(), Some(keycode::FEED_HOLD));
        assert_eq!(codes.next(), Some(keycode::HOME));
        assert_eq!(codes.next(), Some(keycode::MACROUP));
        assert_eq!(codes.next(), None);
    }

    #[test]
    fn unmapped_high_bits_are_ignored() {
        assert_eq!(keycodes_for_buttons(0xC000_0000).count(), 0);
    }
}
