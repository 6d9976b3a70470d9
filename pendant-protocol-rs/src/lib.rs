//! Wire protocol for the I2C MPG pendant.
//!
//! The pendant is a memory-mapped I2C slave. Its shared memory starts with
//! the [`StatusPacket`] (written by the controller side) followed by the
//! [`CountsPacket`] (read by the controller side). The `buttons` word inside
//! the counts packet is individually addressable so the host can clear it
//! after consuming a press.
//!
//! ```text
//! offset 0                STATUS_LEN              STATUS_LEN + BUTTONS_OFFSET
//! ┌───────────────────────┬───────────────────────────┬─────────┬──────────┐
//! │ status packet (write) │ counts packet (read)      │ buttons │ …        │
//! └───────────────────────┴───────────────────────────┴─────────┴──────────┘
//! ```
//!
//! All multi-byte fields are little-endian and the layouts are packed by
//! construction: encode/decode are hand-written against explicit offset
//! constants, so the wire size never depends on compiler padding. Layout
//! tests in each module pin the offsets.
//!
//! # Crate Features
//!
//! - **`defmt`** — derive [`defmt::Format`] on the packet types for
//!   embedded logging.

#![no_std]

pub mod counts;
pub mod jog;
pub mod keys;
pub mod status;

pub use counts::{CountsPacket, BUTTONS_OFFSET, COUNTS_LEN};
pub use jog::{JogMode, JogModify};
pub use status::{StatusPacket, STATUS_LEN};

/// 7-bit I2C address of the pendant.
pub const PENDANT_ADDRESS: u8 = 0x49;

/// Protocol revision reported by the pendant in [`CountsPacket::version`].
///
/// Checked once during the attach handshake; a mismatch keeps the pendant
/// detached.
pub const PROTOCOL_VERSION: u8 = 2;

/// Memory address of the counts packet in the pendant's register file.
pub const COUNTS_MEM_OFFSET: u16 = STATUS_LEN as u16;

/// Memory address of the buttons word in the pendant's register file.
pub const BUTTONS_MEM_OFFSET: u16 = COUNTS_MEM_OFFSET + BUTTONS_OFFSET as u16;
