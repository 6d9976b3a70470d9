//! Async I2C session with the MPG pendant.
//!
//! The pendant is a memory-mapped slave: a 16-bit big-endian memory
//! address selects where a transfer starts in its register file. This
//! crate provides [`PendantLink`], the three transfers the adapter core
//! requests, over any `embedded-hal-async` I2C implementation:
//!
//! - [`write_status`](PendantLink::write_status) — status packet to
//!   offset 0.
//! - [`read_counts`](PendantLink::read_counts) — counts packet from the
//!   offset right after the status region.
//! - [`clear_buttons`](PendantLink::clear_buttons) — four zero bytes over
//!   the buttons word.
//!
//! Scheduling lives elsewhere: the core decides *when* to transfer, the
//! integration firmware calls these methods, and the strobe line is a
//! plain GPIO owned by the firmware.
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on error
//!   types for embedded logging.

#![no_std]

mod error;
mod session;

pub use error::LinkError;
pub use session::PendantLink;

pub use pendant_protocol::PENDANT_ADDRESS as DEFAULT_ADDRESS;
