//! Controller-side adapter for an I2C MPG pendant.
//!
//! This crate turns raw pendant input — key codes, button bitmaps, and
//! accumulated encoder counts — into motion-controller directives (jog
//! G-code, realtime command bytes, override adjustments, stored macros)
//! while producing the status packets streamed back to the pendant.
//!
//! # Architecture
//!
//! The crate is hardware-free. Everything the adapter needs from its
//! surroundings enters through three seams:
//!
//! - [`Controller`](host::Controller) — the motion controller's command
//!   surface (realtime sink, G-code queue, override enqueuers, state).
//! - [`Nvs`](host::Nvs) — persistence for jog parameters and macros.
//! - [`KeypadInput`](keybuf::KeypadInput) — the interrupt-side half:
//!   a lock-free key ring plus the strobe/held/jogging flags, shared by
//!   reference between the I2C interrupt context and the foreground.
//!
//! The foreground half is [`Pendant`]: the integration firmware calls
//! [`Pendant::poll`] from its periodic tick and performs whatever I2C
//! work the returned [`PollOutcome`](poll::PollOutcome) requests, feeding
//! completed counts reads back through [`Pendant::on_counts`].
//!
//! ```text
//!        ISR context                           foreground
//! strobe ─▶ KeypadInput::on_strobe ──────┐
//! key    ─▶ KeypadInput::enqueue_keycode ─▶ ring ─▶ poll() ─▶ translator
//!                                                     │
//!                       counts read completion ─▶ on_counts ─▶ jogger,
//!                                                     │        overrides,
//!                                        status send ◀┘        buttons
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging for embedded targets.

#![no_std]

pub mod counts;
pub mod host;
pub mod jog;
pub mod keybuf;
pub mod macros;
pub mod pendant;
pub mod poll;
pub mod settings;
pub mod status;
pub mod translator;

pub use host::{ControlSignals, Controller, MachineState, MessageKind, Nvs, OverrideValues,
               RealtimeSink, StatusSnapshot};
pub use keybuf::KeypadInput;
pub use pendant::{Hooks, Pendant};
pub use poll::PollOutcome;
pub use settings::{JogSettings, MacroSettings};

#[cfg(test)]
pub(crate) mod testutil;
