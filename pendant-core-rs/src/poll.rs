//! Poll scheduler, watchdog, and attach handshake.
//!
//! The host's periodic tick calls [`Pendant::poll`]; the returned
//! [`PollOutcome`] tells the integration firmware what I2C work to do.
//! Completed counts reads come back through [`Pendant::on_counts`], which
//! also runs the attach handshake for a detached pendant.
//!
//! Cadence: after an exchange that produced work, the next read happens
//! at the counts sampling interval so encoder motion stays smooth; with
//! the controller jogging the pendant gets fresh status quickly; idle
//! machines are polled lazily.

use pendant_protocol::keys::cmd;
use pendant_protocol::{CountsPacket, StatusPacket, PROTOCOL_VERSION};

use crate::counts::{CountsOutcome, READ_COUNT_INTERVAL_MS};
use crate::host::{Controller, MachineState, MessageKind};
use crate::pendant::Pendant;

/// Detach after this long without pendant progress.
pub const WATCHDOG_TIMEOUT_MS: u32 = 2000;

/// Poll interval while the controller is jogging.
pub const POLL_JOG_INTERVAL_MS: u32 = 100;

/// Poll interval for everything else.
pub const POLL_IDLE_INTERVAL_MS: u32 = 300;

/// Status packets are never emitted more often than this.
pub const STATUS_MIN_INTERVAL_MS: u32 = 10;

/// I2C work requested by one tick.
#[derive(Debug, Default)]
pub struct PollOutcome {
    /// Status packet to write to the pendant, when one is due.
    pub status: Option<StatusPacket>,
    /// A counts read should be issued; feed the result to
    /// [`Pendant::on_counts`].
    pub read_counts: bool,
}

/// True when `now` has reached or passed `at`, wrap-safe.
fn reached(now: u32, at: u32) -> bool {
    (now.wrapping_sub(at) as i32) >= 0
}

impl Pendant<'_> {
    /// Foreground tick. Advances the watchdog, drains queued keys through
    /// the translator, and decides what I2C traffic is due.
    pub fn poll(&mut self, c: &impl Controller, now_ms: u32) -> PollOutcome {
        let elapsed = self
            .last_tick_ms
            .map_or(0, |last| now_ms.wrapping_sub(last));
        self.last_tick_ms = Some(now_ms);

        if self.attached {
            self.watchdog_ms = self.watchdog_ms.saturating_add(elapsed);
            if self.watchdog_ms > WATCHDOG_TIMEOUT_MS {
                self.attached = false;
                self.watchdog_ms = 0;
                self.last_work_done = false;
                #[cfg(feature = "defmt")]
                defmt::warn!("pendant watchdog expired, detaching");
                c.report_message("Pendant disconnected! Holding.", MessageKind::Warning);
                c.enqueue_realtime(cmd::FEED_HOLD);
            }
        }

        while self.input.has_pending_keys() {
            self.process_keypress(c);
        }

        let strobed = self.input.take_read_request();
        let due = self.next_poll_ms.map_or(true, |at| reached(now_ms, at));

        let mut outcome = PollOutcome::default();
        if due || strobed {
            outcome.read_counts = true;
            let interval = if self.last_work_done {
                READ_COUNT_INTERVAL_MS
            } else if c.state() == MachineState::Jog {
                POLL_JOG_INTERVAL_MS
            } else {
                POLL_IDLE_INTERVAL_MS
            };
            self.next_poll_ms = Some(now_ms.wrapping_add(interval));
        }

        let want_status = self.status_requested || (due && self.attached);
        let clamp_open = self
            .last_status_ms
            .map_or(true, |last| now_ms.wrapping_sub(last) >= STATUS_MIN_INTERVAL_MS);
        if want_status && clamp_open {
            self.status_requested = false;
            self.last_status_ms = Some(now_ms);
            outcome.status = Some(self.build_status(&c.snapshot()));
        }

        outcome
    }

    /// Completion of a counts read.
    ///
    /// Detached: runs the attach handshake — verify the protocol version,
    /// store the packet as the delta baseline, zero the watchdog. A
    /// version mismatch leaves the pendant detached.
    ///
    /// Attached: resets the watchdog if the pendant's uptime advanced,
    /// then processes the packet.
    pub fn on_counts(&mut self, c: &impl Controller, packet: &CountsPacket) -> CountsOutcome {
        if !self.attached {
            if packet.version != PROTOCOL_VERSION {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "pendant protocol version {} (want {})",
                    packet.version,
                    PROTOCOL_VERSION
                );
                c.report_message("Wrong MPG protocol version.", MessageKind::Warning);
                return CountsOutcome::default();
            }
            self.prev_counts = *packet;
            self.attached = true;
            self.watchdog_ms = 0;
            self.last_work_done = false;
            // Greet the fresh pendant with a status packet.
            self.status_requested = true;
            #[cfg(feature = "defmt")]
            defmt::info!("pendant attached");
            return CountsOutcome::default();
        }

        if packet.uptime != self.prev_counts.uptime {
            self.watchdog_ms = 0;
        }

        let outcome = self.process_counts(c, packet);
        self.last_work_done = outcome.work_done;
        outcome
    }
}
