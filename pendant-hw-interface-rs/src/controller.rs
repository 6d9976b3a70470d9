//! Stand-in motion controller for bench bring-up.
//!
//! Logs every command the adapter issues and keeps just enough state for
//! the override knob loops to settle. A real integration implements the
//! same traits on the firmware's core instead of this.

use core::sync::atomic::{AtomicI32, AtomicU8, Ordering};

use defmt::{info, warn};
use pendant_core::{
    ControlSignals, Controller, MachineState, MessageKind, OverrideValues, RealtimeSink,
    StatusSnapshot,
};
use pendant_protocol::keys::cmd;

fn encode_state(state: MachineState) -> u8 {
    match state {
        MachineState::Idle => 0,
        MachineState::Alarm => 1,
        MachineState::Hold => 2,
        MachineState::Jog => 3,
        _ => 0,
    }
}

fn decode_state(code: u8) -> MachineState {
    match code {
        1 => MachineState::Alarm,
        2 => MachineState::Hold,
        3 => MachineState::Jog,
        _ => MachineState::Idle,
    }
}

pub struct DemoController {
    state: AtomicU8,
    feed_override: AtomicI32,
    rapid_override: AtomicI32,
    spindle_override: AtomicI32,
}

impl DemoController {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(0),
            feed_override: AtomicI32::new(100),
            rapid_override: AtomicI32::new(100),
            spindle_override: AtomicI32::new(100),
        }
    }

    fn bump(target: &AtomicI32, delta: i32) {
        let value = (target.load(Ordering::Relaxed) + delta).clamp(10, 200);
        target.store(value, Ordering::Relaxed);
    }
}

impl RealtimeSink for DemoController {
    fn enqueue_realtime(&self, byte: u8) -> bool {
        info!("realtime {:#04x}", byte);
        match byte {
            cmd::FEED_HOLD => self.state.store(encode_state(MachineState::Hold), Ordering::Relaxed),
            cmd::CYCLE_START => self.state.store(encode_state(MachineState::Idle), Ordering::Relaxed),
            _ => {}
        }
        true
    }
}

impl Controller for DemoController {
    fn state(&self) -> MachineState {
        decode_state(self.state.load(Ordering::Relaxed))
    }

    fn set_state(&self, state: MachineState) {
        info!("state -> {}", state);
        self.state.store(encode_state(state), Ordering::Relaxed);
    }

    fn snapshot(&self) -> StatusSnapshot {
        let overrides = self.overrides();
        StatusSnapshot {
            state: self.state(),
            feed_override: overrides.feed as u16,
            spindle_override: overrides.spindle as u16,
            ..Default::default()
        }
    }

    fn enqueue_gcode(&self, block: &str) -> bool {
        info!("gcode: {}", block);
        true
    }

    fn enqueue_feed_override(&self, byte: u8) -> bool {
        match byte {
            cmd::OVERRIDE_FEED_RESET => self.feed_override.store(100, Ordering::Relaxed),
            cmd::OVERRIDE_FEED_COARSE_PLUS => Self::bump(&self.feed_override, 10),
            cmd::OVERRIDE_FEED_COARSE_MINUS => Self::bump(&self.feed_override, -10),
            cmd::OVERRIDE_FEED_FINE_PLUS => Self::bump(&self.feed_override, 1),
            cmd::OVERRIDE_FEED_FINE_MINUS => Self::bump(&self.feed_override, -1),
            cmd::OVERRIDE_RAPID_RESET => self.rapid_override.store(100, Ordering::Relaxed),
            cmd::OVERRIDE_RAPID_MEDIUM => self.rapid_override.store(50, Ordering::Relaxed),
            cmd::OVERRIDE_RAPID_LOW => self.rapid_override.store(25, Ordering::Relaxed),
            _ => return false,
        }
        info!("feed/rapid override {:#04x}", byte);
        true
    }

    fn enqueue_accessory_override(&self, byte: u8) -> bool {
        match byte {
            cmd::OVERRIDE_SPINDLE_RESET => self.spindle_override.store(100, Ordering::Relaxed),
            cmd::OVERRIDE_SPINDLE_COARSE_PLUS => Self::bump(&self.spindle_override, 10),
            cmd::OVERRIDE_SPINDLE_COARSE_MINUS => Self::bump(&self.spindle_override, -10),
            cmd::OVERRIDE_SPINDLE_FINE_PLUS => Self::bump(&self.spindle_override, 1),
            cmd::OVERRIDE_SPINDLE_FINE_MINUS => Self::bump(&self.spindle_override, -1),
            _ => {}
        }
        info!("accessory override {:#04x}", byte);
        true
    }

    fn overrides(&self) -> OverrideValues {
        OverrideValues {
            feed: self.feed_override.load(Ordering::Relaxed),
            rapid: self.rapid_override.load(Ordering::Relaxed),
            spindle: self.spindle_override.load(Ordering::Relaxed),
        }
    }

    fn coord_system(&self) -> u8 {
        0
    }

    fn control_signals(&self) -> ControlSignals {
        ControlSignals::default()
    }

    fn spindle_on(&self) -> bool {
        false
    }

    fn report_message(&self, text: &str, kind: MessageKind) {
        match kind {
            MessageKind::Warning => warn!("{}", text),
            MessageKind::Info => info!("{}", text),
        }
    }
}
