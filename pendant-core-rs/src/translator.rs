//! Keycode translator.
//!
//! Drains the key ring one code at a time and maps each onto exactly one
//! downstream action: a realtime command byte, an override enqueue, a jog
//! G-code block, a macro session, or a carousel update. Unrecognized
//! codes are dropped without report.
//!
//! The translator keeps working in EStop so that unlock and reset stay
//! reachable from the pendant.

use core::fmt::Write;

use heapless::String;
use pendant_protocol::keys::{cmd, keycode};
use pendant_protocol::JogMode;

use crate::host::{Controller, MachineState, MessageKind, UnlockStatus};
use crate::jog::{Axis, JogLine};
use crate::pendant::Pendant;
use crate::settings::n_macros;

impl Pendant<'_> {
    /// Process one queued key code, if any.
    pub fn process_keypress(&mut self, c: &impl Controller) {
        let Some(code) = self.input.dequeue() else {
            return;
        };
        let state = c.state();

        if let Some(preview) = self.hooks.on_keypress_preview {
            if preview(code, state) {
                return;
            }
        }

        match code {
            // Pendant probing for a live controller.
            keycode::ATTACH_PROBE => {
                self.status_requested = true;
            }

            // Feed and rapid override pass-through.
            cmd::OVERRIDE_FEED_RESET
            | cmd::OVERRIDE_FEED_COARSE_PLUS
            | cmd::OVERRIDE_FEED_COARSE_MINUS
            | cmd::OVERRIDE_FEED_FINE_PLUS
            | cmd::OVERRIDE_FEED_FINE_MINUS
            | cmd::OVERRIDE_RAPID_RESET
            | cmd::OVERRIDE_RAPID_MEDIUM
            | cmd::OVERRIDE_RAPID_LOW => {
                c.enqueue_feed_override(code);
                self.status_requested = true;
            }

            // Spindle and coolant override pass-through.
            cmd::OVERRIDE_SPINDLE_RESET
            | cmd::OVERRIDE_SPINDLE_COARSE_PLUS
            | cmd::OVERRIDE_SPINDLE_COARSE_MINUS
            | cmd::OVERRIDE_SPINDLE_FINE_PLUS
            | cmd::OVERRIDE_SPINDLE_FINE_MINUS
            | cmd::OVERRIDE_SPINDLE_STOP
            | cmd::OVERRIDE_COOLANT_FLOOD_TOGGLE
            | cmd::OVERRIDE_COOLANT_MIST_TOGGLE => {
                c.enqueue_accessory_override(code);
                self.status_requested = true;
            }

            keycode::MIST_TOGGLE => {
                c.enqueue_accessory_override(cmd::OVERRIDE_COOLANT_MIST_TOGGLE);
                self.status_requested = true;
            }
            keycode::FLOOD_TOGGLE => {
                c.enqueue_accessory_override(cmd::OVERRIDE_COOLANT_FLOOD_TOGGLE);
                self.status_requested = true;
            }

            // Realtime pass-through.
            keycode::FEED_HOLD => {
                c.enqueue_realtime(cmd::FEED_HOLD);
            }
            keycode::CYCLE_START => {
                c.enqueue_realtime(cmd::CYCLE_START);
            }
            cmd::SAFETY_DOOR
            | cmd::OPTIONAL_STOP_TOGGLE
            | cmd::SINGLE_BLOCK_TOGGLE
            | cmd::PROBE_CONNECTED_TOGGLE
            | cmd::OVERRIDE_FAN0_TOGGLE => {
                c.enqueue_realtime(code);
            }

            cmd::MPG_MODE_TOGGLE => {
                if c.mpg_capable() {
                    c.toggle_mpg_stream();
                }
            }

            // Jog mode and modifier carousels.
            b'0' | b'1' | b'2' => {
                if let Some(mode) = JogMode::from_u8(code - b'0') {
                    self.set_jog_mode(mode);
                }
            }
            keycode::JOG_MODE_CYCLE => {
                self.set_jog_mode(self.jog_mode.cycle());
            }
            keycode::JOG_MODIFY_CYCLE => {
                self.set_jog_modify(self.jog_modify.cycle());
            }

            keycode::HOME => {
                if matches!(state, MachineState::Idle | MachineState::Alarm) {
                    let _ = self.runner.start(b"$H");
                }
            }

            keycode::RESET => {
                c.enqueue_realtime(cmd::RESET);
            }
            keycode::UNLOCK => {
                let _ = self.disable_lock(c);
            }
            keycode::MACROHOME => {
                self.cycle_wcs(c);
            }

            // Macro keys. SPINDLE doubles as spindle-off when running.
            keycode::SPINON => {
                if c.spindle_on() {
                    c.enqueue_gcode("M05");
                } else {
                    self.run_macro(c, 4);
                }
            }
            keycode::MACROUP => self.run_macro(c, 0),
            keycode::MACROLEFT => self.run_macro(c, 1),
            keycode::MACRODOWN => self.run_macro(c, 2),
            keycode::MACRORIGHT => self.run_macro(c, 3),
            keycode::MACRORAISE => {
                if c.n_axis() > 3 {
                    self.jog_key(c, code);
                } else {
                    self.run_macro(c, 5);
                }
            }
            keycode::MACROLOWER => {
                if c.n_axis() > 3 {
                    self.jog_key(c, code);
                } else {
                    self.run_macro(c, 6);
                }
            }

            // Directional jog keys.
            keycode::JOG_XR
            | keycode::JOG_XL
            | keycode::JOG_YF
            | keycode::JOG_YB
            | keycode::JOG_ZU
            | keycode::JOG_ZD
            | keycode::JOG_XRYF
            | keycode::JOG_XRYB
            | keycode::JOG_XLYF
            | keycode::JOG_XLYB
            | keycode::JOG_XRZU
            | keycode::JOG_XRZD
            | keycode::JOG_XLZU
            | keycode::JOG_XLZD => {
                self.jog_key(c, code);
            }

            _ => {}
        }
    }

    /// Compose and queue the jog command for a directional key. The jog
    /// is only emitted while the key is still held — a release that beat
    /// the foreground here already cancelled it.
    fn jog_key(&mut self, c: &impl Controller, code: u8) {
        let moves: &[(Axis, f32)] = match code {
            keycode::JOG_XR => &[(Axis::X, 1.0)],
            keycode::JOG_XL => &[(Axis::X, -1.0)],
            keycode::JOG_YF => &[(Axis::Y, 1.0)],
            keycode::JOG_YB => &[(Axis::Y, -1.0)],
            keycode::JOG_ZU => &[(Axis::Z, 1.0)],
            keycode::JOG_ZD => &[(Axis::Z, -1.0)],
            keycode::JOG_XRYF => &[(Axis::X, 1.0), (Axis::Y, 1.0)],
            keycode::JOG_XRYB => &[(Axis::X, 1.0), (Axis::Y, -1.0)],
            keycode::JOG_XLYF => &[(Axis::X, -1.0), (Axis::Y, 1.0)],
            keycode::JOG_XLYB => &[(Axis::X, -1.0), (Axis::Y, -1.0)],
            keycode::JOG_XRZU => &[(Axis::X, 1.0), (Axis::Z, 1.0)],
            keycode::JOG_XRZD => &[(Axis::X, 1.0), (Axis::Z, -1.0)],
            keycode::JOG_XLZU => &[(Axis::X, -1.0), (Axis::Z, 1.0)],
            keycode::JOG_XLZD => &[(Axis::X, -1.0), (Axis::Z, -1.0)],
            keycode::MACRORAISE => &[(Axis::A, 1.0)],
            keycode::MACROLOWER => &[(Axis::A, -1.0)],
            _ => return,
        };

        let scale = self.jog_modify.scale();
        let (distance, decimals, speed) = match self.jog_mode {
            JogMode::Slow => (self.jog.slow_distance, 0, self.jog.slow_speed * scale),
            JogMode::Fast => (self.jog.fast_distance, 0, self.jog.fast_speed * scale),
            JogMode::Step => (
                self.jog.step_distance * scale,
                if c.units_imperial() { 4 } else { 3 },
                self.jog.step_speed,
            ),
        };

        if self.input.keyreleased() {
            return;
        }

        let mut line = JogLine::new();
        for &(axis, sign) in moves {
            line.axis(axis, sign * distance, decimals);
        }
        line.feed(speed, 0);

        if c.enqueue_gcode(&line.render()) {
            self.input.set_jogging(true);
        }
    }

    /// Unlock request. Refused with the blocking condition while any
    /// inhibit input is active; otherwise Alarm/EStop transitions to
    /// Idle. A no-op in every other state.
    pub(crate) fn disable_lock(&self, c: &impl Controller) -> UnlockStatus {
        match c.state() {
            MachineState::Alarm | MachineState::EStop => {
                let signals = c.control_signals();
                if c.selftest_failed() {
                    UnlockStatus::SelfTestFailed
                } else if signals.e_stop {
                    UnlockStatus::EStop
                } else if signals.safety_door_ajar {
                    UnlockStatus::CheckDoor
                } else if signals.reset {
                    UnlockStatus::Reset
                } else {
                    c.report_message("Caution: Unlocked", MessageKind::Info);
                    c.set_state(MachineState::Idle);
                    UnlockStatus::Ok
                }
            }
            _ => UnlockStatus::Ok,
        }
    }

    /// Advance the modal work coordinate system, wrapping G54..G59.3.
    fn cycle_wcs(&self, c: &impl Controller) {
        let next = (c.coord_system() + 1) % c.n_coord_systems();
        let g5x = next as u32 + 54;

        let mut block: String<8> = String::new();
        if g5x > 59 {
            let _ = write!(block, "G59.{}", g5x - 59);
        } else {
            let _ = write!(block, "G{}", g5x);
        }
        c.enqueue_gcode(&block);
    }

    /// Start stored macro `idx`. Requires an idle controller, no session
    /// in flight, and a macro key valid for this machine's axis count.
    fn run_macro(&mut self, c: &impl Controller, idx: usize) {
        if c.state() != MachineState::Idle || self.runner.is_executing() {
            return;
        }
        if idx >= n_macros(c.n_axis()) {
            return;
        }
        let body = self.macros.text(idx);
        if body.is_empty() {
            return;
        }
        let _ = self.runner.start(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU8, Ordering};

    use crate::keybuf::KeypadInput;
    use crate::testutil::{Event, MockController};
    use pendant_protocol::JogModify;

    fn press(pendant: &mut Pendant<'_>, c: &MockController, code: u8) {
        pendant.input.enqueue_keycode(code, c);
        pendant.process_keypress(c);
    }

    // Button-bitmap codes bypass the cancel-aware path; MACROUP shares
    // its value with CAN.
    fn press_raw(pendant: &mut Pendant<'_>, c: &MockController, code: u8) {
        pendant.input.enqueue_raw(code);
        pendant.process_keypress(c);
    }

    // ── Jog keys ─────────────────────────────────────────────────────

    #[test]
    fn fast_jog_uses_fast_distance_and_speed() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::JOG_XR);
        assert_eq!(
            controller.last_gcode().unwrap().as_str(),
            "$J=G91G21X3000F3000"
        );
        assert!(input.jogging());
    }

    #[test]
    fn step_jog_scales_distance_by_the_modifier() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);
        pendant.jog_mode = JogMode::Step;
        pendant.jog_modify = JogModify::Tenth;

        press(&mut pendant, &controller, keycode::JOG_XR);
        assert_eq!(
            controller.last_gcode().unwrap().as_str(),
            "$J=G91G21X0.025F100"
        );
    }

    #[test]
    fn step_jog_gets_an_extra_decimal_in_imperial_mode() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        controller.units_imperial.set(true);
        let mut pendant = Pendant::new(&input);
        pendant.jog_mode = JogMode::Step;
        pendant.jog_modify = JogModify::Hundredth;

        press(&mut pendant, &controller, keycode::JOG_ZU);
        assert_eq!(
            controller.last_gcode().unwrap().as_str(),
            "$J=G91G21Z0.0025F100"
        );
    }

    #[test]
    fn slow_jog_scales_speed_not_distance() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);
        pendant.jog_mode = JogMode::Slow;
        pendant.jog_modify = JogModify::Tenth;

        press(&mut pendant, &controller, keycode::JOG_YB);
        assert_eq!(
            controller.last_gcode().unwrap().as_str(),
            "$J=G91G21Y-500F60"
        );
    }

    #[test]
    fn diagonal_jog_moves_two_axes() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::JOG_XLZD);
        assert_eq!(
            controller.last_gcode().unwrap().as_str(),
            "$J=G91G21X-3000Z-3000F3000"
        );
    }

    #[test]
    fn released_key_does_not_emit_a_jog() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        input.enqueue_keycode(keycode::JOG_XR, &controller);
        input.set_keyreleased(true); // released before the foreground ran
        pendant.process_keypress(&controller);

        assert!(controller.last_gcode().is_none());
        assert!(!input.jogging());
    }

    #[test]
    fn rejected_jog_does_not_set_the_jogging_flag() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        controller.accept_gcode.set(false);
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::JOG_XR);
        assert!(!input.jogging());
    }

    // ── Realtime and override pass-through ───────────────────────────

    #[test]
    fn feed_hold_and_cycle_start_forward_realtime_bytes() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::FEED_HOLD);
        press(&mut pendant, &controller, keycode::CYCLE_START);
        assert_eq!(controller.realtime_count(cmd::FEED_HOLD), 1);
        assert_eq!(controller.realtime_count(cmd::CYCLE_START), 1);
    }

    #[test]
    fn toggles_pass_through_verbatim() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        for code in [
            cmd::SAFETY_DOOR,
            cmd::OPTIONAL_STOP_TOGGLE,
            cmd::SINGLE_BLOCK_TOGGLE,
            cmd::PROBE_CONNECTED_TOGGLE,
            cmd::OVERRIDE_FAN0_TOGGLE,
        ] {
            press(&mut pendant, &controller, code);
            assert_eq!(controller.realtime_count(code), 1);
        }
    }

    #[test]
    fn override_keys_enqueue_and_refresh_status() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, cmd::OVERRIDE_FEED_COARSE_PLUS);
        assert!(controller
            .events()
            .contains(&Event::FeedOverride(cmd::OVERRIDE_FEED_COARSE_PLUS)));
        assert!(pendant.status_requested);

        pendant.status_requested = false;
        press(&mut pendant, &controller, cmd::OVERRIDE_SPINDLE_STOP);
        assert!(controller
            .events()
            .contains(&Event::AccessoryOverride(cmd::OVERRIDE_SPINDLE_STOP)));
        assert!(pendant.status_requested);
    }

    #[test]
    fn coolant_letter_keys_map_to_toggles() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::MIST_TOGGLE);
        press(&mut pendant, &controller, keycode::FLOOD_TOGGLE);
        assert!(controller
            .events()
            .contains(&Event::AccessoryOverride(cmd::OVERRIDE_COOLANT_MIST_TOGGLE)));
        assert!(controller
            .events()
            .contains(&Event::AccessoryOverride(cmd::OVERRIDE_COOLANT_FLOOD_TOGGLE)));
    }

    #[test]
    fn mpg_toggle_requires_the_capability() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, cmd::MPG_MODE_TOGGLE);
        assert!(!controller.events().contains(&Event::MpgToggle));

        controller.mpg_capable.set(true);
        press(&mut pendant, &controller, cmd::MPG_MODE_TOGGLE);
        assert!(controller.events().contains(&Event::MpgToggle));
    }

    // ── Carousels ────────────────────────────────────────────────────

    static LAST_MODE: AtomicU8 = AtomicU8::new(0xFF);
    fn record_mode(mode: JogMode) {
        LAST_MODE.store(mode as u8, Ordering::Relaxed);
    }

    #[test]
    fn mode_carousel_and_hook() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);
        pendant.hooks_mut().on_jogmode_changed = Some(record_mode);

        press(&mut pendant, &controller, keycode::JOG_MODE_CYCLE);
        assert_eq!(pendant.jog_mode(), JogMode::Slow);
        assert_eq!(LAST_MODE.load(Ordering::Relaxed), JogMode::Slow as u8);

        press(&mut pendant, &controller, keycode::JOG_MODE_CYCLE);
        assert_eq!(pendant.jog_mode(), JogMode::Step);
        press(&mut pendant, &controller, keycode::JOG_MODE_CYCLE);
        assert_eq!(pendant.jog_mode(), JogMode::Fast);
    }

    #[test]
    fn digit_keys_set_the_mode_directly() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, b'2');
        assert_eq!(pendant.jog_mode(), JogMode::Step);
        press(&mut pendant, &controller, b'1');
        assert_eq!(pendant.jog_mode(), JogMode::Slow);
        press(&mut pendant, &controller, b'0');
        assert_eq!(pendant.jog_mode(), JogMode::Fast);
    }

    #[test]
    fn modifier_carousel_wraps() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::JOG_MODIFY_CYCLE);
        assert_eq!(pendant.jog_modify(), JogModify::Tenth);
        press(&mut pendant, &controller, keycode::JOG_MODIFY_CYCLE);
        assert_eq!(pendant.jog_modify(), JogModify::Hundredth);
        press(&mut pendant, &controller, keycode::JOG_MODIFY_CYCLE);
        assert_eq!(pendant.jog_modify(), JogModify::Full);
    }

    // ── Macros, homing, WCS, unlock ──────────────────────────────────

    #[test]
    fn macro_keys_start_their_sessions_when_idle() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);
        pendant.macro_settings_mut().set_text(0, b"G0 X1|G0 X0");

        press_raw(&mut pendant, &controller, keycode::MACROUP);
        assert!(pendant.is_macro_executing());

        let mut out: heapless::Vec<u8, 32> = heapless::Vec::new();
        while let Some(byte) = pendant.stream_read() {
            out.push(byte).unwrap();
        }
        assert_eq!(out.as_slice(), b"G0 X1\nG0 X0\n");
        assert!(!pendant.is_macro_executing());
    }

    #[test]
    fn macros_require_an_idle_controller() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        controller.state.set(MachineState::Cycle);
        let mut pendant = Pendant::new(&input);
        pendant.macro_settings_mut().set_text(0, b"G0 X1");

        press_raw(&mut pendant, &controller, keycode::MACROUP);
        assert!(!pendant.is_macro_executing());
    }

    #[test]
    fn spindle_key_runs_macro_four_or_stops_the_spindle() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);
        pendant.macro_settings_mut().set_text(4, b"S1500 M03");

        press(&mut pendant, &controller, keycode::SPINON);
        assert!(pendant.is_macro_executing());

        controller.spindle_on.set(true);
        let mut pendant = Pendant::new(&input);
        press(&mut pendant, &controller, keycode::SPINON);
        assert_eq!(controller.last_gcode().unwrap().as_str(), "M05");
    }

    #[test]
    fn raise_and_lower_jog_a_on_four_axis_machines() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        controller.n_axis.set(4);
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::MACRORAISE);
        assert_eq!(
            controller.last_gcode().unwrap().as_str(),
            "$J=G91G21A3000F3000"
        );
        press(&mut pendant, &controller, keycode::MACROLOWER);
        assert_eq!(
            controller.last_gcode().unwrap().as_str(),
            "$J=G91G21A-3000F3000"
        );
    }

    #[test]
    fn raise_runs_macro_five_on_three_axis_machines() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);
        pendant.macro_settings_mut().set_text(5, b"G0 Z10");

        press(&mut pendant, &controller, keycode::MACRORAISE);
        assert!(pendant.is_macro_executing());
    }

    #[test]
    fn homing_key_streams_the_homing_command() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::HOME);
        let mut out: heapless::Vec<u8, 8> = heapless::Vec::new();
        while let Some(byte) = pendant.stream_read() {
            out.push(byte).unwrap();
        }
        assert_eq!(out.as_slice(), b"$H\n");
    }

    #[test]
    fn homing_works_from_alarm_but_not_from_cycle() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        controller.state.set(MachineState::Alarm);
        let mut pendant = Pendant::new(&input);
        press(&mut pendant, &controller, keycode::HOME);
        assert!(pendant.is_macro_executing());

        controller.state.set(MachineState::Cycle);
        let mut pendant = Pendant::new(&input);
        press(&mut pendant, &controller, keycode::HOME);
        assert!(!pendant.is_macro_executing());
    }

    #[test]
    fn wcs_key_advances_and_wraps_the_coordinate_system() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::MACROHOME);
        assert_eq!(controller.last_gcode().unwrap().as_str(), "G55");

        controller.coord_system.set(5); // G59
        press(&mut pendant, &controller, keycode::MACROHOME);
        assert_eq!(controller.last_gcode().unwrap().as_str(), "G59.1");

        controller.coord_system.set(8); // G59.3, the last one
        press(&mut pendant, &controller, keycode::MACROHOME);
        assert_eq!(controller.last_gcode().unwrap().as_str(), "G54");
    }

    #[test]
    fn unlock_is_refused_while_inhibited() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        controller.state.set(MachineState::Alarm);
        controller.signals.set(crate::host::ControlSignals {
            e_stop: true,
            ..Default::default()
        });
        let pendant = Pendant::new(&input);

        assert_eq!(pendant.disable_lock(&controller), UnlockStatus::EStop);
        assert!(!controller.events().contains(&Event::StateSet(MachineState::Idle)));

        controller.signals.set(crate::host::ControlSignals {
            safety_door_ajar: true,
            ..Default::default()
        });
        assert_eq!(pendant.disable_lock(&controller), UnlockStatus::CheckDoor);

        controller.selftest_failed.set(true);
        assert_eq!(pendant.disable_lock(&controller), UnlockStatus::SelfTestFailed);
    }

    #[test]
    fn unlock_clears_an_alarm() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        controller.state.set(MachineState::Alarm);
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::UNLOCK);
        assert!(controller.events().contains(&Event::StateSet(MachineState::Idle)));
    }

    #[test]
    fn reset_and_unlock_stay_reachable_in_estop() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        controller.state.set(MachineState::EStop);
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::RESET);
        assert_eq!(controller.realtime_count(cmd::RESET), 1);

        press(&mut pendant, &controller, keycode::UNLOCK);
        assert!(controller.events().contains(&Event::StateSet(MachineState::Idle)));
    }

    // ── Dispatch hygiene ─────────────────────────────────────────────

    #[test]
    fn each_keypress_delivers_at_most_one_downstream_action() {
        for code in [
            keycode::JOG_XR,
            keycode::FEED_HOLD,
            cmd::OVERRIDE_FEED_COARSE_PLUS,
            cmd::OVERRIDE_SPINDLE_STOP,
            keycode::MACROHOME,
            keycode::RESET,
            b'h',
            b'?',
            0x05,
        ] {
            let input = KeypadInput::new();
            let controller = MockController::new();
            let mut pendant = Pendant::new(&input);
            press(&mut pendant, &controller, code);
            assert!(
                controller.downstream_count() <= 1,
                "code {:#x} delivered {} actions",
                code,
                controller.downstream_count()
            );
        }
    }

    #[test]
    fn unrecognized_codes_are_dropped_silently() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, 0x05);
        assert!(controller.events().is_empty());
    }

    #[test]
    fn preview_hook_consumes_the_key() {
        fn swallow_all(_code: u8, _state: MachineState) -> bool {
            true
        }

        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);
        pendant.hooks_mut().on_keypress_preview = Some(swallow_all);

        press(&mut pendant, &controller, keycode::FEED_HOLD);
        assert!(controller.events().is_empty());
    }

    #[test]
    fn attach_probe_requests_a_status_send() {
        let input = KeypadInput::new();
        let controller = MockController::new();
        let mut pendant = Pendant::new(&input);

        press(&mut pendant, &controller, keycode::ATTACH_PROBE);
        assert!(pendant.status_requested);
    }
}
