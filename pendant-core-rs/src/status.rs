//! Status packet builder.
//!
//! Snapshots controller state into the wire packet streamed to the
//! pendant. Send pacing (the 10 ms clamp and the poll cadence) lives in
//! the poll scheduler; this module only assembles packets.

use pendant_protocol::status::{machine_state, A_AXIS_ABSENT_BITS};
use pendant_protocol::{jog, JogMode, StatusPacket};

use crate::host::{MachineState, StatusSnapshot};
use crate::pendant::Pendant;

/// Wire code for a controller state. Alarm and EStop intentionally share
/// a code; states the pendant cannot render collapse to `UNKNOWN`.
pub fn map_state(state: MachineState) -> u8 {
    match state {
        MachineState::Alarm => machine_state::ALARM,
        MachineState::EStop => machine_state::ALARM,
        MachineState::Cycle => machine_state::CYCLE,
        MachineState::Hold => machine_state::HOLD,
        MachineState::ToolChange => machine_state::TOOL_CHANGE,
        MachineState::Idle => machine_state::IDLE,
        MachineState::Homing => machine_state::HOMING,
        MachineState::Jog => machine_state::JOG,
        _ => machine_state::UNKNOWN,
    }
}

impl Pendant<'_> {
    /// Assemble a status packet from a controller snapshot and the
    /// adapter's own jog state. Consumes any queued operator message.
    pub fn build_status(&mut self, snap: &StatusSnapshot) -> StatusPacket {
        let mut packet = StatusPacket {
            machine_state: map_state(snap.state),
            machine_mode: snap.machine_mode,
            disconnected: !self.attached,
            machine_substate: snap.substate,
            home_state: snap.homed_mask,
            feed_override: snap.feed_override,
            spindle_override: snap.spindle_override,
            spindle_stop: snap.spindle_stop as u8,
            spindle_state: snap.spindle_state,
            spindle_rpm: libm::roundf(spindle_rpm(snap)) as i32,
            feed_rate: snap.feed_rate,
            coolant_state: snap.coolant_state,
            jog_mode: jog::pack_jog_mode(self.jog_mode, self.jog_modify),
            signals: snap.signals,
            jog_stepsize: self.jog_stepsize(),
            current_wcs: snap.coord_system,
            limits: snap.limits,
            status_code: snap.status_code,
            machine_modes: snap.machine_modes,
            ..Default::default()
        };

        // Work coordinates: steps → mm, minus work offsets (incl. TLO).
        let axes = (snap.n_axis as usize).min(4);
        for idx in 0..axes {
            let mpos = snap.position_steps[idx] as f32 / snap.steps_per_mm[idx];
            packet.coordinate[idx] = mpos - snap.wco[idx];
        }
        if snap.n_axis <= 3 {
            packet.coordinate[3] = f32::from_bits(A_AXIS_ABSENT_BITS);
        }

        if let Some(message) = self.message.take() {
            packet.set_message(&message);
        }

        packet
    }

    /// Quantity the pendant shows as "step size": the distance actually
    /// moved per step in Step mode, the modified speed otherwise.
    fn jog_stepsize(&self) -> f32 {
        let scale = self.jog_modify.scale();
        match self.jog_mode {
            JogMode::Slow => self.jog.slow_speed * scale,
            JogMode::Fast => self.jog.fast_speed * scale,
            JogMode::Step => self.jog.step_distance * scale,
        }
    }
}

/// RPM reported to the pendant. A variable spindle prefers the live data
/// source, then the override-adjusted programmed value while running;
/// fixed spindles report the raw programmed value.
fn spindle_rpm(snap: &StatusSnapshot) -> f32 {
    if snap.spindle_variable {
        if let Some(live) = snap.spindle_rpm_live {
            live
        } else if snap.spindle_on {
            snap.spindle_rpm_overridden
        } else {
            0.0
        }
    } else {
        snap.spindle_rpm_programmed
    }
}
