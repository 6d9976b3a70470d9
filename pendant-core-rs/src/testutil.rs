//! Mock controller and NVS for the test modules.

use core::cell::{Cell, RefCell};

use heapless::{String, Vec};

use crate::host::{
    ControlSignals, Controller, MachineState, MessageKind, Nvs, NvsError, OverrideValues,
    RealtimeSink, StatusSnapshot,
};

/// Everything the adapter pushed downstream, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Realtime(u8),
    Gcode(String<64>),
    FeedOverride(u8),
    AccessoryOverride(u8),
    Message(String<64>, MessageKind),
    StateSet(MachineState),
    MpgToggle,
}

pub struct MockController {
    pub state: Cell<MachineState>,
    pub snapshot: Cell<StatusSnapshot>,
    pub overrides: Cell<OverrideValues>,
    pub signals: Cell<ControlSignals>,
    pub selftest_failed: Cell<bool>,
    pub spindle_on: Cell<bool>,
    pub n_axis: Cell<u8>,
    pub coord_system: Cell<u8>,
    pub mpg_capable: Cell<bool>,
    pub units_imperial: Cell<bool>,
    pub accept_gcode: Cell<bool>,
    pub events: RefCell<Vec<Event, 64>>,
}

impl MockController {
    pub fn new() -> Self {
        Self {
            state: Cell::new(MachineState::Idle),
            snapshot: Cell::new(StatusSnapshot::default()),
            overrides: Cell::new(OverrideValues::default()),
            signals: Cell::new(ControlSignals::default()),
            selftest_failed: Cell::new(false),
            spindle_on: Cell::new(false),
            n_axis: Cell::new(3),
            coord_system: Cell::new(0),
            mpg_capable: Cell::new(false),
            units_imperial: Cell::new(false),
            accept_gcode: Cell::new(true),
            events: RefCell::new(Vec::new()),
        }
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event).unwrap();
    }

    pub fn events(&self) -> Vec<Event, 64> {
        self.events.borrow().clone()
    }

    pub fn last_gcode(&self) -> Option<String<64>> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find_map(|event| match event {
                Event::Gcode(block) => Some(block.clone()),
                _ => None,
            })
    }

    pub fn gcode_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::Gcode(_)))
            .count()
    }

    pub fn realtime_count(&self, cmd: u8) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::Realtime(byte) if *byte == cmd))
            .count()
    }

    pub fn warned_with(&self, text: &str) -> bool {
        self.events.borrow().iter().any(|event| {
            matches!(event, Event::Message(msg, _) if msg.as_str() == text)
        })
    }

    /// Realtime bytes, override enqueues, and G-code blocks — the actions
    /// a single keypress must deliver at most one of.
    pub fn downstream_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::Realtime(_)
                        | Event::Gcode(_)
                        | Event::FeedOverride(_)
                        | Event::AccessoryOverride(_)
                )
            })
            .count()
    }
}

impl RealtimeSink for MockController {
    fn enqueue_realtime(&self, cmd: u8) -> bool {
        self.push(Event::Realtime(cmd));
        true
    }
}

impl Controller for MockController {
    fn state(&self) -> MachineState {
        self.state.get()
    }

    fn set_state(&self, state: MachineState) {
        self.state.set(state);
        self.push(Event::StateSet(state));
    }

    fn snapshot(&self) -> StatusSnapshot {
        let mut snapshot = self.snapshot.get();
        snapshot.state = self.state.get();
        snapshot.n_axis = self.n_axis.get();
        snapshot.coord_system = self.coord_system.get();
        snapshot
    }

    fn enqueue_gcode(&self, block: &str) -> bool {
        if !self.accept_gcode.get() {
            return false;
        }
        let mut copy: String<64> = String::new();
        let _ = copy.push_str(block);
        self.push(Event::Gcode(copy));
        true
    }

    fn enqueue_feed_override(&self, cmd: u8) -> bool {
        self.push(Event::FeedOverride(cmd));
        true
    }

    fn enqueue_accessory_override(&self, cmd: u8) -> bool {
        self.push(Event::AccessoryOverride(cmd));
        true
    }

    fn overrides(&self) -> OverrideValues {
        self.overrides.get()
    }

    fn coord_system(&self) -> u8 {
        self.coord_system.get()
    }

    fn n_axis(&self) -> u8 {
        self.n_axis.get()
    }

    fn units_imperial(&self) -> bool {
        self.units_imperial.get()
    }

    fn mpg_capable(&self) -> bool {
        self.mpg_capable.get()
    }

    fn toggle_mpg_stream(&self) {
        self.push(Event::MpgToggle);
    }

    fn control_signals(&self) -> ControlSignals {
        self.signals.get()
    }

    fn selftest_failed(&self) -> bool {
        self.selftest_failed.get()
    }

    fn spindle_on(&self) -> bool {
        self.spindle_on.get()
    }

    fn report_message(&self, text: &str, kind: MessageKind) {
        let mut copy: String<64> = String::new();
        let _ = copy.push_str(text);
        self.push(Event::Message(copy, kind));
    }
}

/// In-memory NVS with switchable failure modes.
pub struct MockNvs {
    pub mem: RefCell<[u8; 2048]>,
    pub next: Cell<u32>,
    pub exhausted: Cell<bool>,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
}

impl MockNvs {
    pub fn new() -> Self {
        Self {
            mem: RefCell::new([0; 2048]),
            // Address 0 is the "not allocated" sentinel.
            next: Cell::new(4),
            exhausted: Cell::new(false),
            fail_reads: Cell::new(false),
            fail_writes: Cell::new(false),
        }
    }
}

impl Nvs for MockNvs {
    fn alloc(&self, len: usize) -> Option<u32> {
        if self.exhausted.get() {
            return None;
        }
        let addr = self.next.get();
        self.next.set(addr + len as u32);
        Some(addr)
    }

    fn read(&self, addr: u32, out: &mut [u8]) -> Result<(), NvsError> {
        if self.fail_reads.get() {
            return Err(NvsError::Transfer);
        }
        let start = addr as usize;
        out.copy_from_slice(&self.mem.borrow()[start..start + out.len()]);
        Ok(())
    }

    fn write(&self, addr: u32, data: &[u8]) -> Result<(), NvsError> {
        if self.fail_writes.get() {
            return Err(NvsError::Transfer);
        }
        let start = addr as usize;
        self.mem.borrow_mut()[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }
}
