//! Interfaces toward the host firmware.
//!
//! The adapter never talks to the motion controller or to non-volatile
//! storage directly; the integration firmware implements these traits and
//! hands references in. All methods take `&self` — controller command
//! queues are interrupt-shared singletons on every supported platform, so
//! implementations are expected to synchronize internally.

/// Controller state machine states, as the adapter needs to distinguish
/// them. Anything not listed here maps onto the pendant's "unknown"
/// rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineState {
    Idle,
    Alarm,
    EStop,
    CheckMode,
    Homing,
    Cycle,
    Hold,
    Jog,
    SafetyDoor,
    Sleep,
    ToolChange,
}

/// Control-input signal levels relevant to the unlock path.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSignals {
    pub e_stop: bool,
    pub safety_door_ajar: bool,
    pub reset: bool,
}

/// Current override percentages held by the controller.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OverrideValues {
    pub feed: i32,
    pub rapid: i32,
    pub spindle: i32,
}

impl Default for OverrideValues {
    fn default() -> Self {
        Self {
            feed: 100,
            rapid: 100,
            spindle: 100,
        }
    }
}

/// Severity of an operator-visible report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    Info,
    Warning,
}

/// Outcome of an unlock request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnlockStatus {
    Ok,
    SelfTestFailed,
    EStop,
    CheckDoor,
    Reset,
}

/// Everything the status builder samples from the controller in one go.
///
/// Positions arrive as raw step counts; the builder converts to
/// millimeters and subtracts `wco` (work offsets including tool length
/// offset) itself.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub state: MachineState,
    pub substate: u8,
    /// Machine mode bits for the packed state byte (normal/laser/lathe).
    pub machine_mode: u8,
    /// Axes both configured for homing and currently homed.
    pub homed_mask: u8,
    pub feed_override: u16,
    pub spindle_override: u16,
    pub spindle_stop: bool,
    pub spindle_state: u8,
    pub spindle_variable: bool,
    pub spindle_on: bool,
    /// Programmed RPM parameter.
    pub spindle_rpm_programmed: f32,
    /// Programmed RPM with the spindle override applied.
    pub spindle_rpm_overridden: f32,
    /// Reading from an RPM data source (encoder, tach), when one exists.
    pub spindle_rpm_live: Option<f32>,
    /// Realtime feed rate.
    pub feed_rate: f32,
    pub coolant_state: u8,
    pub signals: u8,
    pub limits: u8,
    pub status_code: u8,
    pub machine_modes: u8,
    pub coord_system: u8,
    pub n_axis: u8,
    pub position_steps: [i32; 4],
    pub steps_per_mm: [f32; 4],
    /// Per-axis work coordinate offset plus TLO, in millimeters.
    pub wco: [f32; 4],
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            state: MachineState::Idle,
            substate: 0,
            machine_mode: 0,
            homed_mask: 0,
            feed_override: 100,
            spindle_override: 100,
            spindle_stop: false,
            spindle_state: 0,
            spindle_variable: false,
            spindle_on: false,
            spindle_rpm_programmed: 0.0,
            spindle_rpm_overridden: 0.0,
            spindle_rpm_live: None,
            feed_rate: 0.0,
            coolant_state: 0,
            signals: 0,
            limits: 0,
            status_code: 0,
            machine_modes: 0,
            coord_system: 0,
            n_axis: 3,
            position_steps: [0; 4],
            steps_per_mm: [250.0; 4],
            wco: [0.0; 4],
        }
    }
}

/// The realtime command sink, split out so the interrupt-side enqueue path
/// can forward a jog cancel without dragging the full controller surface
/// into interrupt context.
pub trait RealtimeSink {
    /// Push a realtime command byte. Must be callable from interrupt
    /// context. Returns false when the sink rejected the byte.
    fn enqueue_realtime(&self, cmd: u8) -> bool;
}

/// The motion controller's command surface.
pub trait Controller: RealtimeSink {
    fn state(&self) -> MachineState;

    /// Force a state transition. Only used by the unlock path
    /// (Alarm/EStop → Idle).
    fn set_state(&self, state: MachineState);

    fn snapshot(&self) -> StatusSnapshot;

    /// Queue a G-code block for the parser. Returns false when the queue
    /// is full or the block was rejected.
    fn enqueue_gcode(&self, block: &str) -> bool;

    /// Push a feed/rapid override command byte.
    fn enqueue_feed_override(&self, cmd: u8) -> bool;

    /// Push a spindle/coolant override command byte.
    fn enqueue_accessory_override(&self, cmd: u8) -> bool;

    fn overrides(&self) -> OverrideValues;

    /// Active work coordinate system index (0 = G54).
    fn coord_system(&self) -> u8;

    fn n_coord_systems(&self) -> u8 {
        9
    }

    fn n_axis(&self) -> u8 {
        3
    }

    fn units_imperial(&self) -> bool {
        false
    }

    /// Whether the driver supports handing the input stream to an MPG.
    fn mpg_capable(&self) -> bool {
        false
    }

    /// Toggle the MPG input stream, when supported.
    fn toggle_mpg_stream(&self) {}

    fn control_signals(&self) -> ControlSignals;

    fn selftest_failed(&self) -> bool {
        false
    }

    fn spindle_on(&self) -> bool;

    /// Operator-visible report (console, sender, display).
    fn report_message(&self, text: &str, kind: MessageKind);
}

/// Result of an NVS transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvsError {
    /// Checksum mismatch or transfer failure.
    Transfer,
}

/// Non-volatile storage for the jog parameters and macro table.
///
/// Mirrors the block-copy NVS interface CNC firmwares expose: allocate a
/// region once at init, then whole-struct reads and writes.
pub trait Nvs {
    /// Reserve `len` bytes, returning the region's address. `None` when
    /// the NVS area is exhausted.
    fn alloc(&self, len: usize) -> Option<u32>;

    fn read(&self, addr: u32, out: &mut [u8]) -> Result<(), NvsError>;

    fn write(&self, addr: u32, data: &[u8]) -> Result<(), NvsError>;
}
