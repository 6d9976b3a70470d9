//! Persisted jog parameters and macro table.
//!
//! Both structures block-copy to and from NVS as fixed little-endian
//! images, so a save followed by a load is bit-identical. Defaults are
//! applied on first boot and whenever a load fails.

use crate::host::{Nvs, NvsError};

/// Wire/NVS size of [`JogSettings`]: six f32 scalars.
pub const JOG_SETTINGS_LEN: usize = 24;

/// Maximum number of stored macros. Machines with more than three axes
/// expose only the first five (the last two macro keys become ±A jog
/// keys); storage is always sized for seven.
pub const N_MACROS: usize = 7;

/// Longest macro body, excluding the zero terminator.
pub const MACRO_TEXT_LEN: usize = 127;

/// Per-macro NVS footprint: a port/flags byte plus the terminated body.
pub const MACRO_SLOT_LEN: usize = 1 + MACRO_TEXT_LEN;

/// Wire/NVS size of [`MacroSettings`].
pub const MACRO_SETTINGS_LEN: usize = N_MACROS * MACRO_SLOT_LEN;

/// Number of macros addressable from the keypad for a given axis count.
pub fn n_macros(n_axis: u8) -> usize {
    if n_axis > 3 {
        5
    } else {
        N_MACROS
    }
}

/// The six persisted jog scalars: speeds in mm/min, distances in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JogSettings {
    pub step_speed: f32,
    pub slow_speed: f32,
    pub fast_speed: f32,
    pub step_distance: f32,
    pub slow_distance: f32,
    pub fast_distance: f32,
}

impl Default for JogSettings {
    fn default() -> Self {
        Self {
            step_speed: 100.0,
            slow_speed: 600.0,
            fast_speed: 3000.0,
            step_distance: 0.25,
            slow_distance: 500.0,
            fast_distance: 3000.0,
        }
    }
}

impl JogSettings {
    pub fn to_bytes(&self) -> [u8; JOG_SETTINGS_LEN] {
        let mut buf = [0u8; JOG_SETTINGS_LEN];
        let fields = [
            self.step_speed,
            self.slow_speed,
            self.fast_speed,
            self.step_distance,
            self.slow_distance,
            self.fast_distance,
        ];
        for (idx, value) in fields.iter().enumerate() {
            buf[idx * 4..idx * 4 + 4].copy_from_slice(&value.to_bits().to_le_bytes());
        }
        buf
    }

    pub fn from_bytes(raw: &[u8; JOG_SETTINGS_LEN]) -> Self {
        let f32_at = |off: usize| {
            f32::from_bits(u32::from_le_bytes([
                raw[off],
                raw[off + 1],
                raw[off + 2],
                raw[off + 3],
            ]))
        };
        Self {
            step_speed: f32_at(0),
            slow_speed: f32_at(4),
            fast_speed: f32_at(8),
            step_distance: f32_at(12),
            slow_distance: f32_at(16),
            fast_distance: f32_at(20),
        }
    }
}

/// One stored macro: an auxiliary port/flags byte and a zero-terminated
/// body in which `|` separates G-code blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroSlot {
    pub port: u8,
    pub data: [u8; MACRO_TEXT_LEN],
}

impl Default for MacroSlot {
    fn default() -> Self {
        Self {
            port: 0,
            data: [0; MACRO_TEXT_LEN],
        }
    }
}

/// The persisted macro table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MacroSettings {
    pub slots: [MacroSlot; N_MACROS],
}

impl MacroSettings {
    /// Body of macro `idx` up to its zero terminator; empty for an unset
    /// slot or an out-of-range index.
    pub fn text(&self, idx: usize) -> &[u8] {
        match self.slots.get(idx) {
            Some(slot) => {
                let end = slot.data.iter().position(|&b| b == 0).unwrap_or(MACRO_TEXT_LEN);
                &slot.data[..end]
            }
            None => &[],
        }
    }

    /// Store a macro body, truncating to [`MACRO_TEXT_LEN`] bytes.
    /// Out-of-range indices are ignored.
    pub fn set_text(&mut self, idx: usize, text: &[u8]) {
        if let Some(slot) = self.slots.get_mut(idx) {
            slot.data = [0; MACRO_TEXT_LEN];
            let len = text.len().min(MACRO_TEXT_LEN);
            slot.data[..len].copy_from_slice(&text[..len]);
        }
    }

    pub fn to_bytes(&self) -> [u8; MACRO_SETTINGS_LEN] {
        let mut buf = [0u8; MACRO_SETTINGS_LEN];
        for (idx, slot) in self.slots.iter().enumerate() {
            let off = idx * MACRO_SLOT_LEN;
            buf[off] = slot.port;
            buf[off + 1..off + MACRO_SLOT_LEN].copy_from_slice(&slot.data);
        }
        buf
    }

    pub fn from_bytes(raw: &[u8; MACRO_SETTINGS_LEN]) -> Self {
        let mut settings = Self::default();
        for (idx, slot) in settings.slots.iter_mut().enumerate() {
            let off = idx * MACRO_SLOT_LEN;
            slot.port = raw[off];
            slot.data.copy_from_slice(&raw[off + 1..off + MACRO_SLOT_LEN]);
        }
        settings
    }
}

impl crate::pendant::Pendant<'_> {
    /// Reserve NVS space and load both settings blocks. Returns false —
    /// leaving the adapter inert — when allocation fails.
    pub fn attach_nvs(&mut self, c: &impl crate::host::Controller, nvs: &impl Nvs) -> bool {
        let jog_addr = nvs.alloc(JOG_SETTINGS_LEN);
        let macro_addr = nvs.alloc(MACRO_SETTINGS_LEN);
        match (jog_addr, macro_addr) {
            (Some(jog_addr), Some(macro_addr)) => {
                self.jog_addr = jog_addr;
                self.macro_addr = macro_addr;
                self.load_settings(nvs);
                true
            }
            _ => {
                c.report_message(
                    "Keypad plugin failed to initialize!",
                    crate::host::MessageKind::Warning,
                );
                false
            }
        }
    }

    /// Block-copy both settings structures to their NVS regions.
    pub fn save_settings(&self, nvs: &impl Nvs) -> Result<(), NvsError> {
        nvs.write(self.jog_addr, &self.jog.to_bytes())?;
        nvs.write(self.macro_addr, &self.macros.to_bytes())
    }

    /// Load both settings blocks; a failed transfer restores defaults and
    /// re-saves them.
    pub fn load_settings(&mut self, nvs: &impl Nvs) {
        let mut jog_raw = [0u8; JOG_SETTINGS_LEN];
        match nvs.read(self.jog_addr, &mut jog_raw) {
            Ok(()) => self.jog = JogSettings::from_bytes(&jog_raw),
            Err(_) => {
                self.jog = JogSettings::default();
                let _ = nvs.write(self.jog_addr, &self.jog.to_bytes());
            }
        }

        let mut macro_raw = [0u8; MACRO_SETTINGS_LEN];
        match nvs.read(self.macro_addr, &mut macro_raw) {
            Ok(()) => self.macros = MacroSettings::from_bytes(&macro_raw),
            Err(_) => {
                self.macros = MacroSettings::default();
                let _ = nvs.write(self.macro_addr, &self.macros.to_bytes());
            }
        }
    }

    /// Reset both structures to their defaults and persist them.
    pub fn restore_settings(&mut self, nvs: &impl Nvs) -> Result<(), NvsError> {
        self.jog = JogSettings::default();
        self.macros = MacroSettings::default();
        self.save_settings(nvs)
    }
}
