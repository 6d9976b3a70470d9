//! The foreground half of the adapter.
//!
//! [`Pendant`] owns every piece of state that is only touched from the
//! host's single-threaded foreground: jog configuration, the mode and
//! modifier carousels, the macro runner, the attach/watchdog bookkeeping,
//! and the previous counts baseline. The interrupt-shared half lives in
//! [`KeypadInput`] and is linked in by reference.

use heapless::String;
use pendant_protocol::{CountsPacket, JogMode, JogModify};

use crate::keybuf::KeypadInput;
use crate::macros::MacroRunner;
use crate::settings::{JogSettings, MacroSettings, MACRO_TEXT_LEN};

/// Event hooks a display or UI plugin can register. One callback per
/// event; the adapter itself never chains handlers.
#[derive(Default, Clone, Copy)]
pub struct Hooks {
    /// Runs before normal dispatch; returning true consumes the key.
    pub on_keypress_preview: Option<fn(code: u8, state: crate::host::MachineState) -> bool>,
    pub on_jogmode_changed: Option<fn(JogMode)>,
    pub on_jogmodify_changed: Option<fn(JogModify)>,
}

/// Foreground state of the pendant adapter.
pub struct Pendant<'a> {
    pub(crate) input: &'a KeypadInput,
    pub(crate) hooks: Hooks,

    pub(crate) jog: JogSettings,
    pub(crate) macros: MacroSettings,
    pub(crate) jog_mode: JogMode,
    pub(crate) jog_modify: JogModify,

    pub(crate) runner: MacroRunner,

    pub(crate) attached: bool,
    pub(crate) watchdog_ms: u32,
    pub(crate) last_tick_ms: Option<u32>,
    pub(crate) last_status_ms: Option<u32>,
    pub(crate) next_poll_ms: Option<u32>,
    pub(crate) prev_counts: CountsPacket,
    pub(crate) last_work_done: bool,
    pub(crate) status_requested: bool,

    pub(crate) jog_addr: u32,
    pub(crate) macro_addr: u32,

    pub(crate) message: Option<String<MACRO_TEXT_LEN>>,
}

impl<'a> Pendant<'a> {
    pub fn new(input: &'a KeypadInput) -> Self {
        Self {
            input,
            hooks: Hooks::default(),
            jog: JogSettings::default(),
            macros: MacroSettings::default(),
            jog_mode: JogMode::default(),
            jog_modify: JogModify::default(),
            runner: MacroRunner::new(),
            attached: false,
            watchdog_ms: 0,
            last_tick_ms: None,
            last_status_ms: None,
            next_poll_ms: None,
            prev_counts: CountsPacket::default(),
            last_work_done: false,
            status_requested: false,
            jog_addr: 0,
            macro_addr: 0,
            message: None,
        }
    }

    pub fn input(&self) -> &'a KeypadInput {
        self.input
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    pub fn jog_settings(&self) -> &JogSettings {
        &self.jog
    }

    pub fn jog_settings_mut(&mut self) -> &mut JogSettings {
        &mut self.jog
    }

    pub fn macro_settings_mut(&mut self) -> &mut MacroSettings {
        &mut self.macros
    }

    pub fn jog_mode(&self) -> JogMode {
        self.jog_mode
    }

    pub fn jog_modify(&self) -> JogModify {
        self.jog_modify
    }

    pub fn attached(&self) -> bool {
        self.attached
    }

    /// Queue a plain-text message for the next status packet. Truncated
    /// to the inline buffer size.
    pub fn post_message(&mut self, text: &str) {
        let mut msg: String<MACRO_TEXT_LEN> = String::new();
        for ch in text.chars() {
            if msg.push(ch).is_err() {
                break;
            }
        }
        self.message = Some(msg);
    }

    /// Host notification: the controller state machine changed. Provokes
    /// an immediate (rate-clamped) status send on the next tick.
    pub fn on_state_changed(&mut self) {
        self.status_requested = true;
    }

    /// Host notification: the controller performed a soft reset. Any
    /// running macro is forcibly ended.
    pub fn on_soft_reset(&mut self) {
        self.runner.on_soft_reset();
    }

    pub(crate) fn set_jog_mode(&mut self, mode: JogMode) {
        self.jog_mode = mode;
        if let Some(hook) = self.hooks.on_jogmode_changed {
            hook(mode);
        }
    }

    pub(crate) fn set_jog_modify(&mut self, modify: JogModify) {
        self.jog_modify = modify;
        if let Some(hook) = self.hooks.on_jogmodify_changed {
            hook(modify);
        }
    }
}
