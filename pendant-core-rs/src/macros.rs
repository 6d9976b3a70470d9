//! Macro execution as a temporary input source.
//!
//! A stored macro is a byte string in which `|` separates G-code blocks.
//! While a session runs, the host's stream selector pulls characters from
//! [`Pendant::stream_read`] instead of the regular input; `None` means the
//! macro has ended and the regular stream is back in charge. Exactly one
//! source is ever active — starting a second macro while one runs is
//! refused.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::host::{Controller, MessageKind};
use crate::pendant::Pendant;
use crate::settings::MACRO_TEXT_LEN;

/// Session lifecycle. `EndOk` and `EndErr` are terminal: the input stream
/// is handed back and a new session may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroState {
    #[default]
    Idle,
    Running,
    /// Ran to the end of the body.
    EndOk,
    /// Terminated by a controller error status or a soft reset.
    EndErr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroError {
    /// A session is already running; nesting is forbidden.
    Busy,
}

/// Streams one macro body a character at a time.
pub struct MacroRunner {
    body: Vec<u8, MACRO_TEXT_LEN>,
    pos: usize,
    state: MacroState,
}

impl MacroRunner {
    pub const fn new() -> Self {
        Self {
            body: Vec::new(),
            pos: 0,
            state: MacroState::Idle,
        }
    }

    /// Begin a session over `content` (truncated to the macro length
    /// limit, stopping at a zero terminator if one appears early).
    pub fn start(&mut self, content: &[u8]) -> Result<(), MacroError> {
        if self.state == MacroState::Running {
            return Err(MacroError::Busy);
        }
        self.body.clear();
        for &byte in content.iter().take(MACRO_TEXT_LEN) {
            if byte == 0 {
                break;
            }
            // Vec is sized to MACRO_TEXT_LEN, the take() above bounds us.
            let _ = self.body.push(byte);
        }
        self.pos = 0;
        self.state = MacroState::Running;
        Ok(())
    }

    /// Yield the next character: `|` becomes a line feed, and the final
    /// character is always a line feed (synthesized when the body does
    /// not end with one). `None` once the session is over.
    pub fn read(&mut self) -> Option<u8> {
        if self.state != MacroState::Running {
            return None;
        }
        if self.pos < self.body.len() {
            let mut byte = self.body[self.pos];
            self.pos += 1;
            if byte == b'|' {
                byte = b'\n';
            }
            if self.pos == self.body.len() && byte == b'\n' {
                self.state = MacroState::EndOk;
            }
            Some(byte)
        } else {
            // Body exhausted without a trailing line feed.
            self.state = MacroState::EndOk;
            Some(b'\n')
        }
    }

    /// Controller status trap. Any non-OK status while running ends the
    /// session; returns true when that happened so the caller can report.
    pub fn on_status(&mut self, code: u8) -> bool {
        if self.state == MacroState::Running && code != 0 {
            self.state = MacroState::EndErr;
            true
        } else {
            false
        }
    }

    /// Forced end on controller soft reset.
    pub fn on_soft_reset(&mut self) {
        if self.state == MacroState::Running {
            self.state = MacroState::EndErr;
        }
    }

    pub fn is_executing(&self) -> bool {
        self.state == MacroState::Running
    }

    pub fn state(&self) -> MacroState {
        self.state
    }
}

impl Default for MacroRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Pendant<'_> {
    /// Stream hook for the host's input selector: the next macro
    /// character, or `None` when no macro is executing.
    pub fn stream_read(&mut self) -> Option<u8> {
        self.runner.read()
    }

    pub fn is_macro_executing(&self) -> bool {
        self.runner.is_executing()
    }

    /// Status trap the host forwards controller status codes through
    /// while a macro session is active.
    pub fn on_macro_status(&mut self, c: &impl Controller, code: u8) {
        if self.runner.on_status(code) {
            let mut msg: String<32> = String::new();
            let _ = write!(msg, "error {} in macro", code);
            c.report_message(&msg, MessageKind::Warning);
        }
    }
}
