//! Lock-free key-event ring shared between interrupt and foreground.
//!
//! This is the only lock-free primitive in the adapter. The producer is
//! the I2C key callback (interrupt context), the consumer is the
//! foreground translator. Head is written only by the producer, tail only
//! by the consumer, so a release store on the written index paired with an
//! acquire load on the opposite side is sufficient — no critical section.
//!
//! [`KeyBuffer::flush`] is the one exception: the jog-cancel path
//! publishes `tail = head` from the producer side. The worst a racing
//! consumer can see is a key it had already committed to popping; a
//! flushed key never reappears.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

use pendant_protocol::keys::cmd;

use crate::host::RealtimeSink;

/// ASCII CAN, the legacy cancel code keypads send on key release.
const ASCII_CAN: u8 = 0x18;

/// Ring capacity. Must be a power of two; one slot is sacrificed to
/// distinguish full from empty.
pub const KEYBUF_SIZE: usize = 8;

/// Bounded single-producer single-consumer byte queue.
pub struct KeyBuffer {
    buf: [AtomicU8; KEYBUF_SIZE],
    head: AtomicUsize,
    tail: AtomicUsize,
}

impl KeyBuffer {
    pub const fn new() -> Self {
        Self {
            buf: [const { AtomicU8::new(0) }; KEYBUF_SIZE],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Append a key code. Returns false (dropping the code) when full.
    pub fn push(&self, code: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) & (KEYBUF_SIZE - 1);
        if next == self.tail.load(Ordering::Acquire) {
            return false;
        }
        self.buf[head].store(code, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        true
    }

    /// Pop the oldest key code, or `None` when empty.
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let code = self.buf[tail].load(Ordering::Relaxed);
        self.tail.store((tail + 1) & (KEYBUF_SIZE - 1), Ordering::Release);
        Some(code)
    }

    /// Discard everything queued.
    pub fn flush(&self) {
        self.tail.store(self.head.load(Ordering::Acquire), Ordering::Release);
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Relaxed) == self.head.load(Ordering::Acquire)
    }
}

impl Default for KeyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-shared half of the adapter: the key ring plus the handful of
/// scalar flags written from interrupt context.
///
/// The integration firmware places one of these in a `static` and shares
/// it between the I2C/strobe handlers and the [`Pendant`] foreground
/// object.
///
/// [`Pendant`]: crate::Pendant
pub struct KeypadInput {
    pub(crate) keybuf: KeyBuffer,
    /// False while the pendant reports a key held down. A jog command is
    /// only emitted while the key is still held.
    keyreleased: AtomicBool,
    /// True while an incremental jog is outstanding.
    jogging: AtomicBool,
    /// Set by the strobe line to request a counts read.
    read_requested: AtomicBool,
}

impl KeypadInput {
    pub const fn new() -> Self {
        Self {
            keybuf: KeyBuffer::new(),
            keyreleased: AtomicBool::new(true),
            jogging: AtomicBool::new(false),
            read_requested: AtomicBool::new(false),
        }
    }

    /// Strobe-line interrupt entry point. Idempotent under spurious
    /// strobes: it only latches a request flag the foreground consumes.
    pub fn on_strobe(&self) {
        self.read_requested.store(true, Ordering::Release);
    }

    /// Cancel-aware enqueue, the keypad strobe path. A jog-cancel or CAN
    /// code flushes the ring and, when a jog is outstanding, forwards a
    /// jog cancel to the realtime sink. Any other code is pushed
    /// (dropped silently when the ring is full) and marks the key held.
    ///
    /// Interrupt-context safe.
    pub fn enqueue_keycode(&self, code: u8, rt: &impl RealtimeSink) -> bool {
        if code == cmd::JOG_CANCEL || code == ASCII_CAN {
            self.set_keyreleased(true);
            if self.take_jogging() {
                rt.enqueue_realtime(cmd::JOG_CANCEL);
            }
            self.flush_keys();
            true
        } else {
            let pushed = self.push_key(code);
            if pushed {
                self.set_keyreleased(false);
            }
            pushed
        }
    }

    /// Plain enqueue for codes synthesized from the button bitmap. No
    /// cancel interpretation — MACROUP shares its value with CAN — and no
    /// held-key tracking.
    pub fn enqueue_raw(&self, code: u8) -> bool {
        self.push_key(code)
    }

    pub(crate) fn take_read_request(&self) -> bool {
        self.read_requested.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn push_key(&self, code: u8) -> bool {
        self.keybuf.push(code)
    }

    /// Pop the next key for the translator.
    pub fn dequeue(&self) -> Option<u8> {
        self.keybuf.pop()
    }

    pub fn has_pending_keys(&self) -> bool {
        !self.keybuf.is_empty()
    }

    pub fn keyreleased(&self) -> bool {
        self.keyreleased.load(Ordering::Acquire)
    }

    pub fn set_keyreleased(&self, released: bool) {
        self.keyreleased.store(released, Ordering::Release);
    }

    pub fn jogging(&self) -> bool {
        self.jogging.load(Ordering::Acquire)
    }

    pub fn set_jogging(&self, jogging: bool) {
        self.jogging.store(jogging, Ordering::Release);
    }

    /// Atomically clear the jogging flag, reporting whether it was set.
    pub(crate) fn take_jogging(&self) -> bool {
        self.jogging.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn flush_keys(&self) {
        self.keybuf.flush();
    }
}

impl Default for KeypadInput {
    fn default() -> Self {
        Self::new()
    }
}
