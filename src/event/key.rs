//! Hardware key debounce.
//!
//! Raw key transitions become press/hold semantics: keys that go down and
//! back up within the hold window emit one `KeyPress` carrying the whole
//! chord mask, while a chord held past [`KEY_HOLD_TIMEOUT_MS`] emits one
//! `KeyHold` instead and suppresses the press. `KeyDown`/`KeyUp` are
//! always forwarded so widgets can track raw state.
//!
//! The driver calls [`KeyDebounce::on_tick`] every poll cycle; the hold
//! event fires from there, not from a key transition.

use crate::event::types::{Event, EventKind};

/// A chord held this long emits `KeyHold` in place of the press.
pub const KEY_HOLD_TIMEOUT_MS: u64 = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum KeyState {
    /// No keys down.
    None,
    /// Keys down, neither press nor hold emitted yet.
    Down,
    /// Hold or press already emitted for this chord.
    Sent,
}

#[derive(Debug)]
pub struct KeyDebounce {
    state: KeyState,
    /// Or-accumulated codes of every key currently down.
    mask: u32,
    /// Hold deadline; 0 when disarmed.
    hold_at: u64,
}

impl Default for KeyDebounce {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDebounce {
    pub fn new() -> Self {
        Self { state: KeyState::None, mask: 0, hold_at: 0 }
    }

    /// Codes of every key currently down.
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Feed a key-down transition. OS autorepeat of a key already in the
    /// mask is dropped.
    pub fn on_key_down(&mut self, code: u32, now_ms: u64) -> Vec<Event> {
        if self.mask & code != 0 {
            return Vec::new();
        }
        self.mask |= code;
        if self.state != KeyState::Sent {
            self.state = KeyState::Down;
            self.hold_at = now_ms + KEY_HOLD_TIMEOUT_MS;
        }
        vec![Event::new(EventKind::KeyDown { code }, now_ms)]
    }

    /// Feed a key-up transition.
    pub fn on_key_up(&mut self, code: u32, now_ms: u64) -> Vec<Event> {
        if self.mask & code == 0 {
            return Vec::new();
        }
        let mut out = Vec::new();
        if self.state == KeyState::Down {
            // Whole chord reported in the press, not just the released key.
            out.push(Event::new(EventKind::KeyPress { code: self.mask }, now_ms));
            self.state = KeyState::Sent;
        }
        out.push(Event::new(EventKind::KeyUp { code }, now_ms));

        self.hold_at = 0;
        self.mask &= !code;
        if self.mask == 0 {
            self.state = KeyState::None;
        }
        out
    }

    /// Poll for the hold deadline.
    pub fn on_tick(&mut self, now_ms: u64) -> Vec<Event> {
        if self.state == KeyState::Down && self.hold_at != 0 && now_ms >= self.hold_at {
            self.state = KeyState::Sent;
            self.hold_at = 0;
            return vec![Event::new(EventKind::KeyHold { code: self.mask }, now_ms)];
        }
        Vec::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
