//! Event types, listener masks, and handler results.

use std::ops::{BitOr, BitOrAssign};

use crate::timer::TimerId;

/// Milliseconds since the toolkit first asked for the time.
///
/// All event timestamps and debounce deadlines use this clock.
pub fn jiffies() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_millis() as u64
}

// ---------------------------------------------------------------------------
// Key codes
// ---------------------------------------------------------------------------

/// Hardware key codes, one bit each so chords accumulate in a mask.
pub mod key {
    pub const NONE: u32 = 0;
    pub const GO: u32 = 1 << 0;
    pub const BACK: u32 = 1 << 1;
    pub const UP: u32 = 1 << 2;
    pub const DOWN: u32 = 1 << 3;
    pub const LEFT: u32 = 1 << 4;
    pub const RIGHT: u32 = 1 << 5;
    pub const HOME: u32 = 1 << 6;
    pub const PLAY: u32 = 1 << 7;
    pub const PAUSE: u32 = 1 << 8;
    pub const ADD: u32 = 1 << 9;
    pub const REW: u32 = 1 << 10;
    pub const FWD: u32 = 1 << 11;
    pub const VOLUME_UP: u32 = 1 << 12;
    pub const VOLUME_DOWN: u32 = 1 << 13;
    pub const PAGE_UP: u32 = 1 << 14;
    pub const PAGE_DOWN: u32 = 1 << 15;
    pub const MUTE: u32 = 1 << 16;
    pub const POWER: u32 = 1 << 17;
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Relative scroll (wheel detents or encoder steps).
    Scroll { rel: i32 },
    KeyDown { code: u32 },
    KeyUp { code: u32 },
    /// Short press: the chord went down and up before the hold timeout.
    KeyPress { code: u32 },
    /// The chord stayed down past the hold timeout. Emitted once per press.
    KeyHold { code: u32 },
    CharPress { ch: char },
    MouseDown { x: i32, y: i32 },
    MouseUp { x: i32, y: i32 },
    MousePress { x: i32, y: i32 },
    MouseHold { x: i32, y: i32 },
    MouseMove { x: i32, y: i32 },
    MouseDrag { x: i32, y: i32 },
    Motion { x: i32, y: i32, z: i32 },
    Switch { code: u32, value: i32 },
    /// A new remote code was accepted by the IR normalizer.
    IrDown { code: u32 },
    IrUp { code: u32 },
    /// The button was released before the hold timeout.
    IrPress { code: u32 },
    /// The button stayed down past the hold timeout. Emitted once per press.
    IrHold { code: u32 },
    /// The transmitter repeated a held code.
    IrRepeat { code: u32 },
    WindowPush,
    WindowPop,
    WindowActive,
    WindowInactive,
    Show,
    Hide,
    Resize { w: i32, h: i32 },
    TimerFired { timer: TimerId },
    Quit,
}

impl EventKind {
    /// The listener-mask bit for this kind.
    pub fn mask_bit(&self) -> u64 {
        match self {
            EventKind::Scroll { .. } => mask::SCROLL,
            EventKind::KeyDown { .. } => mask::KEY_DOWN,
            EventKind::KeyUp { .. } => mask::KEY_UP,
            EventKind::KeyPress { .. } => mask::KEY_PRESS,
            EventKind::KeyHold { .. } => mask::KEY_HOLD,
            EventKind::CharPress { .. } => mask::CHAR_PRESS,
            EventKind::MouseDown { .. } => mask::MOUSE_DOWN,
            EventKind::MouseUp { .. } => mask::MOUSE_UP,
            EventKind::MousePress { .. } => mask::MOUSE_PRESS,
            EventKind::MouseHold { .. } => mask::MOUSE_HOLD,
            EventKind::MouseMove { .. } => mask::MOUSE_MOVE,
            EventKind::MouseDrag { .. } => mask::MOUSE_DRAG,
            EventKind::Motion { .. } => mask::MOTION,
            EventKind::Switch { .. } => mask::SWITCH,
            EventKind::IrDown { .. } => mask::IR_DOWN,
            EventKind::IrUp { .. } => mask::IR_UP,
            EventKind::IrPress { .. } => mask::IR_PRESS,
            EventKind::IrHold { .. } => mask::IR_HOLD,
            EventKind::IrRepeat { .. } => mask::IR_REPEAT,
            EventKind::WindowPush => mask::WINDOW_PUSH,
            EventKind::WindowPop => mask::WINDOW_POP,
            EventKind::WindowActive => mask::WINDOW_ACTIVE,
            EventKind::WindowInactive => mask::WINDOW_INACTIVE,
            EventKind::Show => mask::SHOW,
            EventKind::Hide => mask::HIDE,
            EventKind::Resize { .. } => mask::RESIZE,
            EventKind::TimerFired { .. } => mask::TIMER,
            EventKind::Quit => mask::QUIT,
        }
    }

    /// Key and scroll classes go to the top window's focus widget only.
    pub fn is_focus_routed(&self) -> bool {
        matches!(
            self,
            EventKind::Scroll { .. }
                | EventKind::KeyDown { .. }
                | EventKind::KeyUp { .. }
                | EventKind::KeyPress { .. }
                | EventKind::KeyHold { .. }
        )
    }

    /// Window-stack transitions address the window itself and are never
    /// forwarded into its subtree.
    pub fn is_window_transition(&self) -> bool {
        matches!(
            self,
            EventKind::WindowPush
                | EventKind::WindowPop
                | EventKind::WindowActive
                | EventKind::WindowInactive
        )
    }

    /// Visibility notifications broadcast to the window's children only,
    /// skipping global widgets.
    pub fn is_visibility(&self) -> bool {
        matches!(self, EventKind::Show | EventKind::Hide)
    }
}

/// Listener-mask bits, one per event kind plus class unions.
pub mod mask {
    pub const SCROLL: u64 = 1 << 0;
    pub const KEY_DOWN: u64 = 1 << 1;
    pub const KEY_UP: u64 = 1 << 2;
    pub const KEY_PRESS: u64 = 1 << 3;
    pub const KEY_HOLD: u64 = 1 << 4;
    pub const CHAR_PRESS: u64 = 1 << 5;
    pub const MOUSE_DOWN: u64 = 1 << 6;
    pub const MOUSE_UP: u64 = 1 << 7;
    pub const MOUSE_PRESS: u64 = 1 << 8;
    pub const MOUSE_HOLD: u64 = 1 << 9;
    pub const MOUSE_MOVE: u64 = 1 << 10;
    pub const MOUSE_DRAG: u64 = 1 << 11;
    pub const MOTION: u64 = 1 << 12;
    pub const SWITCH: u64 = 1 << 13;
    pub const IR_DOWN: u64 = 1 << 14;
    pub const IR_UP: u64 = 1 << 15;
    pub const IR_PRESS: u64 = 1 << 16;
    pub const IR_HOLD: u64 = 1 << 17;
    pub const IR_REPEAT: u64 = 1 << 18;
    pub const WINDOW_PUSH: u64 = 1 << 19;
    pub const WINDOW_POP: u64 = 1 << 20;
    pub const WINDOW_ACTIVE: u64 = 1 << 21;
    pub const WINDOW_INACTIVE: u64 = 1 << 22;
    pub const SHOW: u64 = 1 << 23;
    pub const HIDE: u64 = 1 << 24;
    pub const RESIZE: u64 = 1 << 25;
    pub const TIMER: u64 = 1 << 26;
    pub const QUIT: u64 = 1 << 27;

    pub const KEY_ALL: u64 = KEY_DOWN | KEY_UP | KEY_PRESS | KEY_HOLD;
    pub const MOUSE_ALL: u64 =
        MOUSE_DOWN | MOUSE_UP | MOUSE_PRESS | MOUSE_HOLD | MOUSE_MOVE | MOUSE_DRAG;
    pub const IR_ALL: u64 = IR_DOWN | IR_UP | IR_PRESS | IR_HOLD | IR_REPEAT;
    pub const WINDOW_ALL: u64 = WINDOW_PUSH | WINDOW_POP | WINDOW_ACTIVE | WINDOW_INACTIVE;
    pub const ALL_INPUT: u64 = SCROLL | KEY_ALL | CHAR_PRESS | MOUSE_ALL | MOTION | SWITCH | IR_ALL;
    pub const ALL: u64 = u64::MAX;
}

/// An event plus the millisecond tick it is stamped with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub ticks: u64,
}

impl Event {
    pub fn new(kind: EventKind, ticks: u64) -> Self {
        Self { kind, ticks }
    }

    /// Stamp with the current clock.
    pub fn now(kind: EventKind) -> Self {
        Self { kind, ticks: jiffies() }
    }
}

// ---------------------------------------------------------------------------
// EventResult
// ---------------------------------------------------------------------------

/// Outcome of delivering an event, combinable across handlers with `|`.
///
/// `consumed` implies `handled` and stops further propagation stages;
/// plain `handled` lets siblings and later stages still see the event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EventResult(u32);

impl EventResult {
    const HANDLED_BIT: u32 = 1 << 0;
    const CONSUME_BIT: u32 = 1 << 1;
    const QUIT_BIT: u32 = 1 << 2;

    pub const UNUSED: EventResult = EventResult(0);

    pub fn unused() -> Self {
        Self(0)
    }

    pub fn handled() -> Self {
        Self(Self::HANDLED_BIT)
    }

    pub fn consumed() -> Self {
        Self(Self::HANDLED_BIT | Self::CONSUME_BIT)
    }

    /// Handled, and the main loop should exit.
    pub fn quit() -> Self {
        Self(Self::HANDLED_BIT | Self::QUIT_BIT)
    }

    pub fn is_handled(self) -> bool {
        self.0 & Self::HANDLED_BIT != 0
    }

    pub fn is_consumed(self) -> bool {
        self.0 & Self::CONSUME_BIT != 0
    }

    pub fn is_quit(self) -> bool {
        self.0 & Self::QUIT_BIT != 0
    }
}

impl BitOr for EventResult {
    type Output = EventResult;

    fn bitor(self, rhs: EventResult) -> EventResult {
        EventResult(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventResult {
    fn bitor_assign(&mut self, rhs: EventResult) {
        self.0 |= rhs.0;
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_combination() {
        let mut r = EventResult::unused();
        assert!(!r.is_handled());
        r |= EventResult::handled();
        assert!(r.is_handled());
        assert!(!r.is_consumed());
        r |= EventResult::consumed();
        assert!(r.is_consumed());
    }

    #[test]
    fn consumed_implies_handled() {
        assert!(EventResult::consumed().is_handled());
        assert!(EventResult::quit().is_handled());
        assert!(!EventResult::quit().is_consumed());
    }

    #[test]
    fn classes() {
        assert!(EventKind::Scroll { rel: 1 }.is_focus_routed());
        assert!(EventKind::KeyHold { code: key::GO }.is_focus_routed());
        assert!(!EventKind::IrDown { code: 1 }.is_focus_routed());
        assert!(EventKind::WindowPop.is_window_transition());
        assert!(EventKind::Hide.is_visibility());
        assert!(!EventKind::Show.is_window_transition());
    }

    #[test]
    fn mask_bits_are_distinct() {
        let kinds = [
            EventKind::Scroll { rel: 0 },
            EventKind::KeyDown { code: 0 },
            EventKind::IrRepeat { code: 0 },
            EventKind::Show,
            EventKind::Quit,
        ];
        let mut seen = 0u64;
        for k in kinds {
            let bit = k.mask_bit();
            assert_eq!(seen & bit, 0);
            seen |= bit;
        }
    }

    #[test]
    fn class_masks_cover_members() {
        assert_ne!(mask::KEY_ALL & EventKind::KeyPress { code: 0 }.mask_bit(), 0);
        assert_ne!(mask::IR_ALL & EventKind::IrHold { code: 0 }.mask_bit(), 0);
        assert_eq!(mask::IR_ALL & EventKind::KeyDown { code: 0 }.mask_bit(), 0);
    }

    #[test]
    fn jiffies_is_monotonic() {
        let a = jiffies();
        let b = jiffies();
        assert!(b >= a);
    }
}
