//! IR input normalizer.
//!
//! Remote transmitters send a raw code per protocol frame while a button is
//! held, plus a dedicated repeat sentinel on some protocols. This state
//! machine turns that stream into down/up/press/hold/repeat events:
//!
//! - a new code emits `IrDown` and starts a press;
//! - frames of the same code within the key-up window emit `IrRepeat`;
//! - a press held past [`IR_HOLD_TIMEOUT_MS`] emits `IrHold` exactly once;
//! - a gap longer than [`IR_KEYUP_MS`] with no frames ends the press,
//!   emitting `IrPress` (unless the hold already fired) then `IrUp`.
//!
//! There is no "button released" frame on the wire; release is inferred
//! from silence, so the driver must call [`IrDebounce::on_idle`] every poll
//! cycle.
//!
//! Down/repeat/hold events carry the frame's input timestamp; the inferred
//! press/up pair is stamped with the current clock, which is injected so
//! tests control it.

use crate::event::types::{Event, EventKind};

/// A press held this long emits `IrHold`.
pub const IR_HOLD_TIMEOUT_MS: u64 = 900;

/// Silence this long after the last frame ends the press.
pub const IR_KEYUP_MS: u64 = 128;

/// Protocol sentinel meaning "previous code repeats". Ignored when no press
/// is in progress.
pub const IR_REPEAT_CODE: u32 = 0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum IrState {
    /// No press in progress.
    None,
    /// Press in progress, hold not yet fired.
    Down,
    /// Press in progress, hold already fired.
    HoldSent,
}

pub struct IrDebounce {
    state: IrState,
    last_code: u32,
    down_at: u64,
    last_input_at: u64,
    received_this_cycle: bool,
    clock: Box<dyn Fn() -> u64 + Send>,
}

impl std::fmt::Debug for IrDebounce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IrDebounce")
            .field("state", &self.state)
            .field("last_code", &self.last_code)
            .field("down_at", &self.down_at)
            .field("last_input_at", &self.last_input_at)
            .finish()
    }
}

impl IrDebounce {
    /// Create with an injected millisecond clock for press/up stamping.
    pub fn new(clock: impl Fn() -> u64 + Send + 'static) -> Self {
        Self {
            state: IrState::None,
            last_code: 0,
            down_at: 0,
            last_input_at: 0,
            received_this_cycle: false,
            clock: Box::new(clock),
        }
    }

    /// Create with the toolkit clock.
    pub fn with_system_clock() -> Self {
        Self::new(crate::event::types::jiffies)
    }

    /// Whether a press is currently in progress.
    pub fn is_down(&self) -> bool {
        self.state != IrState::None
    }

    /// Feed one decoded frame. `input_ms` is the frame's receive time.
    pub fn on_code(&mut self, code: u32, input_ms: u64) -> Vec<Event> {
        let mut out = Vec::new();
        self.received_this_cycle = true;

        let mut code = code;
        let mut is_repeat = false;
        if code == IR_REPEAT_CODE {
            if self.state == IrState::None {
                // A repeat with nothing to repeat; stale frame from before
                // our time. Drop it.
                return out;
            }
            code = self.last_code;
            is_repeat = true;
        }

        // A different code while a press is in progress ends the old press
        // first; the transmitter cannot signal the release any other way.
        if self.state != IrState::None && code != self.last_code {
            self.complete(&mut out);
        }

        match self.state {
            IrState::None => {
                self.state = IrState::Down;
                self.down_at = input_ms;
                out.push(Event::new(EventKind::IrDown { code }, input_ms));
            }
            IrState::Down | IrState::HoldSent => {
                if !is_repeat && input_ms >= self.last_input_at + IR_KEYUP_MS {
                    // Same button pressed again after a gap the decoder
                    // missed: two distinct presses.
                    self.complete(&mut out);
                    self.state = IrState::Down;
                    self.down_at = input_ms;
                    out.push(Event::new(EventKind::IrDown { code }, input_ms));
                } else {
                    out.push(Event::new(EventKind::IrRepeat { code }, input_ms));
                    if self.state == IrState::Down
                        && input_ms >= self.down_at + IR_HOLD_TIMEOUT_MS
                    {
                        self.state = IrState::HoldSent;
                        out.push(Event::new(EventKind::IrHold { code }, input_ms));
                    }
                }
            }
        }

        self.last_code = code;
        self.last_input_at = input_ms;
        out
    }

    /// Call once per poll cycle when no frame arrived. Ends the press after
    /// [`IR_KEYUP_MS`] of silence.
    pub fn on_idle(&mut self, now_ms: u64) -> Vec<Event> {
        let mut out = Vec::new();
        if !self.received_this_cycle
            && self.state != IrState::None
            && now_ms >= self.last_input_at + IR_KEYUP_MS
        {
            self.complete(&mut out);
        }
        self.received_this_cycle = false;
        out
    }

    fn complete(&mut self, out: &mut Vec<Event>) {
        if self.state == IrState::None {
            return;
        }
        let ticks = (self.clock)();
        if self.state != IrState::HoldSent {
            out.push(Event::new(EventKind::IrPress { code: self.last_code }, ticks));
        }
        out.push(Event::new(EventKind::IrUp { code: self.last_code }, ticks));
        self.state = IrState::None;
    }
}

// ===========================================================================
// Tests
// ===========================================================================
