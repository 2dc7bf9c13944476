//! Events, the queue, and the input debounce machines.
//!
//! - [`types`]: event kinds, listener masks, handler results, the clock.
//! - [`queue`]: the unbounded channel all producers post into.
//! - [`key`]: hardware key press/hold debounce.
//! - [`ir`]: IR frame stream normalizer.

pub mod ir;
pub mod key;
pub mod queue;
pub mod types;

pub use self::ir::{IrDebounce, IR_HOLD_TIMEOUT_MS, IR_KEYUP_MS, IR_REPEAT_CODE};
pub use self::key::{KeyDebounce, KEY_HOLD_TIMEOUT_MS};
pub use self::queue::{EventQueue, EventSender};
pub use self::types::{jiffies, Event, EventKind, EventResult};
