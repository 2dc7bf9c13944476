//! Timers.
//!
//! A timer posts a `TimerFired` event into the queue; the callback runs on
//! the framework thread when that event is consumed, never on the timer
//! task. Firings coalesce: while a fired event sits unconsumed in the
//! queue, further expiries only bump a busy counter instead of posting
//! again, so a stalled frame produces one callback, not a burst.
//!
//! Periodic timers rearm on schedule; one-shot timers unregister at
//! consumption time, before their callback runs, so the callback can
//! safely reschedule under the same service.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};
use tokio::task::JoinHandle;

use crate::error::UiError;
use crate::event::queue::EventSender;
use crate::event::types::{Event, EventKind};
use crate::framework::Framework;

new_key_type! {
    /// Generational handle to a scheduled timer.
    pub struct TimerId;
}

/// Runs on the framework thread at consumption. Errors are logged and the
/// timer keeps running.
pub type TimerCallback = Box<dyn FnMut(&mut Framework) -> Result<(), UiError> + Send>;

struct TimerEntry {
    interval: Duration,
    once: bool,
    /// Expiries since the last consumption. Nonzero means a fired event is
    /// already queued.
    busy: Arc<AtomicU32>,
    /// Cleared by cancel; the spawned task checks it before posting.
    live: Arc<AtomicBool>,
    /// Taken out for the duration of the callback so the callback can
    /// borrow the framework (and with it, this service) mutably.
    callback: Option<TimerCallback>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for TimerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEntry")
            .field("interval", &self.interval)
            .field("once", &self.once)
            .field("busy", &self.busy.load(Ordering::Relaxed))
            .finish()
    }
}

impl Drop for TimerEntry {
    fn drop(&mut self) {
        self.live.store(false, Ordering::Release);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// TimerService
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct TimerService {
    entries: SlotMap<TimerId, TimerEntry>,
    sender: EventSender,
}

impl TimerService {
    pub fn new(sender: EventSender) -> Self {
        Self { entries: SlotMap::with_key(), sender }
    }

    /// Schedule a timer. When a tokio runtime is present the expiry task is
    /// spawned on it; otherwise the caller drives expiry via [`fire`]
    /// (headless and test setups).
    ///
    /// [`fire`]: Self::fire
    pub fn schedule(
        &mut self,
        interval: Duration,
        once: bool,
        callback: TimerCallback,
    ) -> TimerId {
        let busy = Arc::new(AtomicU32::new(0));
        let live = Arc::new(AtomicBool::new(true));

        let id = self.entries.insert(TimerEntry {
            interval,
            once,
            busy: busy.clone(),
            live: live.clone(),
            callback: Some(callback),
            task: None,
        });

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let sender = self.sender.clone();
            // interval() panics on zero.
            let period = interval.max(Duration::from_millis(1));
            let task = handle.spawn(async move {
                if once {
                    tokio::time::sleep(period).await;
                    if live.load(Ordering::Acquire) && busy.fetch_add(1, Ordering::AcqRel) == 0 {
                        sender.post(Event::now(EventKind::TimerFired { timer: id }));
                    }
                } else {
                    let mut tick = tokio::time::interval(period);
                    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                    tick.tick().await; // completes immediately
                    loop {
                        tick.tick().await;
                        if !live.load(Ordering::Acquire) {
                            break;
                        }
                        if busy.fetch_add(1, Ordering::AcqRel) == 0 {
                            sender.post(Event::now(EventKind::TimerFired { timer: id }));
                        }
                    }
                }
            });
            if let Some(entry) = self.entries.get_mut(id) {
                entry.task = Some(task);
            }
        }

        id
    }

    /// Cancel a timer. A fired event already in the queue becomes a no-op
    /// at consumption. Returns false for an unknown id.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drive one expiry by hand. Returns true if a fired event was posted,
    /// false if the timer is unknown or a firing is already pending.
    pub fn fire(&self, id: TimerId) -> bool {
        let Some(entry) = self.entries.get(id) else { return false };
        if entry.busy.fetch_add(1, Ordering::AcqRel) == 0 {
            self.sender
                .post(Event::now(EventKind::TimerFired { timer: id }));
            true
        } else {
            false
        }
    }

    /// Begin consuming a fired event: reset the busy counter, unregister
    /// one-shot timers, and hand out the callback. Returns `None` for a
    /// timer cancelled after its event was posted.
    pub(crate) fn take_for_dispatch(&mut self, id: TimerId) -> Option<TimerCallback> {
        let entry = self.entries.get_mut(id)?;
        entry.busy.store(0, Ordering::Release);
        if entry.once {
            self.entries.remove(id).and_then(|mut e| e.callback.take())
        } else {
            entry.callback.take()
        }
    }

    /// Put a periodic timer's callback back after it ran. A callback that
    /// cancelled its own timer leaves nothing to restore.
    pub(crate) fn restore_callback(&mut self, id: TimerId, callback: TimerCallback) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.callback = Some(callback);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
