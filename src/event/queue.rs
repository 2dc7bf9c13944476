//! The event queue.
//!
//! Input adapters, timers, and application code all post into one unbounded
//! channel; the framework drains it on its thread. [`EventSender`] is the
//! cloneable, thread-safe posting half handed to timer tasks and input
//! drivers.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::types::Event;

/// Cloneable posting handle. Posting never blocks; if the queue has shut
/// down the event is dropped.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: UnboundedSender<Event>,
}

impl EventSender {
    pub fn post(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

/// The receiving end, owned by the framework.
#[derive(Debug)]
pub struct EventQueue {
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A new posting handle.
    pub fn sender(&self) -> EventSender {
        EventSender { tx: self.tx.clone() }
    }

    /// Post from the owning side.
    pub fn post(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Take the next queued event without waiting.
    pub fn try_pop(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next event. Only returns `None` if every sender is gone,
    /// which cannot happen while the queue holds its own.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::types::EventKind;

    #[test]
    fn post_and_drain_in_order() {
        let mut q = EventQueue::new();
        q.post(Event::new(EventKind::Scroll { rel: 1 }, 10));
        q.post(Event::new(EventKind::Scroll { rel: 2 }, 20));

        assert_eq!(q.try_pop().map(|e| e.ticks), Some(10));
        assert_eq!(q.try_pop().map(|e| e.ticks), Some(20));
        assert!(q.try_pop().is_none());
    }

    #[test]
    fn senders_are_cloneable_across_threads() {
        let mut q = EventQueue::new();
        let tx = q.sender();
        let handle = std::thread::spawn(move || {
            tx.post(Event::new(EventKind::Quit, 0));
        });
        handle.join().unwrap();
        assert!(matches!(q.try_pop(), Some(Event { kind: EventKind::Quit, .. })));
    }

    #[tokio::test]
    async fn async_next_delivers() {
        let mut q = EventQueue::new();
        let tx = q.sender();
        tx.post(Event::new(EventKind::Show, 5));
        let e = q.next().await;
        assert_eq!(e.map(|e| e.ticks), Some(5));
    }
}
