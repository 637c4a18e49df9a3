//! Typed single-consumer event channel
//!
//! Components hold an [`EventSender`] and emit events upward; the owning
//! screen holds the one [`EventReceiver`] and drains it after each input.

use tokio::sync::mpsc;
use tracing::trace;

/// Create a connected sender/receiver pair
pub fn event_channel<E>() -> (EventSender<E>, EventReceiver<E>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// Emitting half of an event channel
#[derive(Debug)]
pub struct EventSender<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> EventSender<E> {
    /// Emit an event; returns false if the receiver is gone
    pub fn emit(&self, event: E) -> bool {
        if self.tx.send(event).is_err() {
            trace!("event receiver dropped; discarding event");
            return false;
        }
        true
    }

    /// Whether the receiver has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consuming half of an event channel
#[derive(Debug)]
pub struct EventReceiver<E> {
    rx: mpsc::UnboundedReceiver<E>,
}

impl<E> EventReceiver<E> {
    /// Wait for the next event; `None` once every sender is dropped
    pub async fn recv(&mut self) -> Option<E> {
        self.rx.recv().await
    }

    /// Take the next event if one is queued
    pub fn try_recv(&mut self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    /// Take every queued event in emission order
    pub fn drain(&mut self) -> Vec<E> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
