//! Change notification fan-out
//!
//! Built on `tokio::sync::broadcast`, whose `send` and `try_recv` need no
//! runtime, so the synchronous core can publish and hosts can poll.

use std::fmt;
use tokio::sync::broadcast::{self, error::TryRecvError, Receiver, Sender};

/// Events a listener can fall behind by before the oldest are dropped
pub const EVENT_BUFFER_SIZE: usize = 1024;

/// Publisher for one notification type
///
/// Every subscriber sees every event sent after it subscribed. Dropped
/// receivers simply stop counting as listeners.
pub struct Broadcaster<E> {
    sender: Sender<E>,
}

impl<E: Clone> Broadcaster<E> {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        Broadcaster { sender }
    }

    /// Register a new listener
    pub fn subscribe(&self) -> Receiver<E> {
        self.sender.subscribe()
    }

    /// Send an event to every live listener
    pub fn broadcast(&self, event: &E) {
        // No listeners is not an error
        let _ = self.sender.send(event.clone());
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E: Clone> Default for Broadcaster<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones start with no listeners
impl<E: Clone> Clone for Broadcaster<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Broadcaster<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("listeners", &self.sender.receiver_count())
            .finish()
    }
}

/// Take every event waiting on `rx` without blocking
pub fn drain<E: Clone>(rx: &mut Receiver<E>) -> Vec<E> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!("Dropped {} stale events", skipped);
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    events
}
