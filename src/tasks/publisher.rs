//! # Task state publisher.
//!
//! [`StatePublisher`] is a thin wrapper around [`tokio::sync::broadcast`] carrying a
//! task's [`StateEntry`] stream. It is the only way to observe a task.
//!
//! ## Rules
//! - **Live only**: a receiver sees entries published *after* it subscribed; there
//!   is no replay of earlier transitions.
//! - **Exactly once, in order**: each receiver gets every later entry once, in
//!   publication order.
//! - **Runtime-agnostic**: receivers work from plain threads
//!   (`blocking_recv`/`try_recv`) and from any async context (`recv().await`).
//! - **Latest state on request**: [`StatePublisher::subscribe_with_latest`] pairs a
//!   receiver with the last state published before it, so a caller can tell an
//!   already finished task from one that has yet to publish.
//! - **No lag in practice**: a task publishes at most four entries, well below the
//!   channel capacity.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::tasks::{State, StateEntry};

/// Channel capacity per task; bounds the number of unread entries per receiver.
const STATE_CHANNEL_CAPACITY: usize = 16;

/// Multi-subscriber stream of a task's state transitions.
#[derive(Clone, Debug)]
pub struct StatePublisher {
    tx: broadcast::Sender<StateEntry>,
    latest: Arc<Mutex<Option<State>>>,
}

impl StatePublisher {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        Self {
            tx,
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// Publishes an entry to all current receivers; dropped if there are none.
    pub(crate) fn publish(&self, entry: StateEntry) {
        let mut latest = self.latest.lock();
        *latest = Some(entry.state);
        let _ = self.tx.send(entry);
    }

    /// Creates a receiver that will observe subsequent entries.
    pub fn subscribe(&self) -> broadcast::Receiver<StateEntry> {
        self.tx.subscribe()
    }

    /// Creates a receiver together with the last state published before it.
    ///
    /// `None` means nothing was published yet. Every later entry reaches the
    /// receiver; none is both returned here and received.
    pub fn subscribe_with_latest(&self) -> (Option<State>, broadcast::Receiver<StateEntry>) {
        let latest = self.latest.lock();
        (*latest, self.tx.subscribe())
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;

    #[test]
    fn test_subscribe_with_latest_splits_history_from_live() {
        let publisher = StatePublisher::new();
        let (latest, _rx) = publisher.subscribe_with_latest();
        assert_eq!(latest, None);

        publisher.publish(StateEntry::new(State::Initializing));
        publisher.publish(StateEntry::new(State::Canceled));

        let (latest, mut rx) = publisher.subscribe_with_latest();
        assert_eq!(latest, Some(State::Canceled));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}
