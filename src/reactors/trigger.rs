//! # Trigger: cross-thread wake-up handle.
//!
//! Every commit receives the executor's [`Trigger`]. A reactor that cannot make
//! progress now registers interest by handing the trigger (or a [`Waker`] built
//! from it) to whatever will complete later: a callback, another thread, a future.
//! Calling [`Trigger::signal`] marks the executor as having an update and wakes its
//! worker if it is suspended.
//!
//! ## Rules
//! - `signal()` is safe from any thread, at any time, concurrently.
//! - The trigger holds a **weak** reference to the executor: once the executor and
//!   its worker are gone, `signal()` is a no-op.
//! - Reactors must use the trigger passed to the *current* commit; a trigger kept
//!   from an earlier commit may belong to an executor that no longer drives them.

use std::fmt;
use std::sync::{Arc, Weak};
use std::task::Waker;

use futures::task::{waker, ArcWake};

use crate::executor::signal::Signal;

/// Signalling handle passed to [`Reactor::commit`](crate::Reactor::commit).
#[derive(Clone, Default)]
pub struct Trigger {
    signal: Weak<Signal>,
}

impl Trigger {
    pub(crate) fn new(signal: &Arc<Signal>) -> Self {
        Self {
            signal: Arc::downgrade(signal),
        }
    }

    /// Creates a trigger bound to no executor; `signal()` does nothing.
    ///
    /// Useful for committing reactors by hand (tests, adapters).
    pub fn detached() -> Self {
        Self::default()
    }

    /// Requests another commit from the owning executor.
    pub fn signal(&self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.notify();
        }
    }

    /// Returns `true` if the owning executor still exists.
    pub fn is_attached(&self) -> bool {
        self.signal.strong_count() > 0
    }

    /// Adapts this trigger into a [`Waker`] for polling futures inside a commit.
    pub fn waker(&self) -> Waker {
        waker(Arc::new(TriggerWaker(self.clone())))
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("attached", &self.is_attached())
            .finish()
    }
}

struct TriggerWaker(Trigger);

impl ArcWake for TriggerWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.0.signal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_sets_update_flag() {
        let signal = Arc::new(Signal::new());
        let trigger = Trigger::new(&signal);
        assert!(!signal.has_update());

        trigger.signal();
        assert!(signal.has_update());
    }

    #[test]
    fn test_waker_signals_trigger() {
        let signal = Arc::new(Signal::new());
        let trigger = Trigger::new(&signal);

        trigger.waker().wake();
        assert!(signal.has_update());
    }

    #[test]
    fn test_signal_after_executor_gone_is_noop() {
        let signal = Arc::new(Signal::new());
        let trigger = Trigger::new(&signal);
        drop(signal);

        assert!(!trigger.is_attached());
        trigger.signal();
        trigger.waker().wake_by_ref();
        Trigger::detached().signal();
    }
}
