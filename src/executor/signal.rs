//! # Executor suspension state.
//!
//! [`Signal`] is the one mutex every executor shares between its worker, its
//! triggers and its closers. It guards two things:
//! - `has_update`: set by [`Trigger::signal`](crate::Trigger::signal), cleared by the worker
//! - `phase`: the executor lifecycle
//!
//! ## Phases
//! ```text
//! Idle ──start()──► Running ──request_close()──► Closing ──finish()──► Closed
//!   └───────────────request_close()──────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - The worker's check-and-wait happens under the mutex: a `notify()` between
//!   the worker's last commit and its wait is never lost.
//! - `request_close()` succeeds once; later callers observe `false`.
//! - Only the worker (via its exit guard) moves `Closing → Closed`.

use parking_lot::{Condvar, Mutex};

use crate::error::ExecutorError;

/// Executor lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Constructed, worker not spawned yet.
    Idle,
    /// Worker is committing or suspended.
    Running,
    /// Close requested; worker has not exited yet.
    Closing,
    /// Worker exited (or never started).
    Closed,
}

struct Inner {
    has_update: bool,
    phase: Phase,
    faulted: bool,
}

/// Shared flag/phase pair with its condition variables.
pub(crate) struct Signal {
    inner: Mutex<Inner>,
    /// Worker waits here for updates or close.
    update: Condvar,
    /// Closers wait here for the worker to exit.
    closed: Condvar,
}

impl Signal {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                has_update: false,
                phase: Phase::Idle,
                faulted: false,
            }),
            update: Condvar::new(),
            closed: Condvar::new(),
        }
    }

    /// Marks an update and wakes the worker.
    pub(crate) fn notify(&self) {
        let mut inner = self.inner.lock();
        inner.has_update = true;
        self.update.notify_one();
    }

    /// `Idle → Running`.
    pub(crate) fn start(&self) -> Result<(), ExecutorError> {
        let mut inner = self.inner.lock();
        match inner.phase {
            Phase::Idle => {
                inner.phase = Phase::Running;
                Ok(())
            }
            Phase::Running | Phase::Closing => Err(ExecutorError::AlreadyOpen),
            Phase::Closed => Err(ExecutorError::Closed),
        }
    }

    /// Requests shutdown. Returns `true` for the single call that performed the transition.
    ///
    /// An executor that never started goes straight to `Closed`.
    pub(crate) fn request_close(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.phase {
            Phase::Idle => {
                inner.phase = Phase::Closed;
                self.closed.notify_all();
                true
            }
            Phase::Running => {
                inner.phase = Phase::Closing;
                self.update.notify_all();
                true
            }
            Phase::Closing | Phase::Closed => false,
        }
    }

    /// Blocks until an update arrives or close is requested, then clears the flag.
    ///
    /// Returns `true` if the worker should keep committing.
    pub(crate) fn wait_for_update(&self) -> bool {
        let mut inner = self.inner.lock();
        while !inner.has_update && inner.phase == Phase::Running {
            self.update.wait(&mut inner);
        }
        inner.has_update = false;
        inner.phase == Phase::Running
    }

    /// Marks the worker as exited and releases every closer.
    pub(crate) fn finish(&self, faulted: bool) {
        let mut inner = self.inner.lock();
        inner.phase = Phase::Closed;
        inner.faulted |= faulted;
        self.closed.notify_all();
    }

    /// Blocks until the phase is `Closed`.
    pub(crate) fn wait_closed(&self) {
        let mut inner = self.inner.lock();
        while inner.phase != Phase::Closed {
            self.closed.wait(&mut inner);
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    pub(crate) fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    pub(crate) fn is_faulted(&self) -> bool {
        self.inner.lock().faulted
    }

    #[cfg(test)]
    pub(crate) fn has_update(&self) -> bool {
        self.inner.lock().has_update
    }
}
