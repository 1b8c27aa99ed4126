//! # Worker: the commit loop and its thread handle.
//!
//! Both executors drive exactly one reactor on one dedicated thread. The loop is
//! shared; they differ only in when [`Worker::open`] is called.
//!
//! ## Loop
//! ```text
//! sequence = 0
//! while phase == Running {
//!   ├─► status = reactor.commit(sequence, trigger); sequence += 1
//!   ├─► COMPLETE            → break
//!   ├─► CONTINUE            → commit again
//!   └─► neither             → wait_for_update() (false = closing → break)
//! }
//! request_close()  → release reactor  → finish() (phase = Closed)
//! ```
//!
//! ## Close discipline
//! `close()` requests shutdown, joins the worker thread, and only then returns: the
//! reactor has been dropped by the time any closer returns. A close issued from the
//! worker thread (inside a commit) only requests shutdown.

use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;
use tracing::{debug, error, trace};

use crate::config::ExecutorConfig;
use crate::error::ExecutorError;
use crate::executor::signal::{Phase, Signal};
use crate::reactors::{Reactor, Trigger};

/// Owns the signal and the join handle of one executor worker.
pub(crate) struct Worker {
    signal: Arc<Signal>,
    join: Mutex<Option<JoinHandle<()>>>,
    /// Set by the worker thread itself before its first commit.
    thread: Arc<OnceLock<ThreadId>>,
}

impl Worker {
    pub(crate) fn new() -> Self {
        Self {
            signal: Arc::new(Signal::new()),
            join: Mutex::new(None),
            thread: Arc::new(OnceLock::new()),
        }
    }

    pub(crate) fn signal(&self) -> &Arc<Signal> {
        &self.signal
    }

    /// Starts the worker thread driving `reactor`.
    pub(crate) fn open<R: Reactor>(
        &self,
        reactor: R,
        config: &ExecutorConfig,
    ) -> Result<(), ExecutorError> {
        let mut join = self.join.lock();
        self.signal.start()?;

        let mut builder = thread::Builder::new().name(config.name.to_string());
        if let Some(size) = config.stack_size() {
            builder = builder.stack_size(size);
        }
        let signal = Arc::clone(&self.signal);
        let thread = Arc::clone(&self.thread);
        let spawned = builder.spawn(move || {
            let _ = thread.set(thread::current().id());
            run(reactor, signal)
        });
        match spawned {
            Ok(handle) => {
                *join = Some(handle);
                debug!(worker = %config.name, "executor opened");
                Ok(())
            }
            Err(source) => {
                self.signal.finish(false);
                error!(worker = %config.name, error = %source, "executor worker spawn failed");
                Err(ExecutorError::Spawn { source })
            }
        }
    }

    /// Requests shutdown and waits for the worker to exit.
    pub(crate) fn close(&self) {
        if self.signal.request_close() {
            debug!("executor close requested");
        }
        if self.thread.get() == Some(&thread::current().id()) {
            return;
        }

        let handle = self.join.lock().take();
        match handle {
            Some(handle) => {
                if let Err(panic) = handle.join() {
                    let info = if let Some(msg) = panic.downcast_ref::<&'static str>() {
                        (*msg).to_string()
                    } else if let Some(msg) = panic.downcast_ref::<String>() {
                        msg.clone()
                    } else {
                        "unknown panic".to_string()
                    };
                    error!(panic = %info, "executor worker faulted");
                }
            }
            None => self.signal.wait_closed(),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.signal.phase() == Phase::Closed
    }

    pub(crate) fn is_faulted(&self) -> bool {
        self.signal.is_faulted()
    }
}

/// Marks the executor closed when the worker frame unwinds or returns.
struct ExitGuard {
    signal: Arc<Signal>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.signal.finish(thread::panicking());
    }
}

fn run<R: Reactor>(reactor: R, signal: Arc<Signal>) {
    // Declared before the reactor: the reactor is dropped first, then the
    // executor is marked closed.
    let _exit = ExitGuard {
        signal: Arc::clone(&signal),
    };
    let mut reactor = reactor;
    let trigger = Trigger::new(&signal);

    let mut sequence: u64 = 0;
    while signal.is_running() {
        let status = reactor.commit(sequence, &trigger);
        trace!(sequence, ?status, "committed");
        sequence += 1;
        if status.is_complete() {
            debug!(commits = sequence, "reactor complete");
            break;
        }
        if !status.has_continuation() && !signal.wait_for_update() {
            break;
        }
    }
    signal.request_close();
    debug!(commits = sequence, "executor worker exiting");
}
