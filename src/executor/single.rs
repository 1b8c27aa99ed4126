//! # Single-node executor.
//!
//! [`Executor`] drives exactly one [`Reactor`] on a dedicated worker thread for its
//! whole lifetime. Construction opens it; [`Executor::close`] or drop shuts it down.
//!
//! ## Example
//! ```rust
//! use std::sync::mpsc;
//! use taskreactor::{Executor, FnReactor, Status, Trigger};
//!
//! let (tx, rx) = mpsc::channel();
//! let executor = Executor::new(FnReactor::new(move |seq, _: &Trigger| {
//!     tx.send(seq).unwrap();
//!     if seq == 2 { Status::COMPLETE } else { Status::CONTINUE }
//! }))
//! .unwrap();
//!
//! assert_eq!(rx.iter().take(3).collect::<Vec<_>>(), vec![0, 1, 2]);
//! executor.close();
//! assert!(executor.is_closed());
//! ```

use crate::config::ExecutorConfig;
use crate::error::ExecutorError;
use crate::executor::worker::Worker;
use crate::reactors::Reactor;

/// Drives one reactor until it completes or the executor is closed.
pub struct Executor {
    worker: Worker,
}

impl Executor {
    /// Spawns a worker driving `reactor` with the default [`ExecutorConfig`].
    pub fn new<R: Reactor>(reactor: R) -> Result<Self, ExecutorError> {
        Self::with_config(reactor, &ExecutorConfig::default())
    }

    /// Spawns a worker driving `reactor`.
    pub fn with_config<R: Reactor>(
        reactor: R,
        config: &ExecutorConfig,
    ) -> Result<Self, ExecutorError> {
        let worker = Worker::new();
        worker.open(reactor, config)?;
        Ok(Self { worker })
    }

    /// Stops the worker and waits until it has exited.
    ///
    /// - Idempotent; safe to call concurrently from many threads.
    /// - An in-flight commit is never interrupted: close returns after it does.
    /// - When called from inside a commit, only requests shutdown.
    pub fn close(&self) {
        self.worker.close();
    }

    /// Returns `true` once the worker has exited.
    pub fn is_closed(&self) -> bool {
        self.worker.is_closed()
    }

    /// Returns `true` if the worker was killed by a panic escaping a commit.
    pub fn is_faulted(&self) -> bool {
        self.worker.is_faulted()
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        self.close();
    }
}
