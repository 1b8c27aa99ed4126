//! # Multi-node (dynamic) executor.
//!
//! [`MultiExecutor`] drives a runtime-growable set of reactors merged into one
//! [`QueueReactor`]. Construction and [`open`](MultiExecutor::open) are separate, so
//! reactors can be queued before the worker exists.
//!
//! ## Architecture
//! ```text
//! add(r) from any thread ──► QueueWriter ──► SegQueue ──┐
//!                                (signal trigger)       ▼
//!                                         ┌──────────────────────────┐
//!  open() ──► worker thread ──commit────► │ QueueReactor (composite) │
//!                                         │   child 1, child 2, ...  │
//!                                         └──────────────────────────┘
//! ```
//!
//! ## Rules
//! - `add()` always queues, whatever the phase; reactors added after close are
//!   never committed and are dropped with the executor.
//! - A reactor added while the worker is suspended is committed on the very next
//!   sequence.
//! - The composite never completes on its own; the worker runs until `close()`.

use std::fmt;

use parking_lot::Mutex;

use crate::config::ExecutorConfig;
use crate::error::ExecutorError;
use crate::executor::worker::Worker;
use crate::reactors::{QueueReactor, QueueWriter, Reactor};

/// Drives a dynamic set of reactors on one worker thread.
pub struct MultiExecutor {
    worker: Worker,
    writer: QueueWriter,
    composite: Mutex<Option<QueueReactor>>,
    config: ExecutorConfig,
}

impl MultiExecutor {
    /// Creates an executor that is not opened yet, with the default config.
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    /// Creates a not yet opened executor.
    pub fn with_config(config: ExecutorConfig) -> Self {
        let composite = QueueReactor::new();
        Self {
            worker: Worker::new(),
            writer: composite.writer(),
            composite: Mutex::new(Some(composite)),
            config,
        }
    }

    /// Queues `reactor` for execution.
    ///
    /// Safe from any thread, including the worker itself.
    pub fn add<R: Reactor>(&self, reactor: R) {
        self.writer.push(reactor);
    }

    /// Returns a cloneable handle that can [`push`](QueueWriter::push) reactors
    /// without borrowing the executor.
    pub fn writer(&self) -> QueueWriter {
        self.writer.clone()
    }

    /// Spawns the worker.
    ///
    /// # Errors
    /// - [`ExecutorError::AlreadyOpen`] if the worker was already started.
    /// - [`ExecutorError::Closed`] if the executor was closed.
    /// - [`ExecutorError::Spawn`] if the thread could not be created; the executor is
    ///   closed afterwards.
    pub fn open(&self) -> Result<(), ExecutorError> {
        let composite = self.composite.lock().take();
        match composite {
            Some(composite) => self.worker.open(composite, &self.config),
            None if self.worker.is_closed() => Err(ExecutorError::Closed),
            None => Err(ExecutorError::AlreadyOpen),
        }
    }

    /// Stops the worker and waits until it has exited.
    ///
    /// Same guarantees as [`Executor::close`](crate::Executor::close). Closing an
    /// executor that was never opened just marks it closed.
    pub fn close(&self) {
        self.worker.close();
    }

    /// Returns `true` once the executor is closed.
    pub fn is_closed(&self) -> bool {
        self.worker.is_closed()
    }

    /// Returns `true` if the worker was killed by a panic escaping a commit.
    pub fn is_faulted(&self) -> bool {
        self.worker.is_faulted()
    }
}

impl Default for MultiExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MultiExecutor {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for MultiExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiExecutor")
            .field("name", &self.config.name)
            .field("phase", &self.worker.signal().phase())
            .field("pending", &self.writer.pending())
            .finish()
    }
}
