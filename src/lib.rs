//! # taskreactor
//!
//! **Taskreactor** is an in-process reactive task execution engine.
//!
//! It drives *reactors* (units of incremental computation advanced one commit at a
//! time) on dedicated worker threads that sleep until woken, and models application
//! work as cancellable, observable *tasks* adapted into reactors.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    FnTask    │   │    FnTask    │   │ user Reactor │
//!     │  (order #1)  │   │  (order #2)  │   │              │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ reactor()        ▼ reactor()        │
//!     ┌──────────────┐   ┌──────────────┐          │
//!     │ TaskReactor  │   │ TaskReactor  │          │
//!     └──────┬───────┘   └──────┬───────┘          │
//!            ▼ add()            ▼ add()            ▼ add()
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  MultiExecutor                                                    │
//! │  - QueueWriter ──► SegQueue (any thread)                          │
//! │  - QueueReactor (composite: drains queue, commits every child)    │
//! │  - Signal (has_update + phase under one mutex, condvars)          │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                     ┌─────────────────────┐
//!                     │   worker thread     │◄──── Trigger::signal()
//!                     │   commit loop       │      (wakers, callbacks,
//!                     └─────────────────────┘       other threads)
//!
//!   Task transitions ──► StatePublisher (broadcast) ──► subscribers
//! ```
//!
//! ### Worker loop
//! ```text
//! sequence = 0
//! loop while Running {
//!   ├─► status = reactor.commit(sequence, &trigger); sequence += 1
//!   │       ├─ COMPLETE → exit
//!   │       ├─ CONTINUE → commit again immediately
//!   │       └─ neither  → block until trigger fires or close()
//! }
//! close(): request → join worker → reactor released
//! ```
//!
//! ### Task lifecycle
//! ```text
//! Ready ─execute()─► Initializing ─► Active ─┬─► Complete
//!   │                                        ├─► Failed
//!   └─cancel()─► Canceled     cancel() ─► PendingCancel ─► Canceled
//! ```
//!
//! ## Features
//! | Area               | Description                                                   | Key types / traits                         |
//! |--------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Reactors**       | Commit-driven computation units and their wake-up handle.     | [`Reactor`], [`Status`], [`Trigger`]       |
//! | **Composition**    | Runtime-growable merge of reactors.                           | [`QueueReactor`], [`QueueWriter`]          |
//! | **Executors**      | Worker threads driving one or many reactors.                  | [`Executor`], [`MultiExecutor`]            |
//! | **Tasks**          | Cancellable units of work with an observable state machine.   | [`Task`], [`TaskCore`], [`FnTask`]         |
//! | **Observation**    | Live stream of task transitions.                              | [`StatePublisher`], [`StateEntry`]         |
//! | **Errors**         | Typed errors for executors and tasks.                         | [`ExecutorError`], [`TaskError`]           |
//! | **Configuration**  | Worker thread settings.                                       | [`ExecutorConfig`]                         |
//!
//! ## Logging
//! The crate emits [`tracing`] events (executor lifecycle at `debug`, commits at
//! `trace`, faulted workers at `error`) and never installs a subscriber.
//!
//! ## Example
//! ```rust
//! use taskreactor::{FnTask, MultiExecutor, State, Task, TaskContext, TaskError};
//!
//! let executor = MultiExecutor::new();
//! let task = FnTask::arc("hello", |ctx: TaskContext| async move {
//!     if ctx.is_cancelled() {
//!         return Err(TaskError::Canceled);
//!     }
//!     Ok(())
//! });
//! let mut states = task.publisher().subscribe();
//!
//! executor.add(task.reactor());
//! executor.open()?;
//! task.execute();
//!
//! assert_eq!(states.blocking_recv()?.state, State::Initializing);
//! assert_eq!(states.blocking_recv()?.state, State::Active);
//! assert_eq!(states.blocking_recv()?.state, State::Complete);
//! executor.close();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod executor;
mod reactors;
mod tasks;

// ---- Public re-exports ----

pub use config::ExecutorConfig;
pub use error::{ExecutorError, TaskError};
pub use executor::{Executor, MultiExecutor};
pub use reactors::{
    has_continuation, is_complete, BoxReactor, FnReactor, QueueReactor, QueueWriter, Reactor,
    Status, Trigger,
};
pub use tasks::{
    aggregate, is_terminal, BoxTaskFuture, FnTask, State, StateEntry, StatePublisher, Task,
    TaskContext, TaskCore, TaskId, TaskReactor, TaskRef,
};
