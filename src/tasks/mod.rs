//! # Tasks: cancellable, observable units of work.
//!
//! This module provides the task-related types:
//! - [`Task`] - capability trait (`execute`, `cancel`, `publisher`)
//! - [`TaskCore`] - shared state machine for task variants
//! - [`State`], [`StateEntry`], [`is_terminal`] - lifecycle data
//! - [`StatePublisher`] - live stream of a task's transitions
//! - [`FnTask`], [`TaskReactor`], [`TaskContext`] - future-backed task and its reactor
//! - [`aggregate`] - composite task over a set of children

mod aggregate;
mod publisher;
mod state;
mod task;
mod task_core;
mod task_fn;

pub use aggregate::aggregate;
pub use publisher::StatePublisher;
pub use state::{is_terminal, State, StateEntry};
pub use task::{Task, TaskId, TaskRef};
pub use task_core::TaskCore;
pub use task_fn::{BoxTaskFuture, FnTask, TaskContext, TaskReactor};
