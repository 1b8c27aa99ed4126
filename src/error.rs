//! Error types used by the executors and tasks.
//!
//! This module defines two main error enums:
//!
//! - [`ExecutorError`] — errors raised while opening an executor.
//! - [`TaskError`] — errors raised by task bodies and task state transitions.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Nothing here ever crosses a `commit` call: reactors encode failure as task state.

use std::io;

use thiserror::Error;

use crate::tasks::State;

/// # Errors produced by executor lifecycle operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// `open()` was called on an executor whose worker is already running.
    #[error("executor is already open")]
    AlreadyOpen,

    /// `open()` was called on an executor that has been closed.
    #[error("executor is closed")]
    Closed,

    /// The worker thread could not be spawned.
    #[error("failed to spawn executor worker: {source}")]
    Spawn {
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl ExecutorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskreactor::ExecutorError;
    ///
    /// assert_eq!(ExecutorError::AlreadyOpen.as_label(), "executor_already_open");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ExecutorError::AlreadyOpen => "executor_already_open",
            ExecutorError::Closed => "executor_closed",
            ExecutorError::Spawn { .. } => "executor_spawn_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ExecutorError::AlreadyOpen => "already open".to_string(),
            ExecutorError::Closed => "closed".to_string(),
            ExecutorError::Spawn { source } => format!("spawn failed: {source}"),
        }
    }
}

/// # Errors produced by tasks.
///
/// Task bodies return [`TaskError::Fail`] or [`TaskError::Canceled`] to resolve
/// their task to `Failed` or `Canceled`. [`TaskError::InvalidTransition`] is
/// returned by [`TaskCore`](crate::TaskCore) when a variant asks for a
/// transition the state machine does not allow.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task work failed; the task resolves to `Failed`.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task observed a cancel request and stopped; the task resolves to `Canceled`.
    #[error("task canceled")]
    Canceled,

    /// A state transition outside the task state machine was requested.
    #[error("invalid transition {from:?} -> {to:?}")]
    InvalidTransition {
        /// State the task was in.
        from: State,
        /// State that was requested.
        to: State,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskreactor::TaskError;
    ///
    /// assert_eq!(TaskError::fail("boom").as_label(), "task_failed");
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
            TaskError::InvalidTransition { .. } => "task_invalid_transition",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => error.clone(),
            TaskError::Canceled => "canceled".to_string(),
            TaskError::InvalidTransition { from, to } => {
                format!("{} -> {}", from.as_label(), to.as_label())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_message_is_raw_error_text() {
        let err = TaskError::fail("order rejected");
        assert_eq!(err.as_message(), "order rejected");
        assert_eq!(err.to_string(), "execution failed: order rejected");
    }

    #[test]
    fn test_invalid_transition_labels() {
        let err = TaskError::InvalidTransition {
            from: State::Complete,
            to: State::Active,
        };
        assert_eq!(err.as_label(), "task_invalid_transition");
        assert_eq!(err.as_message(), "complete -> active");
    }

    #[test]
    fn test_spawn_error_keeps_source() {
        let err = ExecutorError::Spawn {
            source: io::Error::new(io::ErrorKind::Other, "no threads"),
        };
        assert_eq!(err.as_label(), "executor_spawn_failed");
        assert!(std::error::Error::source(&err).is_some());
    }
}
