//! # Task states and published state entries.
//!
//! ```text
//! Ready ──execute()──► Initializing ──► Active ──► Complete
//!   │                       │             │ └────► Failed
//!   │                       └──cancel()───┴──► PendingCancel ──► Canceled
//!   └──cancel()──► Canceled
//! ```
//! `Canceled`, `Failed` and `Complete` are terminal: nothing is published after them.

use std::fmt;
use std::sync::Arc;

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Created, not executed yet.
    Ready,
    /// `execute()` was called; work is being set up.
    Initializing,
    /// Work is running.
    Active,
    /// Cancel was requested; waiting for the work to stop.
    PendingCancel,
    /// Stopped because of a cancel request.
    Canceled,
    /// Stopped because the work failed.
    Failed,
    /// Work finished.
    Complete,
}

impl State {
    /// Returns `true` for `Canceled`, `Failed` and `Complete`.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, State::Canceled | State::Failed | State::Complete)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub const fn as_label(self) -> &'static str {
        match self {
            State::Ready => "ready",
            State::Initializing => "initializing",
            State::Active => "active",
            State::PendingCancel => "pending_cancel",
            State::Canceled => "canceled",
            State::Failed => "failed",
            State::Complete => "complete",
        }
    }
}

/// Returns `true` exactly for terminal states.
#[inline]
pub fn is_terminal(state: State) -> bool {
    state.is_terminal()
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// One published transition: the new state and an optional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    /// State entered.
    pub state: State,
    /// Human-readable detail (failure reason, etc.).
    pub message: Option<Arc<str>>,
}

impl StateEntry {
    /// Creates an entry without a message.
    pub fn new(state: State) -> Self {
        Self {
            state,
            message: None,
        }
    }

    /// Attaches a message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Arc<str>>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [State; 7] = [
        State::Ready,
        State::Initializing,
        State::Active,
        State::PendingCancel,
        State::Canceled,
        State::Failed,
        State::Complete,
    ];

    #[test]
    fn test_terminal_states_are_exactly_canceled_failed_complete() {
        let terminal: Vec<State> = ALL.into_iter().filter(|s| is_terminal(*s)).collect();
        assert_eq!(terminal, vec![State::Canceled, State::Failed, State::Complete]);
    }

    #[test]
    fn test_entry_message() {
        let entry = StateEntry::new(State::Failed).with_message("rejected");
        assert_eq!(entry.message.as_deref(), Some("rejected"));
        assert_eq!(entry.state.to_string(), "failed");
    }
}
