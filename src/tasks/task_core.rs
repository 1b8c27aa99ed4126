//! # TaskCore: the shared task state machine.
//!
//! [`TaskCore`] holds what every task variant has in common: identifier, name,
//! current [`State`] and the [`StatePublisher`]. Variants call its transition
//! helpers; the core validates each transition and publishes it.
//!
//! ## Transitions
//! | From             | Allowed next states                                        |
//! |------------------|------------------------------------------------------------|
//! | `Ready`          | `Initializing`, `Canceled`                                 |
//! | `Initializing`   | `Active`, `PendingCancel`, `Canceled`, `Failed`, `Complete`|
//! | `Active`         | `PendingCancel`, `Canceled`, `Failed`, `Complete`          |
//! | `PendingCancel`  | `Canceled`, `Failed`, `Complete`                           |
//! | terminal         | none                                                       |
//!
//! ## Rules
//! - A transition and its publication happen under one lock: receivers observe
//!   entries in transition order even when transitions race across threads.
//! - Nothing is published after a terminal state.

use std::borrow::Cow;
use std::fmt;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::TaskError;
use crate::tasks::{State, StateEntry, StatePublisher, TaskId};

/// State machine shared by task variants.
pub struct TaskCore {
    id: TaskId,
    name: Cow<'static, str>,
    state: Mutex<State>,
    publisher: StatePublisher,
}

impl TaskCore {
    /// Creates a `Ready` task core with a fresh identifier.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: TaskId::next(),
            name: name.into(),
            state: Mutex::new(State::Ready),
            publisher: StatePublisher::new(),
        }
    }

    /// Returns the task identifier.
    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the state publisher.
    #[inline]
    pub fn publisher(&self) -> &StatePublisher {
        &self.publisher
    }

    /// Current state, for the variant's own bookkeeping.
    pub fn state(&self) -> State {
        *self.state.lock()
    }

    /// Moves to `next`, publishing the transition.
    ///
    /// # Errors
    /// [`TaskError::InvalidTransition`] if the table above forbids it; nothing is published.
    pub fn transition(&self, next: State, message: Option<&str>) -> Result<(), TaskError> {
        let mut state = self.state.lock();
        self.apply(&mut state, next, message)
    }

    /// Moves to the state `pick` chooses for the current one, publishing it.
    ///
    /// The choice and the transition happen under the same lock. Returns the state
    /// entered, or `None` if `pick` declined or the table forbids the move.
    pub fn transition_with<F>(&self, pick: F, message: Option<&str>) -> Option<State>
    where
        F: FnOnce(State) -> Option<State>,
    {
        let mut state = self.state.lock();
        let next = pick(*state)?;
        self.apply(&mut state, next, message).ok().map(|()| next)
    }

    fn apply(
        &self,
        state: &mut State,
        next: State,
        message: Option<&str>,
    ) -> Result<(), TaskError> {
        let from = *state;
        if !allowed(from, next) {
            return Err(TaskError::InvalidTransition { from, to: next });
        }
        *state = next;
        debug!(task = %self.id, name = %self.name, from = %from, to = %next, "task transition");

        let mut entry = StateEntry::new(next);
        if let Some(message) = message {
            entry = entry.with_message(message);
        }
        self.publisher.publish(entry);
        Ok(())
    }

    /// `Ready → Initializing`. Returns `false` (and does nothing) in any other state.
    pub fn begin(&self) -> bool {
        self.transition(State::Initializing, None).is_ok()
    }

    /// `Initializing → Active`.
    pub fn set_active(&self) -> Result<(), TaskError> {
        self.transition(State::Active, None)
    }

    /// Moves to a terminal `state` with an optional message.
    ///
    /// # Errors
    /// [`TaskError::InvalidTransition`] if `state` is not terminal or the task already is.
    pub fn set_terminal(&self, state: State, message: Option<&str>) -> Result<(), TaskError> {
        if !state.is_terminal() {
            return Err(TaskError::InvalidTransition {
                from: self.state(),
                to: state,
            });
        }
        self.transition(state, message)
    }

    /// Applies a cancel request and returns the state entered, if any.
    ///
    /// - `Ready` → `Canceled` (the work never starts)
    /// - `Initializing` / `Active` → `PendingCancel`
    /// - otherwise nothing happens
    pub fn request_cancel(&self) -> Option<State> {
        self.transition_with(
            |from| match from {
                State::Ready => Some(State::Canceled),
                State::Initializing | State::Active => Some(State::PendingCancel),
                _ => None,
            },
            None,
        )
    }
}

fn allowed(from: State, to: State) -> bool {
    use State::*;
    match from {
        Ready => matches!(to, Initializing | Canceled),
        Initializing => matches!(to, Active | PendingCancel | Canceled | Failed | Complete),
        Active => matches!(to, PendingCancel | Canceled | Failed | Complete),
        PendingCancel => matches!(to, Canceled | Failed | Complete),
        Canceled | Failed | Complete => false,
    }
}

impl fmt::Debug for TaskCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskCore")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}
