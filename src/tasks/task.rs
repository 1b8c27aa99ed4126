//! # Task capability and identifiers.
//!
//! A [`Task`] is a cancellable, observable unit of work. Variants differ in how they
//! execute and cancel; all of them expose their transitions through a
//! [`StatePublisher`] and are driven by adapting themselves into a
//! [`Reactor`](crate::Reactor) that runs under an executor.
//!
//! There is deliberately no state getter: the publisher is the notification channel.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::tasks::StatePublisher;

/// Next identifier to hand out; ids start at 1.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique task identifier, assigned at construction, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns the raw identifier.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// # Cancellable, observable unit of work.
///
/// # Example
/// ```
/// use taskreactor::{StatePublisher, Task, TaskCore, TaskId};
///
/// /// Task that completes as soon as it is executed.
/// struct Instant(TaskCore);
///
/// impl Task for Instant {
///     fn id(&self) -> TaskId { self.0.id() }
///     fn name(&self) -> &str { self.0.name() }
///     fn publisher(&self) -> &StatePublisher { self.0.publisher() }
///
///     fn execute(&self) {
///         if self.0.begin() {
///             let _ = self.0.set_active();
///             let _ = self.0.set_terminal(taskreactor::State::Complete, None);
///         }
///     }
/// }
///
/// let task = Instant(TaskCore::new("instant"));
/// let mut rx = task.publisher().subscribe();
/// task.execute();
/// assert_eq!(rx.try_recv().unwrap().state, taskreactor::State::Initializing);
/// ```
pub trait Task: Send + Sync + 'static {
    /// Returns the identifier assigned at construction.
    fn id(&self) -> TaskId;

    /// Returns a human-readable task name.
    fn name(&self) -> &str;

    /// Begins the task's work, moving it out of `Ready`. No-op in any other state.
    fn execute(&self);

    /// Requests early termination. Advisory; the default does nothing.
    fn cancel(&self) {}

    /// Returns the stream of state transitions.
    fn publisher(&self) -> &StatePublisher;
}

/// Shared handle to a task.
pub type TaskRef = Arc<dyn Task>;
