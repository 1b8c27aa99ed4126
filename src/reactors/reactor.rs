//! # Reactor protocol and closure-backed reactor.
//!
//! [`Reactor`] is the capability an executor drives: one `commit` per step, with a
//! strictly increasing sequence number and the executor's [`Trigger`].
//! [`FnReactor`] wraps a closure, which is enough for most adapters and tests.
//!
//! ## Contract
//! - `sequence` strictly increases across calls on the same reactor.
//! - `commit` is never called concurrently for one reactor.
//! - A reactor may be committed when it did not signal (spurious commits) and
//!   must report its current status without side effects in that case.
//! - Once a reactor reports [`Status::COMPLETE`] it is never committed again.
//! - Failures are application state (e.g. a task resolving to `Failed`); a panic
//!   escaping `commit` is fatal to the executor's worker.

use crate::reactors::{Status, Trigger};

/// A unit of incremental computation advanced one step at a time.
pub trait Reactor: Send + 'static {
    /// Evaluates one step for `sequence`.
    ///
    /// To be woken later, register interest against `trigger` before returning
    /// [`Status::NONE`].
    fn commit(&mut self, sequence: u64, trigger: &Trigger) -> Status;
}

/// Owned, type-erased reactor.
pub type BoxReactor = Box<dyn Reactor>;

impl<R: Reactor + ?Sized> Reactor for Box<R> {
    fn commit(&mut self, sequence: u64, trigger: &Trigger) -> Status {
        (**self).commit(sequence, trigger)
    }
}

/// Closure-backed reactor.
///
/// ## Example
/// ```rust
/// use taskreactor::{FnReactor, Reactor, Status, Trigger};
///
/// let mut countdown = 3;
/// let mut r = FnReactor::new(move |_seq, _trigger: &Trigger| {
///     countdown -= 1;
///     if countdown == 0 { Status::COMPLETE } else { Status::CONTINUE }
/// });
///
/// let trigger = Trigger::detached();
/// assert_eq!(r.commit(0, &trigger), Status::CONTINUE);
/// assert_eq!(r.commit(1, &trigger), Status::CONTINUE);
/// assert_eq!(r.commit(2, &trigger), Status::COMPLETE);
/// ```
pub struct FnReactor<F> {
    f: F,
}

impl<F> FnReactor<F>
where
    F: FnMut(u64, &Trigger) -> Status + Send + 'static,
{
    /// Creates a new closure-backed reactor.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the reactor and returns it type-erased.
    pub fn boxed(f: F) -> BoxReactor {
        Box::new(Self::new(f))
    }
}

impl<F> Reactor for FnReactor<F>
where
    F: FnMut(u64, &Trigger) -> Status + Send + 'static,
{
    fn commit(&mut self, sequence: u64, trigger: &Trigger) -> Status {
        (self.f)(sequence, trigger)
    }
}
