//! # Growable composite reactor.
//!
//! [`QueueReactor`] merges a runtime-growable set of reactors into a single reactor.
//! Producers push through a [`QueueWriter`] (lock-free [`SegQueue`]); only the
//! committing worker ever touches the live child list.
//!
//! ## Commit
//! ```text
//! commit(seq, trigger)
//!   ├─► remember trigger for writers (wake-up on push)
//!   ├─► drain pending queue ──► children
//!   ├─► for child in children: status = child.commit(seq, trigger)
//!   │       └─ COMPLETE → child dropped
//!   └─► CONTINUE if any child continued or new children arrived meanwhile
//! ```
//!
//! ## Rules
//! - Children see the composite's sequence numbers: strictly increasing, not dense.
//! - The composite never reports `COMPLETE`: a writer can always add more work.
//! - Pushing from inside a child's commit is allowed; the new child is committed on
//!   the very next sequence.

use std::fmt;
use std::sync::Arc;

use crossbeam_queue::SegQueue;
use parking_lot::Mutex;

use crate::reactors::{BoxReactor, Reactor, Status, Trigger};

/// State shared between a [`QueueReactor`] and its writers.
struct Pending {
    queue: SegQueue<BoxReactor>,
    trigger: Mutex<Trigger>,
}

/// Composite reactor fed by a concurrent insertion queue.
pub struct QueueReactor {
    pending: Arc<Pending>,
    children: Vec<BoxReactor>,
}

/// Cloneable producer handle for a [`QueueReactor`].
#[derive(Clone)]
pub struct QueueWriter {
    pending: Arc<Pending>,
}

impl QueueReactor {
    /// Creates an empty composite.
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Pending {
                queue: SegQueue::new(),
                trigger: Mutex::new(Trigger::detached()),
            }),
            children: Vec::new(),
        }
    }

    /// Returns a producer handle for this composite.
    pub fn writer(&self) -> QueueWriter {
        QueueWriter {
            pending: Arc::clone(&self.pending),
        }
    }

    /// Number of children currently being committed.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if there are no live children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn drain(&mut self) {
        while let Some(reactor) = self.pending.queue.pop() {
            self.children.push(reactor);
        }
    }
}

impl Default for QueueReactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Reactor for QueueReactor {
    fn commit(&mut self, sequence: u64, trigger: &Trigger) -> Status {
        // Publish the trigger before draining so a push that misses this drain
        // still finds a live trigger to signal.
        *self.pending.trigger.lock() = trigger.clone();
        self.drain();

        let mut status = Status::NONE;
        self.children.retain_mut(|child| {
            let child_status = child.commit(sequence, trigger);
            if child_status.has_continuation() {
                status |= Status::CONTINUE;
            }
            !child_status.is_complete()
        });
        if !self.pending.queue.is_empty() {
            status |= Status::CONTINUE;
        }
        status
    }
}

impl fmt::Debug for QueueReactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueReactor")
            .field("children", &self.children.len())
            .field("pending", &self.pending.queue.len())
            .finish()
    }
}

impl QueueWriter {
    /// Queues `reactor` and signals the composite's executor.
    pub fn push<R: Reactor>(&self, reactor: R) {
        self.push_boxed(Box::new(reactor));
    }

    /// Queues an already boxed reactor.
    pub fn push_boxed(&self, reactor: BoxReactor) {
        self.pending.queue.push(reactor);
        self.pending.trigger.lock().signal();
    }

    /// Number of reactors queued but not yet picked up by a commit.
    pub fn pending(&self) -> usize {
        self.pending.queue.len()
    }
}

impl fmt::Debug for QueueWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueWriter")
            .field("pending", &self.pending.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::reactors::FnReactor;

    fn counting(
        limit: usize,
        commits: Arc<AtomicUsize>,
    ) -> FnReactor<impl FnMut(u64, &Trigger) -> Status + Send + 'static> {
        FnReactor::new(move |_seq, _trigger: &Trigger| {
            let n = commits.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= limit {
                Status::COMPLETE
            } else {
                Status::NONE
            }
        })
    }

    #[test]
    fn test_empty_composite_suspends() {
        let mut queue = QueueReactor::new();
        assert_eq!(queue.commit(0, &Trigger::detached()), Status::NONE);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_completed_children_are_dropped() {
        let mut queue = QueueReactor::new();
        let writer = queue.writer();
        let once = Arc::new(AtomicUsize::new(0));
        let twice = Arc::new(AtomicUsize::new(0));
        writer.push(counting(1, once.clone()));
        writer.push(counting(2, twice.clone()));
        assert_eq!(writer.pending(), 2);

        let trigger = Trigger::detached();
        assert_eq!(queue.commit(0, &trigger), Status::NONE);
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.commit(1, &trigger), Status::NONE);
        assert!(queue.is_empty());

        queue.commit(2, &trigger);
        assert_eq!(once.load(Ordering::SeqCst), 1);
        assert_eq!(twice.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_continuation_of_any_child_continues() {
        let mut queue = QueueReactor::new();
        let writer = queue.writer();
        writer.push(FnReactor::new(|_, _: &Trigger| Status::NONE));
        writer.push(FnReactor::new(|_, _: &Trigger| Status::CONTINUE));

        assert_eq!(queue.commit(0, &Trigger::detached()), Status::CONTINUE);
    }

    #[test]
    fn test_push_during_commit_requests_continuation() {
        let mut queue = QueueReactor::new();
        let writer = queue.writer();
        let inner = writer.clone();
        let child_seq = Arc::new(Mutex::new(Vec::new()));
        let seen = child_seq.clone();

        writer.push(FnReactor::new(move |_, _: &Trigger| {
            let seen = seen.clone();
            inner.push(FnReactor::new(move |seq, _: &Trigger| {
                seen.lock().push(seq);
                Status::COMPLETE
            }));
            Status::COMPLETE
        }));

        let trigger = Trigger::detached();
        assert_eq!(queue.commit(0, &trigger), Status::CONTINUE);
        assert_eq!(queue.commit(1, &trigger), Status::NONE);
        assert_eq!(*child_seq.lock(), vec![1]);
    }
}
