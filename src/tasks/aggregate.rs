//! # Aggregate task: one task over many.
//!
//! [`aggregate`] builds a [`FnTask`] that executes a set of child tasks and
//! resolves once every child reached a terminal state:
//!
//! | Children                      | Aggregate    |
//! |-------------------------------|--------------|
//! | any `Failed`                  | `Failed`     |
//! | else any `Canceled`           | `Canceled`   |
//! | all `Complete`                | `Complete`   |
//!
//! Canceling the aggregate cancels every child, then waits for all of them.
//!
//! ## Rules
//! - Children must be `Ready` and driven by some executor (their reactors added
//!   by the caller); the aggregate only executes, cancels and observes them.
//! - The aggregate subscribes before executing children, so no transition is missed;
//!   a child already terminal at that point counts with its final state.

use std::borrow::Cow;
use std::sync::Arc;

use futures::future::{join_all, select, Either};
use futures::pin_mut;
use tokio::sync::broadcast::{error::RecvError, Receiver};

use crate::error::TaskError;
use crate::tasks::{FnTask, State, StateEntry, TaskContext, TaskRef};

/// Creates a task that runs `children` together.
pub fn aggregate(name: impl Into<Cow<'static, str>>, children: Vec<TaskRef>) -> Arc<FnTask> {
    FnTask::arc(name, move |ctx: TaskContext| async move {
        let receivers: Vec<_> = children
            .iter()
            .map(|c| c.publisher().subscribe_with_latest())
            .collect();
        for child in &children {
            child.execute();
        }

        let all = join_all(
            receivers
                .into_iter()
                .map(|(latest, rx)| wait_terminal(latest, rx)),
        );
        let cancelled = ctx.cancelled();
        pin_mut!(all, cancelled);

        let states = match select(all, cancelled).await {
            Either::Left((states, _)) => states,
            Either::Right(((), all)) => {
                for child in &children {
                    child.cancel();
                }
                all.await
            }
        };
        outcome(&states)
    })
}

/// Waits for the first terminal state, starting from the state seen at subscription.
async fn wait_terminal(latest: Option<State>, mut rx: Receiver<StateEntry>) -> State {
    if let Some(state) = latest.filter(|s| s.is_terminal()) {
        return state;
    }
    loop {
        match rx.recv().await {
            Ok(entry) if entry.state.is_terminal() => return entry.state,
            Ok(_) | Err(RecvError::Lagged(_)) => continue,
            // The aggregate holds every child, so their senders outlive this receiver.
            Err(RecvError::Closed) => return State::Failed,
        }
    }
}

fn outcome(states: &[State]) -> Result<(), TaskError> {
    let failed = states.iter().filter(|s| **s == State::Failed).count();
    if failed > 0 {
        return Err(TaskError::fail(format!(
            "{failed} of {} child tasks failed",
            states.len()
        )));
    }
    if states.contains(&State::Canceled) {
        return Err(TaskError::Canceled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::channel::oneshot;

    use super::*;
    use crate::executor::MultiExecutor;
    use crate::tasks::Task;

    fn states(rx: &mut Receiver<StateEntry>, n: usize) -> Vec<State> {
        (0..n).map(|_| rx.blocking_recv().unwrap().state).collect()
    }

    /// Child resolving with whatever is sent through the returned channel.
    fn remote_child(name: &'static str) -> (Arc<FnTask>, oneshot::Sender<Result<(), TaskError>>) {
        let (tx, rx) = oneshot::channel();
        let task = FnTask::arc(name, move |ctx: TaskContext| async move {
            let cancelled = ctx.cancelled();
            pin_mut!(rx, cancelled);
            match select(rx, cancelled).await {
                Either::Left((Ok(result), _)) => result,
                Either::Left((Err(_), _)) => Err(TaskError::fail("sender dropped")),
                Either::Right(_) => Err(TaskError::Canceled),
            }
        });
        (task, tx)
    }

    #[test]
    fn test_outcome_precedence() {
        assert_eq!(outcome(&[State::Complete, State::Complete]), Ok(()));
        assert_eq!(
            outcome(&[State::Complete, State::Canceled]),
            Err(TaskError::Canceled)
        );
        assert_eq!(
            outcome(&[State::Canceled, State::Failed, State::Complete]),
            Err(TaskError::fail("1 of 3 child tasks failed"))
        );
        assert_eq!(outcome(&[]), Ok(()));
    }

    #[test]
    fn test_completes_when_all_children_complete() {
        let executor = MultiExecutor::new();
        let (a, a_tx) = remote_child("a");
        let (b, b_tx) = remote_child("b");
        let all = aggregate("both", vec![a.clone() as TaskRef, b.clone() as TaskRef]);
        executor.add(a.reactor());
        executor.add(b.reactor());
        executor.add(all.reactor());
        executor.open().unwrap();

        let mut rx = all.publisher().subscribe();
        let mut a_rx = a.publisher().subscribe();
        all.execute();
        assert_eq!(states(&mut rx, 2), vec![State::Initializing, State::Active]);
        assert_eq!(states(&mut a_rx, 2), vec![State::Initializing, State::Active]);

        a_tx.send(Ok(())).unwrap();
        b_tx.send(Ok(())).unwrap();
        assert_eq!(rx.blocking_recv().unwrap().state, State::Complete);
        executor.close();
    }

    #[test]
    fn test_fails_when_a_child_fails() {
        let executor = MultiExecutor::new();
        let (a, a_tx) = remote_child("a");
        let (b, b_tx) = remote_child("b");
        let all = aggregate("both", vec![a.clone() as TaskRef, b.clone() as TaskRef]);
        for reactor in [a.reactor(), b.reactor(), all.reactor()] {
            executor.add(reactor);
        }
        executor.open().unwrap();

        let mut rx = all.publisher().subscribe();
        all.execute();
        assert_eq!(states(&mut rx, 2), vec![State::Initializing, State::Active]);

        a_tx.send(Err(TaskError::fail("rejected"))).unwrap();
        b_tx.send(Ok(())).unwrap();
        let last = rx.blocking_recv().unwrap();
        assert_eq!(last.state, State::Failed);
        assert_eq!(last.message.as_deref(), Some("1 of 2 child tasks failed"));
        executor.close();
    }

    #[test]
    fn test_cancel_propagates_to_children() {
        let executor = MultiExecutor::new();
        let (a, _a_tx) = remote_child("a");
        let (b, _b_tx) = remote_child("b");
        let all = aggregate("both", vec![a.clone() as TaskRef, b.clone() as TaskRef]);
        for reactor in [a.reactor(), b.reactor(), all.reactor()] {
            executor.add(reactor);
        }
        executor.open().unwrap();

        let mut rx = all.publisher().subscribe();
        let mut b_rx = b.publisher().subscribe();
        all.execute();
        assert_eq!(states(&mut rx, 2), vec![State::Initializing, State::Active]);
        assert_eq!(states(&mut b_rx, 2), vec![State::Initializing, State::Active]);

        all.cancel();
        assert_eq!(states(&mut rx, 2), vec![State::PendingCancel, State::Canceled]);
        assert_eq!(states(&mut b_rx, 2), vec![State::PendingCancel, State::Canceled]);
        executor.close();
    }

    #[test]
    fn test_child_canceled_before_execute_counts_as_canceled() {
        let executor = MultiExecutor::new();
        let (a, _a_tx) = remote_child("a");
        let (b, b_tx) = remote_child("b");
        let all = aggregate("both", vec![a.clone() as TaskRef, b.clone() as TaskRef]);
        for reactor in [a.reactor(), b.reactor(), all.reactor()] {
            executor.add(reactor);
        }
        executor.open().unwrap();

        a.cancel();
        let mut rx = all.publisher().subscribe();
        let mut b_rx = b.publisher().subscribe();
        all.execute();
        assert_eq!(states(&mut rx, 2), vec![State::Initializing, State::Active]);
        assert_eq!(states(&mut b_rx, 2), vec![State::Initializing, State::Active]);

        b_tx.send(Ok(())).unwrap();
        assert_eq!(rx.blocking_recv().unwrap().state, State::Canceled);
        executor.close();
    }

    #[test]
    fn test_cancel_resolves_with_already_terminal_child() {
        let executor = MultiExecutor::new();
        let (a, _a_tx) = remote_child("a");
        let (b, _b_tx) = remote_child("b");
        let all = aggregate("both", vec![a.clone() as TaskRef, b.clone() as TaskRef]);
        for reactor in [a.reactor(), b.reactor(), all.reactor()] {
            executor.add(reactor);
        }
        executor.open().unwrap();

        a.cancel();
        let mut rx = all.publisher().subscribe();
        let mut b_rx = b.publisher().subscribe();
        all.execute();
        assert_eq!(states(&mut rx, 2), vec![State::Initializing, State::Active]);
        assert_eq!(states(&mut b_rx, 2), vec![State::Initializing, State::Active]);

        all.cancel();
        assert_eq!(states(&mut rx, 2), vec![State::PendingCancel, State::Canceled]);
        executor.close();
    }
}
