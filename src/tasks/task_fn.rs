//! # Function-backed task (`FnTask`) and its reactor.
//!
//! [`FnTask`] wraps a closure `F: FnOnce(TaskContext) -> Fut` whose future is the
//! task's work. [`TaskReactor`] adapts the task into a [`Reactor`]: it polls the
//! future inside commits, using the executor's trigger as the future's waker, so
//! any thread completing something the future awaits wakes the executor.
//!
//! ## Flow
//! ```text
//! execute() ──► Initializing ──wake──► commit: Active, build future, poll
//!                                        ├─ Pending        → NONE (suspend)
//!                                        ├─ Ok(())         → Complete
//!                                        ├─ Err(Canceled)  → Canceled
//!                                        └─ Err(e)         → Failed(e)
//! cancel()  ──► PendingCancel + token cancelled ──wake──► commit: poll again
//! ```
//!
//! ## Example
//! ```rust
//! use taskreactor::{Executor, FnTask, State, Task, TaskContext, TaskError};
//!
//! let task = FnTask::arc("hello", |_ctx: TaskContext| async { Ok::<_, TaskError>(()) });
//! let mut rx = task.publisher().subscribe();
//! let executor = Executor::new(task.reactor()).unwrap();
//!
//! task.execute();
//! assert_eq!(rx.blocking_recv().unwrap().state, State::Initializing);
//! assert_eq!(rx.blocking_recv().unwrap().state, State::Active);
//! assert_eq!(rx.blocking_recv().unwrap().state, State::Complete);
//! executor.close();
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tracing::warn;

use crate::error::TaskError;
use crate::reactors::{Reactor, Status, Trigger};
use crate::tasks::{State, StatePublisher, Task, TaskCore, TaskId};

/// Boxed future produced by a task body.
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

type TaskBody = Box<dyn FnOnce(TaskContext) -> BoxTaskFuture + Send + 'static>;

/// Handed to the task body when the task starts.
#[derive(Clone, Debug)]
pub struct TaskContext {
    id: TaskId,
    token: CancellationToken,
}

impl TaskContext {
    /// Identifier of the running task.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Token cancelled when the task receives a cancel request.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns `true` once a cancel request was received.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once a cancel request was received.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Task whose work is a future built from a closure.
pub struct FnTask {
    core: TaskCore,
    body: Mutex<Option<TaskBody>>,
    token: CancellationToken,
    waker: Mutex<Option<Waker>>,
}

impl FnTask {
    /// Creates a new function-backed task in the `Ready` state.
    ///
    /// Prefer [`FnTask::arc`]: [`reactor`](FnTask::reactor) needs an `Arc`.
    pub fn new<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: FnOnce(TaskContext) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let body: TaskBody = Box::new(move |ctx| -> BoxTaskFuture { Box::pin(f(ctx)) });
        Self {
            core: TaskCore::new(name),
            body: Mutex::new(Some(body)),
            token: CancellationToken::new(),
            waker: Mutex::new(None),
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self>
    where
        F: FnOnce(TaskContext) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Arc::new(Self::new(name, f))
    }

    /// Returns the reactor that drives this task.
    ///
    /// Only the first reactor owns the body; reactors obtained later complete
    /// immediately without touching the task.
    pub fn reactor(self: &Arc<Self>) -> TaskReactor {
        TaskReactor {
            body: self.body.lock().take(),
            task: Arc::clone(self),
            future: None,
        }
    }

    fn context(&self) -> TaskContext {
        TaskContext {
            id: self.core.id(),
            token: self.token.clone(),
        }
    }

    fn register(&self, waker: Waker) {
        *self.waker.lock() = Some(waker);
    }

    fn wake(&self) {
        if let Some(waker) = self.waker.lock().as_ref() {
            waker.wake_by_ref();
        }
    }

    fn resolve(&self, result: Result<(), TaskError>) {
        let outcome = match result {
            Ok(()) => self.core.set_terminal(State::Complete, None),
            Err(TaskError::Canceled) => self.core.set_terminal(State::Canceled, None),
            Err(e) => {
                let message = e.as_message();
                self.core.set_terminal(State::Failed, Some(&message))
            }
        };
        if let Err(e) = outcome {
            warn!(task = %self.core.id(), error = %e, "task resolved twice");
        }
    }
}

impl Task for FnTask {
    fn id(&self) -> TaskId {
        self.core.id()
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn execute(&self) {
        if self.core.begin() {
            self.wake();
        }
    }

    fn cancel(&self) {
        if self.core.request_cancel().is_some() {
            self.token.cancel();
            self.wake();
        }
    }

    fn publisher(&self) -> &StatePublisher {
        self.core.publisher()
    }
}

impl fmt::Debug for FnTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTask").field("core", &self.core).finish()
    }
}

/// Reactor driving one [`FnTask`].
pub struct TaskReactor {
    task: Arc<FnTask>,
    body: Option<TaskBody>,
    future: Option<BoxTaskFuture>,
}

impl TaskReactor {
    /// The task this reactor drives.
    pub fn task(&self) -> &Arc<FnTask> {
        &self.task
    }
}

impl Reactor for TaskReactor {
    fn commit(&mut self, _sequence: u64, trigger: &Trigger) -> Status {
        // Register before reading the state: an execute()/cancel() racing with this
        // commit either is seen below or finds the new waker.
        let waker = trigger.waker();
        self.task.register(waker.clone());

        if self.future.is_none() {
            match self.task.core.state() {
                State::Ready => return Status::NONE,
                State::Initializing => {
                    let Some(body) = self.body.take() else {
                        return Status::COMPLETE;
                    };
                    if self.task.core.set_active().is_err() {
                        // A cancel landed between the state read and here: the body
                        // has not started, so it never runs.
                        let _ = self.task.core.set_terminal(State::Canceled, None);
                        return Status::COMPLETE;
                    }
                    self.future = Some(body(self.task.context()));
                }
                State::PendingCancel => {
                    if self.body.take().is_some() {
                        let _ = self.task.core.set_terminal(State::Canceled, None);
                    }
                    return Status::COMPLETE;
                }
                _ => return Status::COMPLETE,
            }
        }

        let Some(future) = self.future.as_mut() else {
            return Status::COMPLETE;
        };
        let mut cx = Context::from_waker(&waker);
        match future.as_mut().poll(&mut cx) {
            Poll::Pending => Status::NONE,
            Poll::Ready(result) => {
                self.future = None;
                self.task.resolve(result);
                Status::COMPLETE
            }
        }
    }
}

impl fmt::Debug for TaskReactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskReactor")
            .field("task", &self.task.core.id())
            .field("started", &self.future.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    use futures::channel::oneshot;
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::sync::broadcast::Receiver;

    use super::*;
    use crate::executor::Executor;
    use crate::tasks::StateEntry;

    fn states(rx: &mut Receiver<StateEntry>, n: usize) -> Vec<State> {
        (0..n).map(|_| rx.blocking_recv().unwrap().state).collect()
    }

    #[test]
    fn test_body_ok_completes() {
        let task = FnTask::arc("ok", |_ctx: TaskContext| async { Ok::<_, TaskError>(()) });
        let mut rx = task.publisher().subscribe();
        let _executor = Executor::new(task.reactor()).unwrap();

        task.execute();
        assert_eq!(
            states(&mut rx, 3),
            vec![State::Initializing, State::Active, State::Complete]
        );
    }

    #[test]
    fn test_body_error_fails_with_message() {
        let task = FnTask::arc("rejected", |_ctx: TaskContext| async {
            Err::<(), _>(TaskError::fail("insufficient buying power"))
        });
        let mut rx = task.publisher().subscribe();
        let _executor = Executor::new(task.reactor()).unwrap();

        task.execute();
        assert_eq!(states(&mut rx, 2), vec![State::Initializing, State::Active]);
        let last = rx.blocking_recv().unwrap();
        assert_eq!(last.state, State::Failed);
        assert_eq!(last.message.as_deref(), Some("insufficient buying power"));
    }

    #[test]
    fn test_wake_from_foreign_thread() {
        let (tx, rx_done) = oneshot::channel::<u32>();
        let task = FnTask::arc("waiting", |_ctx: TaskContext| async move {
            match rx_done.await {
                Ok(100) => Ok(()),
                Ok(other) => Err(TaskError::fail(format!("partial fill {other}"))),
                Err(_) => Err(TaskError::fail("report channel dropped")),
            }
        });
        let mut rx = task.publisher().subscribe();
        let _executor = Executor::new(task.reactor()).unwrap();

        task.execute();
        assert_eq!(states(&mut rx, 2), vec![State::Initializing, State::Active]);

        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            let _ = tx.send(100);
        });
        assert_eq!(rx.blocking_recv().unwrap().state, State::Complete);
    }

    #[test]
    fn test_cancel_while_active() {
        let task = FnTask::arc("cancellable", |ctx: TaskContext| async move {
            ctx.cancelled().await;
            Err::<(), _>(TaskError::Canceled)
        });
        let mut rx = task.publisher().subscribe();
        let _executor = Executor::new(task.reactor()).unwrap();

        task.execute();
        assert_eq!(states(&mut rx, 2), vec![State::Initializing, State::Active]);

        task.cancel();
        assert_eq!(
            states(&mut rx, 2),
            vec![State::PendingCancel, State::Canceled]
        );
    }

    #[test]
    fn test_cancel_before_execute_never_runs_body() {
        let task = FnTask::arc("never", |_ctx: TaskContext| async {
            Err::<(), _>(TaskError::fail("body must not run"))
        });
        let mut rx = task.publisher().subscribe();
        let executor = Executor::new(task.reactor()).unwrap();

        task.cancel();
        assert_eq!(rx.blocking_recv().unwrap().state, State::Canceled);

        task.execute();
        thread::sleep(Duration::from_millis(50));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        executor.close();
        assert!(!executor.is_faulted());
    }

    #[test]
    fn test_cancel_racing_execute_never_runs_body_after_canceled() {
        for _ in 0..200 {
            let ran = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&ran);
            let task = FnTask::arc("race", move |ctx: TaskContext| async move {
                flag.store(true, Ordering::SeqCst);
                if ctx.is_cancelled() {
                    Err(TaskError::Canceled)
                } else {
                    Ok(())
                }
            });
            let mut rx = task.publisher().subscribe();
            let executor = Executor::new(task.reactor()).unwrap();
            let barrier = Arc::new(Barrier::new(2));

            let canceler = {
                let task = Arc::clone(&task);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    task.cancel();
                })
            };
            barrier.wait();
            task.execute();
            canceler.join().unwrap();

            let mut seen = Vec::new();
            loop {
                let state = rx.blocking_recv().unwrap().state;
                seen.push(state);
                if state.is_terminal() {
                    break;
                }
            }
            executor.close();

            assert!(!executor.is_faulted());
            assert_eq!(seen.iter().filter(|s| s.is_terminal()).count(), 1);
            if ran.load(Ordering::SeqCst) {
                assert!(seen.contains(&State::Active), "body ran without Active: {seen:?}");
            }
            assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        }
    }

    #[test]
    fn test_execute_is_noop_once_started() {
        let task = FnTask::arc("once", |_ctx: TaskContext| async { Ok::<_, TaskError>(()) });
        let mut rx = task.publisher().subscribe();
        let _executor = Executor::new(task.reactor()).unwrap();

        task.execute();
        task.execute();
        assert_eq!(
            states(&mut rx, 3),
            vec![State::Initializing, State::Active, State::Complete]
        );
        task.execute();
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_second_reactor_completes_immediately() {
        let task = FnTask::arc("dup", |_ctx: TaskContext| async { Ok::<_, TaskError>(()) });
        let _first = task.reactor();
        let mut second = task.reactor();

        task.execute();
        assert_eq!(second.commit(0, &Trigger::detached()), Status::COMPLETE);
    }

    #[test]
    fn test_commit_by_hand_without_executor() {
        let task = FnTask::arc("manual", |ctx: TaskContext| async move {
            assert!(ctx.id().get() >= 1);
            Ok::<_, TaskError>(())
        });
        let mut reactor = task.reactor();
        let trigger = Trigger::detached();

        assert_eq!(reactor.commit(0, &trigger), Status::NONE);
        task.execute();
        assert_eq!(reactor.commit(1, &trigger), Status::COMPLETE);
    }
}
