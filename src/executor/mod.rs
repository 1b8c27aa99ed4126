//! Executors: worker threads that drive reactors.
//!
//! - [`Executor`]: one reactor, opened at construction.
//! - [`MultiExecutor`]: a growable set of reactors, explicit `open()`/`close()`.
//!
//! Internal modules:
//! - [`signal`]: update flag and lifecycle phase under one mutex;
//! - [`worker`]: commit loop, thread spawning and close/join discipline.

mod multi;
pub(crate) mod signal;
mod single;
mod worker;

pub use multi::MultiExecutor;
pub use single::Executor;
