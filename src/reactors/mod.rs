//! Reactive node protocol.
//!
//! ## Contents
//! - [`Reactor`], [`BoxReactor`] the commit-driven capability executors drive
//! - [`Status`] result flags of a commit (`COMPLETE`, `CONTINUE`)
//! - [`Trigger`] wake-up handle passed to every commit
//! - [`FnReactor`] closure-backed reactor
//! - [`QueueReactor`], [`QueueWriter`] runtime-growable composite

mod queue;
mod reactor;
mod status;
mod trigger;

pub use queue::{QueueReactor, QueueWriter};
pub use reactor::{BoxReactor, FnReactor, Reactor};
pub use status::{has_continuation, is_complete, Status};
pub use trigger::Trigger;
