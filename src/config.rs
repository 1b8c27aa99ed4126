//! # Executor configuration.
//!
//! Provides [`ExecutorConfig`], the settings used when an executor spawns its worker.
//!
//! Config is used in two ways:
//! 1. **Single-node executor**: `Executor::with_config(reactor, &config)`
//! 2. **Multi-node executor**: `MultiExecutor::with_config(config)`
//!
//! ## Sentinel values
//! - `stack_size = 0` → platform default stack size for the worker thread

use std::borrow::Cow;

/// Worker settings for an executor.
///
/// ## Field semantics
/// - `name`: Worker thread name (shows up in panics, debuggers and `tracing` output)
/// - `stack_size`: Worker stack size in bytes (`0` = platform default)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct ExecutorConfig {
    /// Name given to the worker thread.
    pub name: Cow<'static, str>,

    /// Stack size of the worker thread in bytes.
    ///
    /// - `0` = platform default
    /// - `n > 0` = exactly `n` bytes
    pub stack_size: usize,
}

impl ExecutorConfig {
    /// Creates a config with the given worker name and default stack size.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the worker stack size as an `Option`.
    ///
    /// - `None` → platform default
    /// - `Some(n)` → `n` bytes
    #[inline]
    pub fn stack_size(&self) -> Option<usize> {
        if self.stack_size == 0 {
            None
        } else {
            Some(self.stack_size)
        }
    }
}

impl Default for ExecutorConfig {
    /// Default configuration:
    ///
    /// - `name = "reactor-executor"`
    /// - `stack_size = 0` (platform default)
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("reactor-executor"),
            stack_size: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_stack_size_means_default() {
        let cfg = ExecutorConfig::default();
        assert_eq!(cfg.stack_size(), None);

        let cfg = ExecutorConfig {
            stack_size: 256 * 1024,
            ..ExecutorConfig::named("orders")
        };
        assert_eq!(cfg.stack_size(), Some(256 * 1024));
        assert_eq!(cfg.name, "orders");
    }
}
