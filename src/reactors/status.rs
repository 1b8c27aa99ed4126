//! # Commit status flags.
//!
//! A [`Status`] is the result of one [`Reactor::commit`](crate::Reactor::commit) call.
//! It carries two independent flags:
//!
//! | Flag       | Meaning                                                   |
//! |------------|-----------------------------------------------------------|
//! | `COMPLETE` | the reactor will never produce further updates            |
//! | `CONTINUE` | more synchronous progress is possible right now           |
//!
//! A status with neither flag ([`Status::NONE`]) means "nothing to do until
//! the trigger fires": the executor suspends its worker.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Result of a single commit.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Status(u8);

impl Status {
    /// No progress available; suspend until signalled.
    pub const NONE: Status = Status(0);
    /// The reactor is finished and must not be committed again.
    pub const COMPLETE: Status = Status(0b01);
    /// Another commit can make progress immediately.
    pub const CONTINUE: Status = Status(0b10);

    /// Returns `true` if the `COMPLETE` flag is set.
    #[inline]
    pub const fn is_complete(self) -> bool {
        self.0 & Self::COMPLETE.0 != 0
    }

    /// Returns `true` if the `CONTINUE` flag is set.
    #[inline]
    pub const fn has_continuation(self) -> bool {
        self.0 & Self::CONTINUE.0 != 0
    }

    /// Returns `true` if neither flag is set.
    #[inline]
    pub const fn is_suspended(self) -> bool {
        self.0 == 0
    }
}

/// Returns `true` if `status` reports completion.
#[inline]
pub fn is_complete(status: Status) -> bool {
    status.is_complete()
}

/// Returns `true` if `status` allows further synchronous progress.
#[inline]
pub fn has_continuation(status: Status) -> bool {
    status.has_continuation()
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        Status(self.0 | rhs.0)
    }
}

impl BitOrAssign for Status {
    fn bitor_assign(&mut self, rhs: Status) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_complete(), self.has_continuation()) {
            (false, false) => f.write_str("NONE"),
            (true, false) => f.write_str("COMPLETE"),
            (false, true) => f.write_str("CONTINUE"),
            (true, true) => f.write_str("COMPLETE|CONTINUE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_independent() {
        assert!(!Status::NONE.is_complete());
        assert!(!Status::NONE.has_continuation());
        assert!(Status::NONE.is_suspended());

        assert!(Status::COMPLETE.is_complete());
        assert!(!Status::COMPLETE.has_continuation());

        let both = Status::COMPLETE | Status::CONTINUE;
        assert!(is_complete(both));
        assert!(has_continuation(both));
        assert!(!both.is_suspended());
    }

    #[test]
    fn test_or_assign_accumulates() {
        let mut status = Status::NONE;
        status |= Status::CONTINUE;
        assert_eq!(status, Status::CONTINUE);
        assert_eq!(format!("{status:?}"), "CONTINUE");
    }
}
