//! Bounded busy-wait on hardware flags.

use crate::error::{Error, WaitCondition};

/// Maximum number of times a flag is polled before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout {
    polls: u32,
}

impl Timeout {
    pub const fn polls(polls: u32) -> Self {
        Self { polls }
    }

    pub const fn budget(&self) -> u32 {
        self.polls
    }
}

/// Polls `ready` until it returns `true`, at most `timeout.budget()` times.
///
/// Returns the number of polls it took. A zero budget fails without polling.
pub fn poll_until<F>(timeout: Timeout, condition: WaitCondition, mut ready: F) -> Result<u32, Error>
where
    F: FnMut() -> bool,
{
    for attempt in 1..=timeout.polls {
        if ready() {
            return Ok(attempt);
        }
        core::hint::spin_loop();
    }

    warn!(
        "{} not reached after {} polls",
        condition,
        timeout.polls
    );
    Err(Error::TimedOut(condition))
}
