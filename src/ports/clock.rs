// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall-clock abstraction used by the refresh logic.

use std::time::SystemTime;

/// Source of the current time.
///
/// The registry measures its refresh interval and failure cooldown on this clock.
/// Tests substitute a clock they advance by hand.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// The operating system's wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
