//! Time abstraction for testability.
//!
//! The delivery client reads its signing timestamp through a [`Clock`],
//! so tests can pin the timestamp and check the signature exactly.

use std::time::{SystemTime, UNIX_EPOCH};

/// Abstraction over system time for testability.
///
/// # Example
///
/// ```
/// use feishu_bot::time::{Clock, SystemClock, unix_seconds};
///
/// let clock = SystemClock;
/// assert!(unix_seconds(clock.now()) > 0);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Production clock delegating to [`SystemTime::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Converts a point in time to Unix seconds.
///
/// Times before the epoch clamp to 0.
#[must_use]
pub fn unix_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}
