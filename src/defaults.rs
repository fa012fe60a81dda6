//! Process-wide defaults for zero-configured counters.
//!
//! A [`Backoff`](crate::Backoff) whose interval or max duration is zero picks
//! these up on its next call to [`next`](crate::Backoff::next). Override them
//! before such counters are first used.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Built-in default interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Built-in default upper bound on a returned duration.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(6 * 60 * 60);

static INTERVAL_NANOS: AtomicU64 = AtomicU64::new(DEFAULT_INTERVAL.as_nanos() as u64);
static MAX_DURATION_NANOS: AtomicU64 = AtomicU64::new(DEFAULT_MAX_DURATION.as_nanos() as u64);

/// Current default interval.
pub fn interval() -> Duration {
    Duration::from_nanos(INTERVAL_NANOS.load(Ordering::Relaxed))
}

/// Current default max duration.
pub fn max_duration() -> Duration {
    Duration::from_nanos(MAX_DURATION_NANOS.load(Ordering::Relaxed))
}

/// Override the default interval. Values past `u64::MAX` nanoseconds saturate.
pub fn set_interval(interval: Duration) {
    INTERVAL_NANOS.store(saturating_nanos(interval), Ordering::Relaxed);
}

/// Override the default max duration. Values past `u64::MAX` nanoseconds saturate.
pub fn set_max_duration(max_duration: Duration) {
    MAX_DURATION_NANOS.store(saturating_nanos(max_duration), Ordering::Relaxed);
}

/// Put both defaults back to [`DEFAULT_INTERVAL`] and [`DEFAULT_MAX_DURATION`].
pub fn restore() {
    set_interval(DEFAULT_INTERVAL);
    set_max_duration(DEFAULT_MAX_DURATION);
}

pub(crate) fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
