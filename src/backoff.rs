//! Exponential backoff with full jitter.
//!
//! The nth call to [`Backoff::next`] is bounded by `interval * 2^n`, capped at
//! the max duration, and with jitter enabled drawn uniformly from `[0, bound)`.
//! Growth stops once doubling again would overflow 64 bits of nanoseconds.

use crate::defaults::{self, saturating_nanos};
use crate::jitter::{self, JitterSource};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Thread-safe exponential backoff counter.
///
/// Zero for either duration means "use the process-wide default", resolved on
/// each call to [`next`](Backoff::next), so `Backoff::default()` is usable as is.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use jitter_backoff::Backoff;
///
/// let backoff = Backoff::without_jitter(Duration::from_secs(10), Duration::from_millis(100));
/// assert_eq!(backoff.next(), Duration::from_millis(100));
/// assert_eq!(backoff.next(), Duration::from_millis(200));
///
/// // The retried operation succeeded.
/// backoff.reset();
/// assert_eq!(backoff.next(), Duration::from_millis(100));
/// ```
pub struct Backoff {
    jitter: bool,
    source: Option<Arc<dyn JitterSource>>,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    interval: Duration,
    max_duration: Duration,
    exponent: u32,
    tries: u64,
    stalled: bool,
}

impl State {
    /// Fill unset durations from the process-wide defaults.
    fn setup(&mut self) {
        if self.interval.is_zero() {
            self.interval = defaults::interval();
        }
        if self.max_duration.is_zero() {
            self.max_duration = defaults::max_duration();
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::build(Duration::ZERO, Duration::ZERO, true, None)
    }
}

impl Backoff {
    /// Jittered backoff drawing from the process-wide random source.
    #[must_use]
    pub fn new(max_duration: Duration, interval: Duration) -> Self {
        Self::build(max_duration, interval, true, None)
    }

    /// Deterministic backoff: every call returns the full bound.
    #[must_use]
    pub fn without_jitter(max_duration: Duration, interval: Duration) -> Self {
        Self::build(max_duration, interval, false, None)
    }

    /// Jittered backoff drawing from `source` instead of the shared one.
    #[must_use]
    pub fn with_source(
        max_duration: Duration,
        interval: Duration,
        source: Arc<dyn JitterSource>,
    ) -> Self {
        Self::build(max_duration, interval, true, Some(source))
    }

    fn build(
        max_duration: Duration,
        interval: Duration,
        jitter: bool,
        source: Option<Arc<dyn JitterSource>>,
    ) -> Self {
        Self {
            jitter,
            source,
            state: Mutex::new(State {
                interval,
                max_duration,
                ..State::default()
            }),
        }
    }

    /// Duration to wait before the next retry. Increments the attempt counter.
    pub fn next(&self) -> Duration {
        let mut state = self.state.lock();
        state.setup();
        state.tries = state.tries.saturating_add(1);

        let interval = saturating_nanos(state.interval);
        let factor = 1u64 << state.exponent;
        // Exponent only grows while this product fits, so it never saturates.
        let raw = interval.saturating_mul(factor);

        let grows = factor
            .checked_mul(2)
            .and_then(|next| interval.checked_mul(next))
            .is_some();
        if grows {
            state.exponent += 1;
        } else if !state.stalled {
            state.stalled = true;
            debug!(
                exponent = state.exponent,
                tries = state.tries,
                "Backoff growth stalled at {:?}",
                Duration::from_nanos(raw)
            );
        }

        let bound = Duration::from_nanos(raw).min(state.max_duration);
        trace!(
            tries = state.tries,
            exponent = state.exponent,
            "Computed backoff bound {:?}",
            bound
        );
        drop(state);

        if !self.jitter || bound.is_zero() {
            return bound;
        }
        match &self.source {
            Some(source) => source.below(bound),
            None => jitter::global().below(bound),
        }
    }

    /// Start over from the base interval. Call when the retried operation succeeds.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.tries = 0;
        state.exponent = 0;
        state.stalled = false;
    }

    /// Number of calls to [`next`](Backoff::next) since creation or the last reset.
    pub fn tries(&self) -> u64 {
        self.state.lock().tries
    }

    /// Doubling steps applied so far. Lags [`tries`](Backoff::tries) once growth stalls.
    pub fn exponent(&self) -> u32 {
        self.state.lock().exponent
    }

    /// Effective interval: the configured one, or the current default if unset.
    pub fn interval(&self) -> Duration {
        let interval = self.state.lock().interval;
        if interval.is_zero() {
            defaults::interval()
        } else {
            interval
        }
    }

    /// Effective max duration: the configured one, or the current default if unset.
    pub fn max_duration(&self) -> Duration {
        let max_duration = self.state.lock().max_duration;
        if max_duration.is_zero() {
            defaults::max_duration()
        } else {
            max_duration
        }
    }

    pub fn is_jittered(&self) -> bool {
        self.jitter
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Backoff")
            .field("interval", &state.interval)
            .field("max_duration", &state.max_duration)
            .field("jitter", &self.jitter)
            .field("custom_source", &self.source.is_some())
            .field("exponent", &state.exponent)
            .field("tries", &state.tries)
            .finish()
    }
}
