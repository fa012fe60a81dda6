//! Random source for full jitter.
//!
//! Every jittered [`Backoff`](crate::Backoff) draws from one process-wide
//! [`SharedRng`] unless it was built with its own [`JitterSource`]. The shared
//! generator is seeded once from the OS entropy source and never from a
//! predictable seed: if entropy is unavailable, set-up fails.

use crate::defaults::saturating_nanos;
use crate::error::BackoffResult;
use parking_lot::Mutex;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{error, info};

static GLOBAL: OnceLock<SharedRng> = OnceLock::new();

/// A source of uniformly random durations.
pub trait JitterSource: Send + Sync {
    /// Returns a duration drawn uniformly from `[0, bound)`.
    ///
    /// `bound` is never zero.
    fn below(&self, bound: Duration) -> Duration;
}

/// Thread-safe seeded generator.
pub struct SharedRng {
    rng: Mutex<StdRng>,
}

impl SharedRng {
    /// Seed from the OS entropy source.
    pub fn from_entropy() -> BackoffResult<Self> {
        let rng = StdRng::from_rng(OsRng)?;
        Ok(Self {
            rng: Mutex::new(rng),
        })
    }

    /// Deterministic generator, for reproducible sequences in tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl JitterSource for SharedRng {
    fn below(&self, bound: Duration) -> Duration {
        let bound = saturating_nanos(bound);
        if bound == 0 {
            return Duration::ZERO;
        }
        let nanos = self.rng.lock().gen_range(0..bound);
        Duration::from_nanos(nanos)
    }
}

impl fmt::Debug for SharedRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRng").finish_non_exhaustive()
    }
}

/// Eagerly seed the process-wide source.
///
/// Call this during startup to turn an entropy failure into an error the
/// process can report. Concurrent callers all get the same instance.
pub fn init_global() -> BackoffResult<&'static SharedRng> {
    if let Some(rng) = GLOBAL.get() {
        return Ok(rng);
    }
    let rng = SharedRng::from_entropy()?;
    let installed = GLOBAL.get_or_init(|| {
        info!("Seeded shared jitter source from OS entropy");
        rng
    });
    Ok(installed)
}

/// The process-wide source, seeded on first use.
///
/// # Panics
///
/// Panics if the OS entropy source is unavailable. There is no fallback to a
/// time-based seed; use [`init_global`] to handle the failure at startup.
pub fn global() -> &'static SharedRng {
    GLOBAL.get_or_init(|| match SharedRng::from_entropy() {
        Ok(rng) => {
            info!("Seeded shared jitter source from OS entropy");
            rng
        }
        Err(e) => {
            error!("Cannot seed shared jitter source: {}", e);
            panic!("{}", e);
        }
    })
}
