//! Minimum-interval rate gate.
//!
//! `wait()` holds the limiter's mutex across read-elapsed, sleep and update,
//! so two threads can never both see an expired interval and both skip the
//! sleep. Fairness between waiting threads is whatever the mutex gives.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{const_mutex, Mutex};
use tracing::trace;

/// Upstream guidance: no more than 10 requests per second.
pub const DEFAULT_CALLS_PER_SECOND: f64 = 10.0;

/// Longest spacing a limiter will enforce, however small the rate.
pub const MAX_INTERVAL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
pub struct RateLimiter {
    calls_per_second: f64,
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// A limiter admitting at most `calls_per_second` gated calls per second.
    /// Non-positive or non-finite rates disable spacing; rates slower than
    /// one call per `MAX_INTERVAL` are clamped to it.
    pub fn new(calls_per_second: f64) -> Self {
        let min_interval = if calls_per_second.is_finite() && calls_per_second > 0.0 {
            Duration::try_from_secs_f64(1.0 / calls_per_second)
                .map_or(MAX_INTERVAL, |interval| interval.min(MAX_INTERVAL))
        } else {
            Duration::ZERO
        };
        Self {
            calls_per_second,
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn calls_per_second(&self) -> f64 {
        self.calls_per_second
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until at least `min_interval` has passed since the previous
    /// gated call, then record this one. Returns how long it slept.
    pub fn wait(&self) -> Duration {
        let mut last_call = self.last_call.lock();
        let mut slept = Duration::ZERO;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                slept = self.min_interval - elapsed;
                trace!(?slept, "rate limiter sleeping");
                thread::sleep(slept);
            }
        }
        *last_call = Some(Instant::now());
        slept
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_CALLS_PER_SECOND)
    }
}

/// Which limiter a call goes through.
#[derive(Debug, Clone, Default)]
pub enum RateLimit {
    /// The process-wide limiter at `DEFAULT_CALLS_PER_SECOND`.
    #[default]
    Shared,
    /// A caller-owned limiter, e.g. with a different rate.
    Private(Arc<RateLimiter>),
    /// No gating at all.
    Disabled,
}

impl RateLimit {
    pub fn private(calls_per_second: f64) -> Self {
        RateLimit::Private(Arc::new(RateLimiter::new(calls_per_second)))
    }

    /// Gate one outbound call according to this mode.
    pub fn wait(&self) -> Duration {
        match self {
            RateLimit::Shared => shared_rate_limiter().wait(),
            RateLimit::Private(limiter) => limiter.wait(),
            RateLimit::Disabled => Duration::ZERO,
        }
    }
}

static SHARED_LIMITER: Mutex<Option<Arc<RateLimiter>>> = const_mutex(None);

/// The process-wide limiter, created on first use.
pub fn shared_rate_limiter() -> Arc<RateLimiter> {
    let mut slot = SHARED_LIMITER.lock();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(RateLimiter::default())))
}

/// Drop the process-wide limiter; the next call builds a fresh one.
pub fn reset_shared_rate_limiter() {
    *SHARED_LIMITER.lock() = None;
}
